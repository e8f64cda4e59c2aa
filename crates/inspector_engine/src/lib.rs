//! Inspector engine: background coordinator, storage, and frame delivery.
mod bridge;
mod bus;
mod coordinator;
mod handle;
mod store;
mod tabs;

pub use bridge::FrameBridge;
pub use bus::FrameBus;
pub use coordinator::Coordinator;
pub use handle::CoordinatorHandle;
pub use store::{JsonFileStore, KeyValueStore, MemoryStore, StoreError};
pub use tabs::{ActiveTabQuery, FocusTracker};
