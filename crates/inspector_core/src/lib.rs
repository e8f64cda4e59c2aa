//! Inspector core: wire protocol types and pure keying helpers.
mod key;
mod msg;

pub use key::{is_active, tab_key, TAB_KEY_PREFIX, TOGGLE_COMMAND};
pub use msg::{Broadcast, FrameId, Reply, Request, SenderContext, TabId};
