use std::collections::HashMap;
use std::sync::Mutex;

use inspector_core::{Broadcast, FrameId, TabId};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Per-tab frame registry standing in for the browser's message delivery
/// to the frames of a tab.
#[derive(Debug, Default)]
pub struct FrameBus {
    frames: Mutex<HashMap<TabId, HashMap<FrameId, UnboundedSender<Broadcast>>>>,
}

impl FrameBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a frame and return its receiving end. Re-registering the
    /// same frame replaces the previous subscription.
    pub fn subscribe(&self, tab_id: TabId, frame_id: FrameId) -> UnboundedReceiver<Broadcast> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.frames
            .lock()
            .expect("frame registry lock")
            .entry(tab_id)
            .or_default()
            .insert(frame_id, tx);
        rx
    }

    pub fn unsubscribe(&self, tab_id: TabId, frame_id: FrameId) {
        let mut frames = self.frames.lock().expect("frame registry lock");
        if let Some(tab) = frames.get_mut(&tab_id) {
            tab.remove(&frame_id);
            if tab.is_empty() {
                frames.remove(&tab_id);
            }
        }
    }

    /// Best-effort, at-most-once delivery to every live frame of `tab_id`.
    /// Frames whose receiver is gone are silently dropped from the registry.
    /// Returns the number of frames reached.
    pub fn broadcast(&self, tab_id: TabId, message: &Broadcast) -> usize {
        let mut frames = self.frames.lock().expect("frame registry lock");
        let Some(tab) = frames.get_mut(&tab_id) else {
            return 0;
        };
        let mut delivered = 0;
        tab.retain(|_, tx| match tx.send(message.clone()) {
            Ok(()) => {
                delivered += 1;
                true
            }
            Err(_) => false,
        });
        if tab.is_empty() {
            frames.remove(&tab_id);
        }
        delivered
    }

    /// Drop every frame registration of a closed tab.
    pub fn remove_tab(&self, tab_id: TabId) {
        self.frames
            .lock()
            .expect("frame registry lock")
            .remove(&tab_id);
    }
}
