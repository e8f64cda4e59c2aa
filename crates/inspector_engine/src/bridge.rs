use inspector_core::{Broadcast, FrameId, Reply, Request, SenderContext, TabId};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::handle::CoordinatorHandle;

/// Content-script side of the protocol, one per frame.
///
/// Speaks the same wire format a real content script would: every call
/// serializes a tagged message and sends it through the coordinator's
/// runtime channel. The overlay UI consuming these updates stays outside
/// this crate.
pub struct FrameBridge {
    handle: CoordinatorHandle,
    tab_id: TabId,
    frame_id: FrameId,
    updates: UnboundedReceiver<Broadcast>,
}

impl FrameBridge {
    pub fn attach(handle: &CoordinatorHandle, tab_id: TabId, frame_id: FrameId) -> Self {
        let updates = handle.subscribe_frame(tab_id, frame_id);
        Self {
            handle: handle.clone(),
            tab_id,
            frame_id,
            updates,
        }
    }

    fn sender(&self) -> SenderContext {
        SenderContext::frame(self.tab_id, self.frame_id)
    }

    /// Ask the background which tab this frame lives in.
    pub async fn tab_id(&self) -> Option<TabId> {
        let raw = serde_json::to_value(Request::GetTabId).ok()?;
        match self.handle.request(raw, self.sender()).await {
            Some(Reply::TabId { tab_id }) => tab_id,
            _ => None,
        }
    }

    /// Record the overlay's state under this frame's tab. Fire-and-forget.
    pub async fn set_active(&self, value: Value) {
        if let Ok(raw) = serde_json::to_value(Request::SetTabState { value }) {
            let _ = self.handle.request(raw, self.sender()).await;
        }
    }

    /// Relay a style update to every frame of this tab. Fire-and-forget.
    pub async fn send_style_update(&self, data: Value) {
        if let Ok(raw) = serde_json::to_value(Request::IframeStyleUpdate { data }) {
            let _ = self.handle.request(raw, self.sender()).await;
        }
    }

    /// Next cross-frame style update. Resolves `None` once detached from
    /// a removed tab.
    pub async fn next_update(&mut self) -> Option<Broadcast> {
        self.updates.recv().await
    }

    /// Non-blocking variant of [`next_update`](Self::next_update).
    pub fn try_next_update(&mut self) -> Option<Broadcast> {
        self.updates.try_recv().ok()
    }

    /// Tear the frame down, deregistering it from delivery.
    pub fn detach(self) {
        self.handle.unsubscribe_frame(self.tab_id, self.frame_id);
    }
}
