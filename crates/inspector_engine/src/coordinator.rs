use std::sync::Arc;

use inspector_core::{
    is_active, tab_key, Broadcast, Reply, Request, SenderContext, TabId, TOGGLE_COMMAND,
};
use inspector_logging::{inspector_debug, inspector_error};
use serde_json::Value;

use crate::bus::FrameBus;
use crate::store::{KeyValueStore, StoreError};
use crate::tabs::ActiveTabQuery;

/// Sole arbiter of per-tab inspector state.
///
/// Owns no state of its own: the canonical per-tab flag lives in the
/// injected store, and frame delivery goes through the bus. No failure
/// escapes a handler; callers see at worst a `{active: false}` default.
pub struct Coordinator {
    store: Arc<dyn KeyValueStore>,
    bus: Arc<FrameBus>,
    tabs: Arc<dyn ActiveTabQuery>,
}

impl Coordinator {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        bus: Arc<FrameBus>,
        tabs: Arc<dyn ActiveTabQuery>,
    ) -> Self {
        Self { store, bus, tabs }
    }

    pub fn bus(&self) -> &Arc<FrameBus> {
        &self.bus
    }

    /// Dispatch one inbound message. `None` means the message variant
    /// carries no reply; senders of reply-bearing variants always get
    /// exactly one reply, including on error paths.
    pub async fn handle(&self, request: Request, sender: &SenderContext) -> Option<Reply> {
        match request {
            Request::PopupToggle { tab_id } => Some(self.toggle(tab_id).await),
            Request::PopupGetState { tab_id } => Some(self.get_state(tab_id).await),
            Request::SetTabState { value } => {
                self.set_tab_state(sender, value).await;
                None
            }
            Request::IframeStyleUpdate { data } => {
                self.relay_style_update(sender, data);
                None
            }
            Request::GetTabId => Some(Reply::TabId {
                tab_id: sender.tab_id,
            }),
            // Other consumers may share the channel; not ours to answer.
            Request::Unknown => None,
        }
    }

    async fn toggle(&self, tab_id: Option<TabId>) -> Reply {
        let Some(tab_id) = tab_id else {
            return Reply::Active { active: false };
        };
        match self.toggle_stored(tab_id).await {
            Ok(active) => Reply::Active { active },
            Err(err) => {
                inspector_error!("storage error toggling tab {tab_id}: {err}");
                Reply::Active { active: false }
            }
        }
    }

    // Read-modify-write without a lock: two toggles for the same tab that
    // land on the queue together may interleave, matching the browser's
    // cooperative scheduling of message handlers.
    async fn toggle_stored(&self, tab_id: TabId) -> Result<bool, StoreError> {
        let key = tab_key(tab_id);
        let next = !is_active(self.store.get(&key).await?.as_ref());
        self.store.set(&key, Value::Bool(next)).await?;
        Ok(next)
    }

    async fn get_state(&self, tab_id: Option<TabId>) -> Reply {
        let Some(tab_id) = tab_id else {
            return Reply::Active { active: false };
        };
        let active = match self.store.get(&tab_key(tab_id)).await {
            Ok(value) => is_active(value.as_ref()),
            Err(err) => {
                inspector_error!("storage error reading tab {tab_id}: {err}");
                false
            }
        };
        Reply::Active { active }
    }

    async fn set_tab_state(&self, sender: &SenderContext, value: Value) {
        // Tab comes from the sender's context, never from the payload.
        let Some(tab_id) = sender.tab_id else {
            return;
        };
        if let Err(err) = self.store.set(&tab_key(tab_id), value).await {
            inspector_error!("storage error recording state for tab {tab_id}: {err}");
        }
    }

    fn relay_style_update(&self, sender: &SenderContext, data: Value) {
        let Some(tab_id) = sender.tab_id else {
            return;
        };
        let delivered = self.bus.broadcast(
            tab_id,
            &Broadcast::FromIframeStyleUpdate {
                data,
                frame_id: sender.frame_id,
            },
        );
        inspector_debug!("style update for tab {tab_id} reached {delivered} frame(s)");
    }

    /// Global keyboard command. Fire-and-forget: there is no reply surface,
    /// so every failure is swallowed after logging.
    pub async fn on_command(&self, command: &str) {
        if command != TOGGLE_COMMAND {
            return;
        }
        let Some(tab_id) = self.tabs.active_tab().await else {
            return;
        };
        if let Err(err) = self.toggle_stored(tab_id).await {
            inspector_error!("storage error toggling tab {tab_id} via command: {err}");
        }
    }

    /// Tab closed: drop its stored flag and frame subscriptions, best-effort.
    pub async fn on_tab_removed(&self, tab_id: TabId) {
        if let Err(err) = self.store.remove(&tab_key(tab_id)).await {
            inspector_debug!("cleanup for closed tab {tab_id} failed: {err}");
        }
        self.bus.remove_tab(tab_id);
    }
}
