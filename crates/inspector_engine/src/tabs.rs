use std::sync::Mutex;

use async_trait::async_trait;
use inspector_core::TabId;

/// Resolves the active tab of the focused window, if any.
#[async_trait]
pub trait ActiveTabQuery: Send + Sync {
    async fn active_tab(&self) -> Option<TabId>;
}

/// Host-side focus bookkeeping; stands in for the browser's tab query.
#[derive(Debug, Default)]
pub struct FocusTracker {
    focused: Mutex<Option<TabId>>,
}

impl FocusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn focus(&self, tab_id: TabId) {
        *self.focused.lock().expect("focus lock") = Some(tab_id);
    }

    pub fn blur(&self) {
        *self.focused.lock().expect("focus lock") = None;
    }
}

#[async_trait]
impl ActiveTabQuery for FocusTracker {
    async fn active_tab(&self) -> Option<TabId> {
        *self.focused.lock().expect("focus lock")
    }
}
