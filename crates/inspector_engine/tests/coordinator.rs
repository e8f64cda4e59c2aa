use std::sync::{Arc, Once};

use async_trait::async_trait;
use inspector_core::{Reply, Request, SenderContext, TOGGLE_COMMAND};
use inspector_engine::{
    Coordinator, FocusTracker, FrameBus, KeyValueStore, MemoryStore, StoreError,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(inspector_logging::initialize_for_tests);
}

fn coordinator_over(store: Arc<MemoryStore>) -> Coordinator {
    Coordinator::new(store, Arc::new(FrameBus::new()), Arc::new(FocusTracker::new()))
}

/// Store double whose every operation fails.
struct BrokenStore;

#[async_trait]
impl KeyValueStore for BrokenStore {
    async fn get(&self, _key: &str) -> Result<Option<Value>, StoreError> {
        Err(StoreError::Backend("quota exceeded".into()))
    }

    async fn set(&self, _key: &str, _value: Value) -> Result<(), StoreError> {
        Err(StoreError::Backend("quota exceeded".into()))
    }

    async fn remove(&self, _key: &str) -> Result<(), StoreError> {
        Err(StoreError::Backend("quota exceeded".into()))
    }
}

#[tokio::test]
async fn toggle_sets_then_clears() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let coordinator = coordinator_over(store.clone());
    let popup = SenderContext::popup();

    let reply = coordinator
        .handle(Request::PopupToggle { tab_id: Some(42) }, &popup)
        .await;
    assert_eq!(reply, Some(Reply::Active { active: true }));
    assert_eq!(store.snapshot().get("tab_active_42"), Some(&json!(true)));

    let reply = coordinator
        .handle(Request::PopupToggle { tab_id: Some(42) }, &popup)
        .await;
    assert_eq!(reply, Some(Reply::Active { active: false }));
    assert_eq!(store.snapshot().get("tab_active_42"), Some(&json!(false)));
}

#[tokio::test]
async fn get_state_defaults_to_inactive() {
    init_logging();
    let coordinator = coordinator_over(Arc::new(MemoryStore::new()));

    let reply = coordinator
        .handle(
            Request::PopupGetState { tab_id: Some(42) },
            &SenderContext::popup(),
        )
        .await;
    assert_eq!(reply, Some(Reply::Active { active: false }));
}

#[tokio::test]
async fn toggle_without_tab_id_writes_nothing() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let coordinator = coordinator_over(store.clone());

    let reply = coordinator
        .handle(Request::PopupToggle { tab_id: None }, &SenderContext::popup())
        .await;
    assert_eq!(reply, Some(Reply::Active { active: false }));
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn removed_tab_reads_inactive_afterwards() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let coordinator = coordinator_over(store.clone());
    let popup = SenderContext::popup();

    coordinator
        .handle(Request::PopupToggle { tab_id: Some(7) }, &popup)
        .await;
    coordinator.on_tab_removed(7).await;

    let reply = coordinator
        .handle(Request::PopupGetState { tab_id: Some(7) }, &popup)
        .await;
    assert_eq!(reply, Some(Reply::Active { active: false }));
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn get_tab_id_reports_sender_context() {
    init_logging();
    let coordinator = coordinator_over(Arc::new(MemoryStore::new()));

    let reply = coordinator
        .handle(Request::GetTabId, &SenderContext::frame(7, 0))
        .await;
    assert_eq!(reply, Some(Reply::TabId { tab_id: Some(7) }));

    let reply = coordinator
        .handle(Request::GetTabId, &SenderContext::popup())
        .await;
    assert_eq!(reply, Some(Reply::TabId { tab_id: None }));
}

#[tokio::test]
async fn storage_failure_yields_safe_default() {
    init_logging();
    let coordinator = Coordinator::new(
        Arc::new(BrokenStore),
        Arc::new(FrameBus::new()),
        Arc::new(FocusTracker::new()),
    );
    let popup = SenderContext::popup();

    let reply = coordinator
        .handle(Request::PopupToggle { tab_id: Some(1) }, &popup)
        .await;
    assert_eq!(reply, Some(Reply::Active { active: false }));

    let reply = coordinator
        .handle(Request::PopupGetState { tab_id: Some(1) }, &popup)
        .await;
    assert_eq!(reply, Some(Reply::Active { active: false }));

    // Cleanup swallows the failure entirely.
    coordinator.on_tab_removed(1).await;
}

#[tokio::test]
async fn set_tab_state_uses_sender_tab_verbatim() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let coordinator = coordinator_over(store.clone());

    let reply = coordinator
        .handle(
            Request::SetTabState {
                value: json!("sticky"),
            },
            &SenderContext::frame(5, 1),
        )
        .await;
    assert_eq!(reply, None);
    assert_eq!(store.snapshot().get("tab_active_5"), Some(&json!("sticky")));

    // Coerced reads treat the non-empty string as active.
    let reply = coordinator
        .handle(
            Request::PopupGetState { tab_id: Some(5) },
            &SenderContext::popup(),
        )
        .await;
    assert_eq!(reply, Some(Reply::Active { active: true }));
}

#[tokio::test]
async fn set_tab_state_from_popup_is_a_noop() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let coordinator = coordinator_over(store.clone());

    coordinator
        .handle(
            Request::SetTabState { value: json!(true) },
            &SenderContext::popup(),
        )
        .await;
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn unknown_messages_are_silently_ignored() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let coordinator = coordinator_over(store.clone());

    let reply = coordinator
        .handle(Request::Unknown, &SenderContext::popup())
        .await;
    assert_eq!(reply, None);
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn command_toggles_the_focused_tab() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let tabs = Arc::new(FocusTracker::new());
    let coordinator = Coordinator::new(store.clone(), Arc::new(FrameBus::new()), tabs.clone());

    tabs.focus(3);
    coordinator.on_command(TOGGLE_COMMAND).await;
    assert_eq!(store.snapshot().get("tab_active_3"), Some(&json!(true)));

    coordinator.on_command(TOGGLE_COMMAND).await;
    assert_eq!(store.snapshot().get("tab_active_3"), Some(&json!(false)));
}

#[tokio::test]
async fn command_without_focused_tab_is_a_noop() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let coordinator = coordinator_over(store.clone());

    coordinator.on_command(TOGGLE_COMMAND).await;
    assert!(store.snapshot().is_empty());
}

#[tokio::test]
async fn unrelated_commands_are_ignored() {
    init_logging();
    let store = Arc::new(MemoryStore::new());
    let tabs = Arc::new(FocusTracker::new());
    let coordinator = Coordinator::new(store.clone(), Arc::new(FrameBus::new()), tabs.clone());

    tabs.focus(3);
    coordinator.on_command("open-settings").await;
    assert!(store.snapshot().is_empty());
}
