//! Demo host: drives a simulated popup/content session against the
//! background coordinator, standing in for the browser's three contexts.

mod logging;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use inspector_core::{Reply, SenderContext, TOGGLE_COMMAND};
use inspector_engine::{CoordinatorHandle, FocusTracker, FrameBridge, JsonFileStore};
use log::info;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    logging::initialize(log::LevelFilter::Info);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("build tokio runtime")?;
    runtime.block_on(run())
}

async fn run() -> anyhow::Result<()> {
    let store = Arc::new(JsonFileStore::open("./inspector_state.json").context("open state file")?);
    let tabs = Arc::new(FocusTracker::new());
    tabs.focus(1);

    let handle = CoordinatorHandle::new(store, tabs);

    // Two frames of tab 1 plus a frame of an unrelated tab.
    let mut top = FrameBridge::attach(&handle, 1, 0);
    let child = FrameBridge::attach(&handle, 1, 1);
    let mut other = FrameBridge::attach(&handle, 2, 0);

    info!("top frame sees tab {:?}", top.tab_id().await);

    // Popup toggles tab 1 on.
    let reply = handle
        .request(json!({"type": "POPUP_TOGGLE", "tabId": 1}), SenderContext::popup())
        .await;
    info!("popup toggle reply: {reply:?}");

    // Keyboard shortcut toggles the focused tab back off.
    handle.command(TOGGLE_COMMAND);
    tokio::time::sleep(Duration::from_millis(50)).await;
    let reply = handle
        .request(
            json!({"type": "POPUP_GET_STATE", "tabId": 1}),
            SenderContext::popup(),
        )
        .await;
    info!("state after command: {reply:?}");

    // A child frame's style update fans out to every frame of its tab.
    child
        .send_style_update(json!({"selector": "h1", "outline": "2px solid"}))
        .await;
    info!("top frame received: {:?}", top.next_update().await);
    info!("other tab pending update: {:?}", other.try_next_update());

    // Closing the tab clears its stored flag.
    handle.tab_removed(1);
    tokio::time::sleep(Duration::from_millis(50)).await;
    let reply = handle
        .request(
            json!({"type": "POPUP_GET_STATE", "tabId": 1}),
            SenderContext::popup(),
        )
        .await;
    if reply != Some(Reply::Active { active: false }) {
        anyhow::bail!("tab 1 state survived removal: {reply:?}");
    }
    info!("tab 1 cleaned up after removal");

    child.detach();
    other.detach();
    Ok(())
}
