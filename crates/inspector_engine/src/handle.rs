use std::sync::Arc;
use std::thread;

use inspector_core::{Broadcast, FrameId, Reply, Request, SenderContext, TabId};
use serde_json::Value;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::sync::oneshot;

use crate::bus::FrameBus;
use crate::coordinator::Coordinator;
use crate::store::KeyValueStore;
use crate::tabs::ActiveTabQuery;

enum Envelope {
    Message {
        raw: Value,
        sender: SenderContext,
        reply_tx: oneshot::Sender<Option<Reply>>,
    },
    Command {
        name: String,
    },
    TabRemoved {
        tab_id: TabId,
    },
}

/// Owns the background event loop. Cloneable; all clones feed one queue.
///
/// The loop runs on a dedicated thread with a single-threaded runtime, and
/// each envelope is handled on its own task. Independent messages therefore
/// interleave at await points exactly as the browser's cooperative event
/// queue allows; nothing serializes two toggles for the same tab.
#[derive(Clone)]
pub struct CoordinatorHandle {
    envelope_tx: UnboundedSender<Envelope>,
    bus: Arc<FrameBus>,
}

impl CoordinatorHandle {
    pub fn new(store: Arc<dyn KeyValueStore>, tabs: Arc<dyn ActiveTabQuery>) -> Self {
        let bus = Arc::new(FrameBus::new());
        let coordinator = Arc::new(Coordinator::new(store, bus.clone(), tabs));
        let (envelope_tx, mut envelope_rx) = mpsc::unbounded_channel::<Envelope>();

        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("tokio runtime");
            runtime.block_on(async move {
                while let Some(envelope) = envelope_rx.recv().await {
                    let coordinator = coordinator.clone();
                    tokio::spawn(async move {
                        dispatch(coordinator.as_ref(), envelope).await;
                    });
                }
            });
        });

        Self { envelope_tx, bus }
    }

    /// Wire entry point. The returned channel resolves with the reply, or
    /// with `None` for reply-less, unrecognized, or unparseable payloads.
    pub fn deliver(
        &self,
        raw: Value,
        sender: SenderContext,
    ) -> oneshot::Receiver<Option<Reply>> {
        let (reply_tx, reply_rx) = oneshot::channel();
        let _ = self.envelope_tx.send(Envelope::Message {
            raw,
            sender,
            reply_tx,
        });
        reply_rx
    }

    /// Deliver and await the reply in one step.
    pub async fn request(&self, raw: Value, sender: SenderContext) -> Option<Reply> {
        self.deliver(raw, sender).await.unwrap_or(None)
    }

    /// Global keyboard command, fire-and-forget.
    pub fn command(&self, name: &str) {
        let _ = self.envelope_tx.send(Envelope::Command {
            name: name.to_string(),
        });
    }

    /// Tab-removed notification, fire-and-forget.
    pub fn tab_removed(&self, tab_id: TabId) {
        let _ = self.envelope_tx.send(Envelope::TabRemoved { tab_id });
    }

    pub fn subscribe_frame(
        &self,
        tab_id: TabId,
        frame_id: FrameId,
    ) -> UnboundedReceiver<Broadcast> {
        self.bus.subscribe(tab_id, frame_id)
    }

    pub fn unsubscribe_frame(&self, tab_id: TabId, frame_id: FrameId) {
        self.bus.unsubscribe(tab_id, frame_id);
    }
}

async fn dispatch(coordinator: &Coordinator, envelope: Envelope) {
    match envelope {
        Envelope::Message {
            raw,
            sender,
            reply_tx,
        } => {
            let reply = match serde_json::from_value::<Request>(raw) {
                Ok(request) => coordinator.handle(request, &sender).await,
                // Shapes we cannot parse belong to someone else.
                Err(_) => None,
            };
            let _ = reply_tx.send(reply);
        }
        Envelope::Command { name } => coordinator.on_command(&name).await,
        Envelope::TabRemoved { tab_id } => coordinator.on_tab_removed(tab_id).await,
    }
}
