use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Browser-assigned tab identifier. Becomes invalid when the tab closes.
pub type TabId = u32;

/// Frame identifier within a tab; 0 is the top-level frame.
pub type FrameId = u32;

/// Identity of a message originator, as the browser would report it.
///
/// `tab_id` is `None` for contexts that do not live in a tab (the popup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SenderContext {
    pub tab_id: Option<TabId>,
    pub frame_id: Option<FrameId>,
}

impl SenderContext {
    /// A popup or other non-tab context.
    pub fn popup() -> Self {
        Self::default()
    }

    /// A content script running in `frame_id` of `tab_id`.
    pub fn frame(tab_id: TabId, frame_id: FrameId) -> Self {
        Self {
            tab_id: Some(tab_id),
            frame_id: Some(frame_id),
        }
    }
}

/// Inbound message to the background coordinator.
///
/// On the wire these are JSON objects discriminated by a `type` field with
/// SCREAMING_SNAKE tags and camelCase payload fields, e.g.
/// `{"type": "POPUP_TOGGLE", "tabId": 42}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Request {
    /// Toggle the inspector flag for a tab. Replies `{active}`.
    #[serde(rename_all = "camelCase")]
    PopupToggle {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tab_id: Option<TabId>,
    },
    /// Read the inspector flag for a tab. Replies `{active}`.
    #[serde(rename_all = "camelCase")]
    PopupGetState {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tab_id: Option<TabId>,
    },
    /// Persist `value` verbatim under the sender's own tab. No reply.
    SetTabState { value: Value },
    /// Relay a style update to every frame of the sender's tab. No reply.
    IframeStyleUpdate { data: Value },
    /// Ask which tab the sender lives in. Replies `{tabId}`.
    GetTabId,
    /// Unrecognized `type` tags land here; dispatch ignores them so other
    /// message consumers can share the channel.
    #[serde(other)]
    Unknown,
}

/// Message broadcast by the coordinator to the frames of one tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Broadcast {
    /// A style update originating from one frame, fanned out to all frames
    /// of the same tab. Receivers decide whether to render it.
    #[serde(rename_all = "camelCase")]
    FromIframeStyleUpdate {
        data: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        frame_id: Option<FrameId>,
    },
}

/// Reply payloads. Untagged: `{"active": …}` or `{"tabId": …}` on the wire,
/// with `tabId` omitted entirely when the sender has no tab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reply {
    Active {
        active: bool,
    },
    #[serde(rename_all = "camelCase")]
    TabId {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tab_id: Option<TabId>,
    },
}
