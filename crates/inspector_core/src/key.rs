use serde_json::Value;

use crate::TabId;

/// Prefix for per-tab inspector state keys in the shared store.
pub const TAB_KEY_PREFIX: &str = "tab_active_";

/// Name of the global keyboard command that toggles the inspector.
pub const TOGGLE_COMMAND: &str = "toggle-inspector";

/// Storage key for a tab's inspector flag: `tab_active_<tabId>`.
///
/// Deterministic and injective over tab identifiers, so no two tabs can
/// ever share an entry.
pub fn tab_key(tab_id: TabId) -> String {
    format!("{TAB_KEY_PREFIX}{tab_id}")
}

/// Coerce a stored value to the active flag.
///
/// An absent key means inactive. Stored values follow JS truthiness because
/// `SET_TAB_STATE` persists arbitrary values verbatim: `null`, `false`, `0`
/// and `""` are inactive, everything else is active.
pub fn is_active(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}
