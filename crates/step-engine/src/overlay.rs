//! Autosuggest overlay detection

use action_primitives::DocumentPort;
use stepwright_core_types::CandidateDescriptor;
use tracing::debug;

const OVERLAY_ROLES: [&str; 2] = ["listbox", "option"];

/// True when a listbox or option is on screen. Query failures read as "no".
pub async fn autosuggest_visible(document: &dyn DocumentPort) -> bool {
    for role in OVERLAY_ROLES {
        let handles = match document.query(&CandidateDescriptor::role(role, None)).await {
            Ok(handles) => handles,
            Err(err) => {
                debug!(role, error = %err, "overlay probe failed");
                continue;
            }
        };
        if let Some(first) = handles.first() {
            if first.is_visible().await.unwrap_or(false) {
                debug!(role, "autosuggest overlay visible");
                return true;
            }
        }
    }
    false
}
