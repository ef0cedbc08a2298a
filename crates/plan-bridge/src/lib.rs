//! JSON message boundary between a canvas UI and the plan kernel.
//!
//! The UI sends [`UiToKernel`] messages; each one is applied to an
//! [`EditorState`] by [`dispatch`], which always answers with a
//! [`KernelToUi`]. [`process_message`] does the same for raw JSON strings.

pub mod dispatch;
pub mod editor_state;
pub mod messages;

pub use dispatch::dispatch;
pub use editor_state::{BridgeError, EditorState};
pub use messages::{FixtureView, KernelToUi, RoomView, UiToKernel, WallView};

/// Handle one JSON-encoded [`UiToKernel`] and return the JSON-encoded reply.
pub fn process_message(state: &mut EditorState, json_input: &str) -> String {
    let response = match serde_json::from_str::<UiToKernel>(json_input) {
        Ok(msg) => dispatch(state, msg),
        Err(e) => KernelToUi::Error {
            message: format!("Failed to parse message: {}", e),
        },
    };
    serde_json::to_string(&response).unwrap_or_else(|e| {
        let err = BridgeError::Serialization {
            reason: e.to_string(),
        };
        serde_json::json!({ "type": "Error", "message": err.to_string() }).to_string()
    })
}
