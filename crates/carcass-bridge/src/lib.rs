pub mod dispatch;
pub mod engine_state;
pub mod messages;

#[cfg(target_arch = "wasm32")]
mod wasm_api;

pub use dispatch::dispatch;
pub use engine_state::{BridgeError, EngineState};
pub use messages::{EngineToUi, UiToEngine};

/// Parse a JSON `UiToEngine`, dispatch it, and serialize the response.
///
/// Malformed input produces an `Error` response rather than a failure.
pub fn process_json(state: &mut EngineState, json_input: &str) -> String {
    let response = match serde_json::from_str::<UiToEngine>(json_input) {
        Ok(msg) => dispatch(state, msg),
        Err(e) => dispatch::error_response(&BridgeError::Serialization {
            reason: format!("failed to parse message: {}", e),
        }),
    };
    to_json(&response)
}

/// Serialize a response, falling back to a hand-built error object.
pub fn to_json(response: &EngineToUi) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            r#"{{"type":"Error","kind":"InvalidParameter","message":"serialization failed: {}","piece_id":null}}"#,
            e
        )
    })
}
