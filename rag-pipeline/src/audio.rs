//! Audio transport encoding.

use base64::{Engine, engine::general_purpose::STANDARD};

/// Encodes synthesized audio for a JSON string field (standard alphabet,
/// padded). Zero bytes encode to the empty string.
pub fn encode_audio(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}
