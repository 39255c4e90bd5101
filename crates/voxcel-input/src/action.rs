//! Click-action payload decoding.
//!
//! Cells may carry an `on_click` formula in one of three shapes:
//! `B64:<base64>`, `<digits>:<base64>`, or plain formula text. Decoded
//! actions are always returned with a leading `=`.

use base64::Engine;
use thiserror::Error;
use voxcel_core::constants::ACTION_B64_TAG;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEncoding {
    TaggedBase64,
    LengthPrefixedBase64,
    Plain,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ActionDecodeError {
    #[error("click action is empty")]
    Empty,

    #[error("invalid base64 in {encoding:?} click action: {reason}")]
    InvalidBase64 {
        encoding: ActionEncoding,
        reason: String,
    },

    #[error("click action is not valid UTF-8")]
    InvalidUtf8,
}

/// Which shape `raw` (already trimmed) is in. The digit prefix is not
/// checked against the payload length.
pub fn classify(raw: &str) -> ActionEncoding {
    if raw.starts_with(ACTION_B64_TAG) {
        return ActionEncoding::TaggedBase64;
    }
    match raw.split_once(':') {
        Some((digits, _)) if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) => {
            ActionEncoding::LengthPrefixedBase64
        }
        _ => ActionEncoding::Plain,
    }
}

/// Decode a raw `on_click` value into formula text starting with `=`.
pub fn decode_click_action(raw: &str) -> Result<String, ActionDecodeError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ActionDecodeError::Empty);
    }

    let encoding = classify(raw);
    let text = match encoding {
        ActionEncoding::TaggedBase64 => decode_payload(&raw[ACTION_B64_TAG.len()..], encoding)?,
        ActionEncoding::LengthPrefixedBase64 => {
            let payload = raw.split_once(':').map(|(_, p)| p).unwrap_or_default();
            decode_payload(payload, encoding)?
        }
        ActionEncoding::Plain => raw.to_string(),
    };

    if text.is_empty() {
        return Err(ActionDecodeError::Empty);
    }
    if text.starts_with('=') {
        Ok(text)
    } else {
        Ok(format!("={text}"))
    }
}

fn decode_payload(payload: &str, encoding: ActionEncoding) -> Result<String, ActionDecodeError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ActionDecodeError::InvalidBase64 {
            encoding,
            reason: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|_| ActionDecodeError::InvalidUtf8)
}
