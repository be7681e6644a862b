// ============================================================================
// src/util/encode.rs – base64 helpers for salts, targets and digests
// ============================================================================

use anyhow::{anyhow, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

/// Decode a base64 field supplied by the operator. Whitespace is
/// tolerated (values are routinely pasted out of database dumps); the
/// label keeps the error message attributable.
pub fn decode_b64_field(label: &str, input: &str) -> Result<Vec<u8>> {
    let cleaned: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(anyhow!("{label} is empty"));
    }
    BASE64
        .decode(cleaned.as_bytes())
        .map_err(|e| anyhow!("{label} is not valid base64: {e}"))
}

/// Canonical base64 text for a byte sequence. Attempt outputs and the
/// target digest are both run through this before comparison.
pub fn encode_b64(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_canonical_text() {
        let bytes = [0u8, 1, 2, 253, 254, 255];
        let text = encode_b64(&bytes);
        assert_eq!(decode_b64_field("salt", &text).unwrap(), bytes);
    }

    #[test]
    fn tolerates_pasted_whitespace() {
        let decoded = decode_b64_field("target hash", "AAEC\n AwQF BgcI\tCQoLDA0ODw==").unwrap();
        assert_eq!(decoded, (0u8..16).collect::<Vec<u8>>());
    }

    #[test]
    fn rejects_empty_and_garbage_input() {
        assert!(decode_b64_field("salt", "  \n").is_err());
        let err = decode_b64_field("salt", "@@not-base64@@").unwrap_err();
        assert!(err.to_string().contains("salt"));
    }
}
