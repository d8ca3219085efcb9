//! Access token decoding
//!
//! The access token is a JWT. Only its payload is read, locally and without
//! signature verification, to learn the username the profile is fetched with.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::{Error, Result};

#[derive(Debug, Deserialize)]
struct Claims {
    #[serde(default)]
    username: Option<String>,
}

/// Extract the `username` claim of a JWT.
pub fn decode_username(token: &str) -> Result<String> {
    let payload = token.split('.').nth(1).ok_or_else(|| Error::InvalidToken {
        reason: "expected three dot-separated segments".to_string(),
    })?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| Error::InvalidToken {
            reason: format!("payload is not base64url: {e}"),
        })?;

    let claims: Claims = serde_json::from_slice(&bytes).map_err(|e| Error::InvalidToken {
        reason: format!("payload is not a JSON object: {e}"),
    })?;

    match claims.username {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(Error::InvalidToken {
            reason: "username not found in the token".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn encode_unsigned(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string());
        format!("{header}.{body}.")
    }

    #[test]
    fn test_decode_username() {
        let token = encode_unsigned(&json!({ "username": "jdoe", "exp": 1 }));
        assert_eq!(decode_username(&token).unwrap(), "jdoe");
    }

    #[test]
    fn test_decode_padded_payload() {
        let body = base64::engine::general_purpose::URL_SAFE.encode(r#"{"username":"ab"}"#);
        let token = format!("h.{body}.s");
        assert_eq!(decode_username(&token).unwrap(), "ab");
    }

    #[test]
    fn test_missing_username() {
        let token = encode_unsigned(&json!({ "sub": 3 }));
        let err = decode_username(&token).unwrap_err();
        assert!(err.to_string().contains("username not found"));
    }

    #[test]
    fn test_not_a_jwt() {
        assert!(matches!(
            decode_username("opaque-token"),
            Err(Error::InvalidToken { .. })
        ));
        assert!(matches!(
            decode_username("a.%%%.c"),
            Err(Error::InvalidToken { .. })
        ));
    }
}
