//! Shareable level strings
//!
//! A level string is the JSON serialization of `LevelData`, base64-encoded so
//! it survives copy/paste through chat clients and URLs. Decoding validates
//! the records before handing them to the caller: level strings come from
//! outside and are not trusted.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use super::{validate, LevelData};

#[derive(Debug)]
pub enum CodecError {
    Base64(base64::DecodeError),
    Json(serde_json::Error),
    Validation(String),
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::Base64(e) => write!(f, "level string is not valid base64: {}", e),
            CodecError::Json(e) => write!(f, "level string payload is not valid JSON: {}", e),
            CodecError::Validation(msg) => write!(f, "level data rejected: {}", msg),
        }
    }
}

impl std::error::Error for CodecError {}

impl From<base64::DecodeError> for CodecError {
    fn from(e: base64::DecodeError) -> Self {
        CodecError::Base64(e)
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        CodecError::Json(e)
    }
}

/// Serialize level data into a shareable string.
pub fn encode_level_string(data: &LevelData) -> Result<String, CodecError> {
    let json = serde_json::to_vec(data)?;
    Ok(BASE64.encode(json))
}

/// Parse and validate a shareable level string.
pub fn decode_level_string(s: &str) -> Result<LevelData, CodecError> {
    let json = BASE64.decode(s.trim())?;
    let data: LevelData = serde_json::from_slice(&json)?;
    validate(&data).map_err(CodecError::Validation)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::level::{limits, PlatformRecord};
    use crate::sim::PlatformKind;

    fn sample() -> LevelData {
        LevelData {
            platforms: vec![PlatformRecord {
                x: 300.0,
                elevation: 100.0,
                width: 100.0,
                height: 20.0,
                kind: PlatformKind::Win,
            }],
            ..Default::default()
        }
    }

    #[test]
    fn test_encode_decode_preserves_level() {
        let level = sample();
        let s = encode_level_string(&level).unwrap();
        assert!(!s.contains('{'));
        let back = decode_level_string(&s).unwrap();
        assert_eq!(back, level);
    }

    #[test]
    fn test_decode_tolerates_surrounding_whitespace() {
        let s = format!("  {}\n", encode_level_string(&sample()).unwrap());
        assert!(decode_level_string(&s).is_ok());
    }

    #[test]
    fn test_decode_rejects_invalid_base64() {
        match decode_level_string("not*valid*base64!") {
            Err(CodecError::Base64(_)) => {}
            other => panic!("expected base64 error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_decode_rejects_truncated_json() {
        let mut s = encode_level_string(&sample()).unwrap();
        s.truncate(s.len() / 2);
        // Re-pad so the base64 layer passes and the JSON layer fails.
        while s.len() % 4 != 0 {
            s.push('A');
        }
        match decode_level_string(&s) {
            Err(CodecError::Json(_)) => {}
            other => panic!("expected JSON error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_decode_rejects_oversized_level() {
        let mut level = sample();
        let platform = level.platforms[0].clone();
        level.platforms = vec![platform; limits::MAX_ENTITIES + 1];
        let s = encode_level_string(&level).unwrap();
        match decode_level_string(&s) {
            Err(CodecError::Validation(_)) => {}
            other => panic!("expected validation error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_decode_rejects_non_finite_coordinates() {
        // Hand-built JSON because the encoder cannot produce NaN.
        let json = r#"{"platforms":[{"x":null,"elevation":1.0,"width":100.0,"height":20.0,"kind":"standard"}]}"#;
        let s = BASE64.encode(json);
        assert!(decode_level_string(&s).is_err());
    }
}
