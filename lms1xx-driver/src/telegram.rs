use crate::constants::{TELEGRAM_END, TELEGRAM_START};
use crate::error::Lms1xxError;

/// Frame a token sequence into one outgoing telegram.
pub(crate) fn encode(tokens: &[&str]) -> Vec<u8> {
    let payload = tokens.join(" ");
    let mut telegram = Vec::with_capacity(payload.len() + 2);
    telegram.push(TELEGRAM_START);
    telegram.extend_from_slice(payload.as_bytes());
    telegram.push(TELEGRAM_END);
    telegram
}

/// Strip the telegram delimiters and split the payload into tokens.
/// Token semantics are left to the caller.
pub(crate) fn decode(raw: &[u8]) -> Result<Vec<String>, Lms1xxError> {
    let first = match raw.first() {
        Some(byte) => *byte,
        None => return Err(Lms1xxError::FramingError("empty telegram".to_string())),
    };
    if first != TELEGRAM_START {
        return Err(Lms1xxError::FramingError(format!(
            "expected start marker 0x02, observed 0x{:02X}",
            first
        )));
    }
    let last = raw[raw.len() - 1];
    if raw.len() < 2 || last != TELEGRAM_END {
        return Err(Lms1xxError::FramingError(format!(
            "expected end marker 0x03, observed 0x{:02X}",
            last
        )));
    }
    let payload = std::str::from_utf8(&raw[1..raw.len() - 1])
        .map_err(|_| Lms1xxError::FramingError("payload is not ASCII".to_string()))?;
    if payload.is_empty() {
        return Ok(Vec::new());
    }
    Ok(payload.split(' ').map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode() {
        let telegram = encode(&["sRN", "STlms"]);
        assert_eq!(telegram, b"\x02sRN STlms\x03");
    }

    #[test]
    fn test_decode() {
        let tokens = decode(b"\x02sAN LMCstartmeas 0\x03").unwrap();
        assert_eq!(tokens, vec!["sAN", "LMCstartmeas", "0"]);
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let telegram = encode(&["sMN", "mLMPsetscancfg", "1388", "9C4", "FFF92230", "225510"]);
        let tokens = decode(&telegram).unwrap();
        assert_eq!(
            tokens,
            vec!["sMN", "mLMPsetscancfg", "1388", "9C4", "FFF92230", "225510"]
        );
    }

    #[test]
    fn test_decode_missing_start_marker() {
        assert!(matches!(
            decode(b"sAN LMCstartmeas 0\x03"),
            Err(Lms1xxError::FramingError(_))
        ));
    }

    #[test]
    fn test_decode_missing_end_marker() {
        assert!(matches!(
            decode(b"\x02sAN LMCstartmeas 0"),
            Err(Lms1xxError::FramingError(_))
        ));
    }

    #[test]
    fn test_decode_empty_input() {
        assert!(matches!(decode(b""), Err(Lms1xxError::FramingError(_))));
        // A lone start marker is not a complete telegram either.
        assert!(matches!(decode(b"\x02"), Err(Lms1xxError::FramingError(_))));
    }

    #[test]
    fn test_decode_empty_payload() {
        assert_eq!(decode(b"\x02\x03").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_decode_non_ascii_payload() {
        assert!(matches!(
            decode(b"\x02s\xFFN\x03"),
            Err(Lms1xxError::FramingError(_))
        ));
    }
}
