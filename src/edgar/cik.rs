// src/edgar/cik.rs
use crate::utils::error::EdgarError;
use serde::{Serialize, Serializer};
use std::fmt;

/// Central Index Key, stored as its numeric value.
/// Displays zero-padded to 10 digits, the form EDGAR endpoints expect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cik(u64);

const MAX_CIK: u64 = 9_999_999_999;

impl Cik {
    pub fn new(value: u64) -> Result<Self, EdgarError> {
        if value > MAX_CIK {
            return Err(EdgarError::InvalidInput(format!("CIK {} has more than 10 digits", value)));
        }
        Ok(Self(value))
    }

    /// Accepts "320193", "0000320193", "CIK0000320193" and the
    /// "CIK: 0000320193, Name: ..." text produced by the lookup tool.
    pub fn parse(input: &str) -> Result<Self, EdgarError> {
        let mut s = input.trim();
        if let Some(idx) = s.find("CIK:") {
            s = &s[idx + 4..];
            s = s.split(',').next().unwrap_or_default().trim();
        } else if let Some(rest) = s.strip_prefix("CIK").or_else(|| s.strip_prefix("cik")) {
            s = rest.trim();
        }

        if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
            return Err(EdgarError::InvalidInput(format!("'{}' is not a valid CIK", input.trim())));
        }
        let digits = s.trim_start_matches('0');
        if digits.len() > 10 {
            return Err(EdgarError::InvalidInput(format!("CIK '{}' has more than 10 digits", s)));
        }
        let value = if digits.is_empty() {
            0
        } else {
            digits
                .parse::<u64>()
                .map_err(|_| EdgarError::InvalidInput(format!("'{}' is not a valid CIK", s)))?
        };
        Self::new(value)
    }

    /// Reads a CIK out of a JSON field, which EDGAR serves as either a string or a number.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, EdgarError> {
        match value {
            serde_json::Value::String(s) => Self::parse(s).map_err(|e| EdgarError::malformed(e.to_string())),
            serde_json::Value::Number(n) => n
                .as_u64()
                .ok_or_else(|| EdgarError::malformed(format!("CIK {} is not a positive integer", n)))
                .and_then(|v| Self::new(v).map_err(|e| EdgarError::malformed(e.to_string()))),
            other => Err(EdgarError::malformed(format!("CIK has unexpected JSON type: {}", other))),
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Without leading zeros, as used in archive paths.
    pub fn unpadded(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for Cik {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:010}", self.0)
    }
}

impl Serialize for Cik {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_forms() {
        for input in ["320193", "0000320193", "CIK0000320193", " CIK: 0000320193, Name: Apple Inc. "] {
            let cik = Cik::parse(input).unwrap();
            assert_eq!(cik.to_string(), "0000320193", "input {:?}", input);
            assert_eq!(cik.unpadded(), "320193");
        }
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(Cik::parse("AAPL"), Err(EdgarError::InvalidInput(_))));
        assert!(Cik::parse("").is_err());
        assert!(Cik::parse("12345678901").is_err());
        assert!(Cik::parse("-5").is_err());
    }

    #[test]
    fn test_leading_zeros_beyond_ten_digits_are_fine() {
        assert_eq!(Cik::parse("000000320193").unwrap().value(), 320193);
    }

    #[test]
    fn test_zero_cik() {
        let cik = Cik::parse("0").unwrap();
        assert_eq!(cik.to_string(), "0000000000");
        assert_eq!(cik.unpadded(), "0");
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Cik::from_json(&json!("0000789019")).unwrap().value(), 789019);
        assert_eq!(Cik::from_json(&json!(789019)).unwrap().value(), 789019);
        assert!(matches!(Cik::from_json(&json!(null)), Err(EdgarError::MalformedResponse(_))));
        assert!(matches!(Cik::from_json(&json!("abc")), Err(EdgarError::MalformedResponse(_))));
    }

    #[test]
    fn test_serializes_padded() {
        let cik = Cik::new(1318605).unwrap();
        assert_eq!(serde_json::to_string(&cik).unwrap(), "\"0001318605\"");
    }
}
