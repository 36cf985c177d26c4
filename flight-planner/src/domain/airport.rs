//! Airport code types.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when parsing an invalid airport code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid airport code {code:?}: {reason}")]
pub struct InvalidAirportCode {
    code: String,
    reason: &'static str,
}

/// A valid 3-letter IATA airport code.
///
/// Airport codes are always 3 uppercase ASCII letters. This type guarantees
/// that any `AirportCode` value is valid by construction, and being `Copy`
/// it can be handed around the search freely.
///
/// # Examples
///
/// ```
/// use flight_planner::domain::AirportCode;
///
/// let bcn = AirportCode::parse("BCN").unwrap();
/// assert_eq!(bcn.as_str(), "BCN");
///
/// // Lowercase is rejected unless normalized first
/// assert!(AirportCode::parse("bcn").is_err());
/// assert_eq!(AirportCode::parse_normalized(" bcn ").unwrap(), bcn);
///
/// // Wrong length is rejected
/// assert!(AirportCode::parse("BC").is_err());
/// assert!(AirportCode::parse("BCNX").is_err());
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AirportCode([u8; 3]);

impl AirportCode {
    /// Parse an airport code from a string.
    ///
    /// The input must be exactly 3 uppercase ASCII letters (A-Z).
    pub fn parse(s: &str) -> Result<Self, InvalidAirportCode> {
        let bytes = s.as_bytes();

        if bytes.len() != 3 {
            return Err(InvalidAirportCode {
                code: s.to_string(),
                reason: "must be exactly 3 characters",
            });
        }

        if !bytes.iter().all(u8::is_ascii_uppercase) {
            return Err(InvalidAirportCode {
                code: s.to_string(),
                reason: "must be uppercase ASCII letters A-Z",
            });
        }

        Ok(AirportCode([bytes[0], bytes[1], bytes[2]]))
    }

    /// Parse user input: surrounding whitespace is trimmed and letters are
    /// upper-cased before validation.
    pub fn parse_normalized(s: &str) -> Result<Self, InvalidAirportCode> {
        Self::parse(&s.trim().to_ascii_uppercase())
    }

    /// Returns the airport code as a string slice.
    pub fn as_str(&self) -> &str {
        // Only ASCII uppercase letters are ever stored.
        std::str::from_utf8(&self.0).unwrap_or("???")
    }
}

impl fmt::Debug for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AirportCode({})", self.as_str())
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AirportCode {
    type Err = InvalidAirportCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for AirportCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_codes() {
        assert!(AirportCode::parse("BCN").is_ok());
        assert!(AirportCode::parse("PRG").is_ok());
        assert!(AirportCode::parse("AAA").is_ok());
        assert!(AirportCode::parse("ZZZ").is_ok());
    }

    #[test]
    fn reject_lowercase() {
        assert!(AirportCode::parse("bcn").is_err());
        assert!(AirportCode::parse("Bcn").is_err());
        assert!(AirportCode::parse("BCn").is_err());
    }

    #[test]
    fn reject_wrong_length() {
        assert!(AirportCode::parse("").is_err());
        assert!(AirportCode::parse("B").is_err());
        assert!(AirportCode::parse("BC").is_err());
        assert!(AirportCode::parse("BCNX").is_err());
    }

    #[test]
    fn reject_non_letters() {
        assert!(AirportCode::parse("B1N").is_err());
        assert!(AirportCode::parse("B-N").is_err());
        assert!(AirportCode::parse("B N").is_err());
        assert!(AirportCode::parse("BÖN").is_err());
    }

    #[test]
    fn normalized_accepts_user_input() {
        let prg = AirportCode::parse("PRG").unwrap();
        assert_eq!(AirportCode::parse_normalized("prg").unwrap(), prg);
        assert_eq!(AirportCode::parse_normalized("  Prg\n").unwrap(), prg);
        assert!(AirportCode::parse_normalized("pr").is_err());
    }

    #[test]
    fn error_message_names_code() {
        let err = AirportCode::parse("XY").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid airport code \"XY\": must be exactly 3 characters"
        );
    }

    #[test]
    fn display_and_debug() {
        let code = AirportCode::parse("WIW").unwrap();
        assert_eq!(format!("{}", code), "WIW");
        assert_eq!(format!("{:?}", code), "AirportCode(WIW)");
    }

    #[test]
    fn serializes_as_string() {
        let code = AirportCode::parse("DHE").unwrap();
        assert_eq!(serde_json::to_string(&code).unwrap(), "\"DHE\"");
    }

    #[test]
    fn ordering_is_alphabetical() {
        let a = AirportCode::parse("AAA").unwrap();
        let b = AirportCode::parse("AAB").unwrap();
        assert!(a < b);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Roundtrip: parse then as_str returns the original
        #[test]
        fn roundtrip(s in "[A-Z]{3}") {
            let code = AirportCode::parse(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.as_str());
        }

        /// Lowercase input only parses through the normalizing constructor
        #[test]
        fn lowercase_needs_normalizing(s in "[a-z]{3}") {
            prop_assert!(AirportCode::parse(&s).is_err());
            let code = AirportCode::parse_normalized(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.to_ascii_uppercase());
        }

        /// Wrong-length strings are always rejected
        #[test]
        fn wrong_length_rejected(s in "[A-Z]{0,2}|[A-Z]{4,10}") {
            prop_assert!(AirportCode::parse(&s).is_err());
        }
    }
}
