// src/error.rs
//
// Per-image extraction failures. Missing tags are never errors; they surface
// as absent fields on the record.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GpsError {
    /// A rational value had a zero denominator (corrupt source metadata)
    #[error("division by zero in rational value of {tag}")]
    DivisionByZero { tag: String },

    /// GPSDateStamp / GPSTimeStamp could not be composed into a timestamp
    #[error("malformed timestamp in {field}: {reason}")]
    MalformedTimestamp { field: String, reason: String },

    /// A coordinate tag was not a (degrees, minutes, seconds) triplet
    #[error("malformed coordinate in {tag}: {reason}")]
    MalformedCoordinate { tag: String, reason: String },
}

impl GpsError {
    pub fn division_by_zero(tag: impl Into<String>) -> Self {
        GpsError::DivisionByZero { tag: tag.into() }
    }

    pub fn malformed_timestamp(field: impl Into<String>, reason: impl Into<String>) -> Self {
        GpsError::MalformedTimestamp { field: field.into(), reason: reason.into() }
    }

    pub fn malformed_coordinate(tag: impl Into<String>, reason: impl Into<String>) -> Self {
        GpsError::MalformedCoordinate { tag: tag.into(), reason: reason.into() }
    }

    /// Name of the tag that caused the failure
    pub fn tag(&self) -> &str {
        match self {
            GpsError::DivisionByZero { tag } => tag,
            GpsError::MalformedTimestamp { field, .. } => field,
            GpsError::MalformedCoordinate { tag, .. } => tag,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_tag() {
        let err = GpsError::division_by_zero("GPSAltitude");
        assert_eq!(err.to_string(), "division by zero in rational value of GPSAltitude");
        assert_eq!(err.tag(), "GPSAltitude");

        let err = GpsError::malformed_timestamp("GPSDateStamp", "expected YYYY:MM:DD");
        assert_eq!(err.tag(), "GPSDateStamp");
        assert!(err.to_string().contains("expected YYYY:MM:DD"));
    }
}
