//! Error types shared across the crate.

use thiserror::Error;

use crate::zones::ZoneId;

/// Errors returned by zone management, configuration and persistence.
///
/// None of these are fatal: the caller decides whether to re-prompt, retry
/// or fall back to defaults.
#[derive(Debug, Error)]
pub enum Error {
    /// A zone polygon was defined with fewer than three vertices.
    #[error("invalid zone: {vertices} vertices given, at least 3 required")]
    InvalidZone { vertices: usize },

    /// The persisted zone document does not match the expected schema.
    #[error("malformed zone file: {reason}")]
    MalformedZoneFile { reason: String },

    #[error("zone {0} not found")]
    ZoneNotFound(ZoneId),

    /// Every zone id up to `u32::MAX` has been handed out.
    #[error("no zone ids left, clear the zone set to start over")]
    ZoneIdsExhausted,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedZoneFile {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        if err.is_io() {
            Self::Io(err.into())
        } else {
            Self::malformed(err.to_string())
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_syntax_error_is_malformed() {
        let err = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        assert!(matches!(Error::from(err), Error::MalformedZoneFile { .. }));
    }

    #[test]
    fn test_invalid_zone_message() {
        let err = Error::InvalidZone { vertices: 2 };
        assert_eq!(
            err.to_string(),
            "invalid zone: 2 vertices given, at least 3 required"
        );
    }
}
