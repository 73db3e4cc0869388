//! Stable, machine-readable codes for spec diagnostics.

use serde::{Deserialize, Serialize};

/// Category of a validation finding.
///
/// Codes serialize as snake_case strings and are part of the JSON contract;
/// do not rename variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The `v` field names a version this crate does not understand.
    UnsupportedVersion,
    /// A selector (e.g. the glue function) names nothing known.
    UnknownModule,
    /// A numeric parameter is outside its admissible range.
    InvalidValue,
    /// A limit is set to a value that disables the stage entirely.
    LimitExceeded,
    /// A field is not part of the schema.
    UnknownField,
    /// Catch-all for rules registered outside this crate.
    ValidationFailed,
}

impl ErrorCode {
    /// Returns the user-facing name used in JSON and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UnsupportedVersion => "unsupported_version",
            Self::UnknownModule => "unknown_module",
            Self::InvalidValue => "invalid_value",
            Self::LimitExceeded => "limit_exceeded",
            Self::UnknownField => "unknown_field",
            Self::ValidationFailed => "validation_failed",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
