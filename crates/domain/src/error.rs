// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors raised while interpreting form values as domain data.
///
/// Field validation itself never fails with an error; it reports a
/// `ValidationResult`. These errors cover conversions at the
/// serialization boundary, where a validated form is turned into typed data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The role value is not one of the supported roles.
    UnknownRole(String),
    /// A field required by the selected role is absent or blank.
    MissingProfileField {
        /// The role whose profile was being built.
        role: String,
        /// The missing field name.
        field: String,
    },
    /// A role profile field holds a value that cannot be interpreted.
    InvalidProfileField {
        /// The offending field name.
        field: String,
        /// Why the value was rejected.
        reason: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownRole(role) => write!(f, "Unknown role '{role}'"),
            Self::MissingProfileField { role, field } => {
                write!(f, "Field '{field}' is required for the {role} role")
            }
            Self::InvalidProfileField { field, reason } => {
                write!(f, "Invalid value for field '{field}': {reason}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
