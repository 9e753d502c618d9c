// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod error;
mod profile;
mod types;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use profile::{
    COMPANY_NAME_FIELD, EXPERTISE_FIELD, FIRM_NAME_FIELD, GRADUATION_YEAR_FIELD,
    HOURLY_RATE_FIELD, INDUSTRY_FIELD, ROLE_FIELD, Role, RoleProfile, SKILLS_FIELD,
    STARTUP_STAGE_FIELD, TICKET_SIZE_FIELD, UNIVERSITY_FIELD, YEARS_EXPERIENCE_FIELD,
};
pub use types::{FieldKind, FieldValue, FileRef, FormState};
pub use validation::{FieldSpec, Requirement, Rule, ValidationResult, validate, validate_field};
