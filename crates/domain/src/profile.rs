// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Role-specific signup data.
//!
//! The signup form stores every answer in one flat `FormState`. Each role
//! only owns a handful of those fields, so the typed view is a tagged union:
//! a `RoleProfile` variant carries exactly the fields of its role and is
//! converted to and from the flat form at the serialization boundary.

use crate::error::DomainError;
use crate::types::{FieldValue, FormState};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Name of the field holding the selected role.
pub const ROLE_FIELD: &str = "role";

pub const COMPANY_NAME_FIELD: &str = "companyName";
pub const STARTUP_STAGE_FIELD: &str = "startupStage";
pub const INDUSTRY_FIELD: &str = "industry";
pub const UNIVERSITY_FIELD: &str = "university";
pub const GRADUATION_YEAR_FIELD: &str = "graduationYear";
pub const EXPERTISE_FIELD: &str = "expertise";
pub const YEARS_EXPERIENCE_FIELD: &str = "yearsExperience";
pub const FIRM_NAME_FIELD: &str = "firmName";
pub const TICKET_SIZE_FIELD: &str = "ticketSize";
pub const SKILLS_FIELD: &str = "skills";
pub const HOURLY_RATE_FIELD: &str = "hourlyRate";

/// The kinds of member the platform serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Startup,
    Student,
    Mentor,
    Investor,
    Freelancer,
}

impl Role {
    /// Every role, in display order.
    pub const ALL: [Self; 5] = [
        Self::Startup,
        Self::Student,
        Self::Mentor,
        Self::Investor,
        Self::Freelancer,
    ];

    /// Returns the wire value of this role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Startup => "startup",
            Self::Student => "student",
            Self::Mentor => "mentor",
            Self::Investor => "investor",
            Self::Freelancer => "freelancer",
        }
    }

    /// Returns the form fields this role owns.
    #[must_use]
    pub const fn profile_fields(&self) -> &'static [&'static str] {
        match self {
            Self::Startup => &[COMPANY_NAME_FIELD, STARTUP_STAGE_FIELD, INDUSTRY_FIELD],
            Self::Student => &[UNIVERSITY_FIELD, GRADUATION_YEAR_FIELD],
            Self::Mentor => &[EXPERTISE_FIELD, YEARS_EXPERIENCE_FIELD],
            Self::Investor => &[FIRM_NAME_FIELD, TICKET_SIZE_FIELD],
            Self::Freelancer => &[SKILLS_FIELD, HOURLY_RATE_FIELD],
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownRole(s.to_string()))
    }
}

/// The typed, per-role part of a signup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum RoleProfile {
    Startup {
        company_name: String,
        stage: String,
        industry: String,
    },
    Student {
        university: String,
        graduation_year: u16,
    },
    Mentor {
        expertise: String,
        years_experience: u8,
    },
    Investor {
        firm: String,
        ticket_size: String,
    },
    Freelancer {
        skills: Vec<String>,
        hourly_rate: u32,
    },
}

impl RoleProfile {
    /// Returns the role of this profile.
    #[must_use]
    pub const fn role(&self) -> Role {
        match self {
            Self::Startup { .. } => Role::Startup,
            Self::Student { .. } => Role::Student,
            Self::Mentor { .. } => Role::Mentor,
            Self::Investor { .. } => Role::Investor,
            Self::Freelancer { .. } => Role::Freelancer,
        }
    }

    /// Builds the profile for the role selected in a flat form.
    ///
    /// Fields belonging to other roles are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The role field is absent or names an unknown role
    /// - A field of the selected role is blank
    /// - A numeric field cannot be parsed
    pub fn from_form(form: &FormState) -> Result<Self, DomainError> {
        let role: Role = form
            .text(ROLE_FIELD)
            .ok_or_else(|| DomainError::UnknownRole(String::new()))?
            .parse()?;

        let profile: Self = match role {
            Role::Startup => Self::Startup {
                company_name: required_text(form, role, COMPANY_NAME_FIELD)?,
                stage: required_text(form, role, STARTUP_STAGE_FIELD)?,
                industry: required_text(form, role, INDUSTRY_FIELD)?,
            },
            Role::Student => Self::Student {
                university: required_text(form, role, UNIVERSITY_FIELD)?,
                graduation_year: required_number(form, role, GRADUATION_YEAR_FIELD)?,
            },
            Role::Mentor => Self::Mentor {
                expertise: required_text(form, role, EXPERTISE_FIELD)?,
                years_experience: required_number(form, role, YEARS_EXPERIENCE_FIELD)?,
            },
            Role::Investor => Self::Investor {
                firm: required_text(form, role, FIRM_NAME_FIELD)?,
                ticket_size: required_text(form, role, TICKET_SIZE_FIELD)?,
            },
            Role::Freelancer => Self::Freelancer {
                skills: required_text(form, role, SKILLS_FIELD)?
                    .split(',')
                    .map(str::trim)
                    .filter(|skill| !skill.is_empty())
                    .map(String::from)
                    .collect(),
                hourly_rate: required_number(form, role, HOURLY_RATE_FIELD)?,
            },
        };

        Ok(profile)
    }

    /// Writes this profile back into a flat form, including the role field.
    pub fn write_into(&self, form: &mut FormState) {
        form.set(ROLE_FIELD, FieldValue::text(self.role().as_str()));
        match self {
            Self::Startup {
                company_name,
                stage,
                industry,
            } => {
                form.set(COMPANY_NAME_FIELD, FieldValue::text(company_name));
                form.set(STARTUP_STAGE_FIELD, FieldValue::text(stage));
                form.set(INDUSTRY_FIELD, FieldValue::text(industry));
            }
            Self::Student {
                university,
                graduation_year,
            } => {
                form.set(UNIVERSITY_FIELD, FieldValue::text(university));
                form.set(
                    GRADUATION_YEAR_FIELD,
                    FieldValue::text(graduation_year.to_string()),
                );
            }
            Self::Mentor {
                expertise,
                years_experience,
            } => {
                form.set(EXPERTISE_FIELD, FieldValue::text(expertise));
                form.set(
                    YEARS_EXPERIENCE_FIELD,
                    FieldValue::text(years_experience.to_string()),
                );
            }
            Self::Investor { firm, ticket_size } => {
                form.set(FIRM_NAME_FIELD, FieldValue::text(firm));
                form.set(TICKET_SIZE_FIELD, FieldValue::text(ticket_size));
            }
            Self::Freelancer {
                skills,
                hourly_rate,
            } => {
                form.set(SKILLS_FIELD, FieldValue::text(skills.join(", ")));
                form.set(HOURLY_RATE_FIELD, FieldValue::text(hourly_rate.to_string()));
            }
        }
    }
}

fn required_text(form: &FormState, role: Role, field: &str) -> Result<String, DomainError> {
    form.text(field)
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(String::from)
        .ok_or_else(|| DomainError::MissingProfileField {
            role: role.as_str().to_string(),
            field: field.to_string(),
        })
}

fn required_number<T: FromStr>(
    form: &FormState,
    role: Role,
    field: &str,
) -> Result<T, DomainError> {
    let text: String = required_text(form, role, field)?;
    text.parse::<T>()
        .map_err(|_| DomainError::InvalidProfileField {
            field: field.to_string(),
            reason: format!("'{text}' is not a valid number"),
        })
}
