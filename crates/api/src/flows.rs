// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The wizards the platform offers.

use std::str::FromStr;
use upscalex::{ConfigurationError, StepDefinition, WizardDefinition};
use upscalex_domain::{
    COMPANY_NAME_FIELD, EXPERTISE_FIELD, FIRM_NAME_FIELD, FieldSpec, FormState,
    GRADUATION_YEAR_FIELD, HOURLY_RATE_FIELD, INDUSTRY_FIELD, ROLE_FIELD, Role, RoleProfile, Rule,
    SKILLS_FIELD, STARTUP_STAGE_FIELD, TICKET_SIZE_FIELD, UNIVERSITY_FIELD, YEARS_EXPERIENCE_FIELD,
};

use crate::error::ApiError;

/// Services a member can apply for.
pub const SERVICES: [&str; 5] = ["mentorship", "legal", "internship", "bootcamp", "funding"];
/// Ticket types for events.
pub const TICKET_TYPES: [&str; 3] = ["general", "student", "vip"];
/// Startup stages.
pub const STARTUP_STAGES: [&str; 5] = ["idea", "mvp", "seed", "series-a", "growth"];

/// The field receiving completed uploads in the application flow.
pub const ATTACHMENTS_FIELD: &str = "attachments";

/// One of the wizards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlowKind {
    /// Member signup with role-specific details.
    Signup,
    /// Application to a service.
    Apply,
    /// Registration for an event.
    EventRegistration,
}

impl FlowKind {
    /// Every flow.
    pub const ALL: [Self; 3] = [Self::Signup, Self::Apply, Self::EventRegistration];

    /// Returns the flow name used in URLs and draft keys.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Signup => "signup",
            Self::Apply => "apply",
            Self::EventRegistration => "event-registration",
        }
    }

    /// Returns the human-readable flow title.
    #[must_use]
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Signup => "Signup",
            Self::Apply => "Service application",
            Self::EventRegistration => "Event registration",
        }
    }

    /// Returns the prefix of receipt references for this flow.
    #[must_use]
    pub const fn reference_prefix(&self) -> &'static str {
        match self {
            Self::Signup => "SGN",
            Self::Apply => "APP",
            Self::EventRegistration => "EVT",
        }
    }

    /// Builds the wizard definition for this flow.
    ///
    /// # Errors
    ///
    /// Returns an error if the definition is inconsistent.
    pub fn definition(&self) -> Result<WizardDefinition, ConfigurationError> {
        match self {
            Self::Signup => signup(),
            Self::Apply => apply(),
            Self::EventRegistration => event_registration(),
        }
    }

    /// Returns the typed role profile carried with a submission, if this
    /// flow has one.
    ///
    /// # Errors
    ///
    /// Returns an error if the signup form does not describe a valid profile.
    pub fn profile(&self, form: &FormState) -> Result<Option<RoleProfile>, ApiError> {
        match self {
            Self::Signup => RoleProfile::from_form(form)
                .map(Some)
                .map_err(|e| ApiError::InvalidInput {
                    field: String::from(ROLE_FIELD),
                    message: e.to_string(),
                }),
            Self::Apply | Self::EventRegistration => Ok(None),
        }
    }
}

impl std::fmt::Display for FlowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FlowKind {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|flow| flow.as_str() == s)
            .ok_or_else(|| ApiError::ResourceNotFound {
                resource_type: String::from("Wizard"),
                message: format!("No wizard named '{s}'"),
            })
    }
}

fn choices(values: &[&str]) -> Rule {
    Rule::OneOf(values.iter().map(|v| String::from(*v)).collect())
}

fn full_name() -> FieldSpec {
    FieldSpec::text("fullName", "Full name")
        .required()
        .rule(Rule::MinLength(2))
        .rule(Rule::MaxLength(100))
}

fn email() -> FieldSpec {
    FieldSpec::text("email", "Email")
        .required()
        .rule(Rule::Email)
}

fn phone() -> FieldSpec {
    FieldSpec::text("phone", "Phone")
        .required()
        .rule(Rule::Phone)
}

fn role_field(name: &str) -> FieldSpec {
    let roles: Vec<&str> = Role::ALL.iter().map(Role::as_str).collect();
    FieldSpec::text(name, "Role")
        .required()
        .rule(choices(&roles))
}

fn for_role(spec: FieldSpec, role: Role) -> FieldSpec {
    spec.required_when(ROLE_FIELD, role.as_str())
}

fn signup() -> Result<WizardDefinition, ConfigurationError> {
    WizardDefinition::new(
        FlowKind::Signup.as_str(),
        vec![
            StepDefinition::new("account", "Your account")
                .field(full_name())
                .field(email())
                .field(phone()),
            StepDefinition::new("role", "Your role")
                .field(role_field(ROLE_FIELD))
                .field(for_role(
                    FieldSpec::text(COMPANY_NAME_FIELD, "Company name"),
                    Role::Startup,
                ))
                .field(
                    for_role(
                        FieldSpec::text(STARTUP_STAGE_FIELD, "Startup stage"),
                        Role::Startup,
                    )
                    .rule(choices(&STARTUP_STAGES)),
                )
                .field(for_role(
                    FieldSpec::text(INDUSTRY_FIELD, "Industry"),
                    Role::Startup,
                ))
                .field(for_role(
                    FieldSpec::text(UNIVERSITY_FIELD, "University"),
                    Role::Student,
                ))
                .field(
                    for_role(
                        FieldSpec::text(GRADUATION_YEAR_FIELD, "Graduation year"),
                        Role::Student,
                    )
                    .rule(Rule::Integer {
                        min: 1950,
                        max: 2100,
                    }),
                )
                .field(for_role(
                    FieldSpec::text(EXPERTISE_FIELD, "Expertise"),
                    Role::Mentor,
                ))
                .field(
                    for_role(
                        FieldSpec::text(YEARS_EXPERIENCE_FIELD, "Years of experience"),
                        Role::Mentor,
                    )
                    .rule(Rule::Integer { min: 0, max: 80 }),
                )
                .field(for_role(
                    FieldSpec::text(FIRM_NAME_FIELD, "Firm"),
                    Role::Investor,
                ))
                .field(for_role(
                    FieldSpec::text(TICKET_SIZE_FIELD, "Ticket size"),
                    Role::Investor,
                ))
                .field(for_role(
                    FieldSpec::text(SKILLS_FIELD, "Skills"),
                    Role::Freelancer,
                ))
                .field(
                    for_role(
                        FieldSpec::text(HOURLY_RATE_FIELD, "Hourly rate"),
                        Role::Freelancer,
                    )
                    .rule(Rule::Integer {
                        min: 1,
                        max: 10_000,
                    }),
                ),
            StepDefinition::new("security", "Security")
                .field(
                    FieldSpec::text("password", "Password")
                        .required()
                        .rule(Rule::StrongPassword {
                            min_length: 6,
                            min_classes: 2,
                        }),
                )
                .field(
                    FieldSpec::text("confirmPassword", "Confirm password")
                        .required()
                        .rule(Rule::MatchesField(String::from("password"))),
                ),
            StepDefinition::new("terms", "Terms")
                .field(
                    FieldSpec::flag("acceptTerms", "Terms of service")
                        .required()
                        .rule(Rule::Accepted),
                )
                .field(FieldSpec::flag("newsletter", "Newsletter")),
        ],
    )?
    .with_hint("role", ROLE_FIELD)
}

fn apply() -> Result<WizardDefinition, ConfigurationError> {
    WizardDefinition::new(
        FlowKind::Apply.as_str(),
        vec![
            StepDefinition::new("service", "Choose a service")
                .field(
                    FieldSpec::text("serviceId", "Service")
                        .required()
                        .rule(choices(&SERVICES)),
                )
                .field(role_field("applicantRole")),
            StepDefinition::new("details", "Your details")
                .field(full_name())
                .field(email())
                .field(phone())
                .field(
                    FieldSpec::text("organization", "Organization").rule(Rule::MaxLength(120)),
                )
                .field(
                    FieldSpec::text("motivation", "Motivation")
                        .required()
                        .rule(Rule::MinLength(20))
                        .rule(Rule::MaxLength(2_000)),
                ),
            StepDefinition::new("documents", "Documents")
                .field(FieldSpec::files(ATTACHMENTS_FIELD, "Attachments"))
                .field(
                    FieldSpec::text("portfolioUrl", "Portfolio link").rule(Rule::MaxLength(300)),
                ),
            StepDefinition::new("review", "Review").field(
                FieldSpec::flag("confirmAccuracy", "Accuracy confirmation")
                    .required()
                    .rule(Rule::Accepted),
            ),
        ],
    )?
    .with_hint("service", "serviceId")?
    .with_hint("role", "applicantRole")?
    .with_upload_field(ATTACHMENTS_FIELD)
}

fn event_registration() -> Result<WizardDefinition, ConfigurationError> {
    WizardDefinition::new(
        FlowKind::EventRegistration.as_str(),
        vec![
            StepDefinition::new("event", "Choose an event")
                .field(FieldSpec::text("eventId", "Event").required())
                .field(
                    FieldSpec::text("ticketType", "Ticket type")
                        .required()
                        .rule(choices(&TICKET_TYPES)),
                ),
            StepDefinition::new("attendee", "Attendee")
                .field(full_name())
                .field(email())
                .field(phone())
                .field(
                    FieldSpec::text("organization", "Organization").rule(Rule::MaxLength(120)),
                ),
            StepDefinition::new("preferences", "Preferences")
                .field(
                    FieldSpec::text("dietaryRequirements", "Dietary requirements")
                        .rule(Rule::MaxLength(200)),
                )
                .field(
                    FieldSpec::flag("agreeToCodeOfConduct", "Code of conduct")
                        .required()
                        .rule(Rule::Accepted),
                ),
        ],
    )?
    .with_hint("event", "eventId")
}
