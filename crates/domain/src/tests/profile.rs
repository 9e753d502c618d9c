// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::form_with;
use crate::{DomainError, FormState, Role, RoleProfile};

#[test]
fn test_role_parses_case_insensitively() {
    assert_eq!("Startup".parse::<Role>(), Ok(Role::Startup));
    assert_eq!(" mentor ".parse::<Role>(), Ok(Role::Mentor));
    assert_eq!(
        "pirate".parse::<Role>(),
        Err(DomainError::UnknownRole(String::from("pirate")))
    );
}

#[test]
fn test_profile_reads_only_selected_role_fields() {
    let form: FormState = form_with(&[
        ("role", "student"),
        ("university", "IIT Bombay"),
        ("graduationYear", "2027"),
        ("companyName", "left over from startup"),
    ]);

    let profile: RoleProfile = RoleProfile::from_form(&form).unwrap();
    assert_eq!(
        profile,
        RoleProfile::Student {
            university: String::from("IIT Bombay"),
            graduation_year: 2027,
        }
    );
}

#[test]
fn test_profile_reports_missing_role_field() {
    let form: FormState = form_with(&[("role", "investor"), ("firmName", "Seedfund")]);

    assert_eq!(
        RoleProfile::from_form(&form),
        Err(DomainError::MissingProfileField {
            role: String::from("investor"),
            field: String::from("ticketSize"),
        })
    );
}

#[test]
fn test_profile_reports_unparseable_number() {
    let form: FormState = form_with(&[
        ("role", "mentor"),
        ("expertise", "Go-to-market"),
        ("yearsExperience", "a decade"),
    ]);

    assert!(matches!(
        RoleProfile::from_form(&form),
        Err(DomainError::InvalidProfileField { field, .. }) if field == "yearsExperience"
    ));
}

#[test]
fn test_profile_requires_role() {
    assert!(matches!(
        RoleProfile::from_form(&FormState::new()),
        Err(DomainError::UnknownRole(_))
    ));
}

#[test]
fn test_freelancer_skills_split_on_commas() {
    let form: FormState = form_with(&[
        ("role", "freelancer"),
        ("skills", "rust, design, ,copywriting"),
        ("hourlyRate", "45"),
    ]);

    let profile: RoleProfile = RoleProfile::from_form(&form).unwrap();
    assert_eq!(
        profile,
        RoleProfile::Freelancer {
            skills: vec![
                String::from("rust"),
                String::from("design"),
                String::from("copywriting"),
            ],
            hourly_rate: 45,
        }
    );
}

#[test]
fn test_profile_written_into_form_reads_back_identically() {
    let profile: RoleProfile = RoleProfile::Startup {
        company_name: String::from("Kisan Labs"),
        stage: String::from("seed"),
        industry: String::from("agritech"),
    };

    let mut form: FormState = FormState::new();
    profile.write_into(&mut form);

    assert_eq!(form.text("role"), Some("startup"));
    assert_eq!(RoleProfile::from_form(&form), Ok(profile));
}

#[test]
fn test_profile_serializes_with_role_tag() {
    let profile: RoleProfile = RoleProfile::Mentor {
        expertise: String::from("fundraising"),
        years_experience: 12,
    };
    let json: serde_json::Value = serde_json::to_value(&profile).unwrap();
    assert_eq!(json["role"], "mentor");
    assert_eq!(json["years_experience"], 12);
}

#[test]
fn test_every_role_declares_profile_fields() {
    for role in Role::ALL {
        assert!(!role.profile_fields().is_empty(), "{role}");
    }
}
