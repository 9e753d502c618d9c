// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use upscalex_domain::{FieldSpec, FormState, validate_field};

/// A failed field check, as surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    /// The field name.
    pub field: String,
    /// The validation message.
    pub message: String,
}

/// One page of a wizard: its fields and the gate that guards leaving it.
///
/// Step definitions are immutable once placed in a `WizardDefinition`,
/// which assigns the ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepDefinition {
    id: String,
    ordinal: usize,
    title: String,
    fields: Vec<FieldSpec>,
}

impl StepDefinition {
    /// Creates a step with no fields.
    #[must_use]
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ordinal: 0,
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// Adds a field declaration.
    #[must_use]
    pub fn field(mut self, spec: FieldSpec) -> Self {
        self.fields.push(spec);
        self
    }

    /// Returns the step identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the 1-based position of this step in its wizard.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Returns the step title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the declared fields.
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Returns true when every field of the step validates.
    ///
    /// Required fields must be filled and well formed; optional fields only
    /// need to be well formed when filled. A step without fields is always
    /// complete. This is evaluated fresh on every call.
    #[must_use]
    pub fn is_complete(&self, form: &FormState) -> bool {
        self.fields
            .iter()
            .all(|spec| validate_field(spec, form).valid)
    }

    /// Returns every failing field with its message, in declaration order.
    #[must_use]
    pub fn issues(&self, form: &FormState) -> Vec<FieldIssue> {
        self.fields
            .iter()
            .filter_map(|spec| {
                let result = validate_field(spec, form);
                if result.valid {
                    None
                } else {
                    Some(FieldIssue {
                        field: spec.name.clone(),
                        message: result
                            .message
                            .unwrap_or_else(|| format!("{} is invalid", spec.label)),
                    })
                }
            })
            .collect()
    }

    /// Returns the names of required fields that are currently blank.
    #[must_use]
    pub fn missing_fields(&self, form: &FormState) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|spec| spec.requirement.is_active(form) && form.is_blank(&spec.name))
            .map(|spec| spec.name.as_str())
            .collect()
    }

    pub(crate) fn set_ordinal(&mut self, ordinal: usize) {
        self.ordinal = ordinal;
    }
}
