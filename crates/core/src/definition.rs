// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::ConfigurationError;
use crate::step::StepDefinition;
use std::collections::{BTreeMap, HashSet};
use upscalex_domain::{FieldKind, FieldSpec, FormState};

/// The ordinal of the first step of every wizard.
pub const FIRST_ORDINAL: usize = 1;

/// An ordered, validated set of steps for one flow.
///
/// Construction checks the definition for programmer errors (no steps,
/// duplicate identifiers, references to undeclared fields) so that a broken
/// wizard is caught at startup or in tests, never by a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardDefinition {
    flow: String,
    steps: Vec<StepDefinition>,
    hints: BTreeMap<String, String>,
    upload_field: Option<String>,
}

impl WizardDefinition {
    /// Builds a definition, assigning ordinals 1..=n in declaration order.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No steps are given
    /// - Two steps share an identifier
    /// - A field name is declared twice
    /// - A field refers to a field no step declares
    pub fn new(
        flow: impl Into<String>,
        steps: Vec<StepDefinition>,
    ) -> Result<Self, ConfigurationError> {
        let flow: String = flow.into();

        if steps.is_empty() {
            return Err(ConfigurationError::EmptyWizard { flow });
        }

        let mut step_ids: HashSet<&str> = HashSet::new();
        let mut field_names: HashSet<&str> = HashSet::new();
        for step in &steps {
            if !step_ids.insert(step.id()) {
                return Err(ConfigurationError::DuplicateStepId {
                    flow,
                    step_id: step.id().to_string(),
                });
            }
            for spec in step.fields() {
                if !field_names.insert(spec.name.as_str()) {
                    return Err(ConfigurationError::DuplicateField {
                        flow,
                        field: spec.name.clone(),
                    });
                }
            }
        }

        for step in &steps {
            for spec in step.fields() {
                if let Some(referenced) = spec
                    .referenced_fields()
                    .find(|name| !field_names.contains(name))
                {
                    return Err(ConfigurationError::UnknownFieldReference {
                        flow,
                        step_id: step.id().to_string(),
                        field: spec.name.clone(),
                        referenced: referenced.to_string(),
                    });
                }
            }
        }

        let steps: Vec<StepDefinition> = steps
            .into_iter()
            .enumerate()
            .map(|(index, mut step)| {
                step.set_ordinal(index + FIRST_ORDINAL);
                step
            })
            .collect();

        Ok(Self {
            flow,
            steps,
            hints: BTreeMap::new(),
            upload_field: None,
        })
    }

    /// Maps an entry hint key onto a text field.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is not a declared text field.
    pub fn with_hint(
        mut self,
        hint: impl Into<String>,
        field: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let hint: String = hint.into();
        let field: String = field.into();
        if self.field(&field).map(|spec| spec.kind) != Some(FieldKind::Text) {
            return Err(ConfigurationError::InvalidHintTarget {
                flow: self.flow,
                hint,
                field,
            });
        }
        self.hints.insert(hint, field);
        Ok(self)
    }

    /// Names the files field that receives completed uploads.
    ///
    /// # Errors
    ///
    /// Returns an error if the field is not a declared files field.
    pub fn with_upload_field(
        mut self,
        field: impl Into<String>,
    ) -> Result<Self, ConfigurationError> {
        let field: String = field.into();
        if self.field(&field).map(|spec| spec.kind) != Some(FieldKind::Files) {
            return Err(ConfigurationError::InvalidUploadField {
                flow: self.flow,
                field,
            });
        }
        self.upload_field = Some(field);
        Ok(self)
    }

    /// Returns the flow name.
    #[must_use]
    pub fn flow(&self) -> &str {
        &self.flow
    }

    /// Returns the steps in order.
    #[must_use]
    pub fn steps(&self) -> &[StepDefinition] {
        &self.steps
    }

    /// Returns the number of steps.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }

    /// Returns the ordinal of the last step.
    #[must_use]
    pub fn final_ordinal(&self) -> usize {
        self.steps.len()
    }

    /// Returns true if `ordinal` is the last step.
    #[must_use]
    pub fn is_final(&self, ordinal: usize) -> bool {
        ordinal == self.final_ordinal()
    }

    /// Returns the step at a 1-based ordinal.
    #[must_use]
    pub fn step(&self, ordinal: usize) -> Option<&StepDefinition> {
        ordinal
            .checked_sub(FIRST_ORDINAL)
            .and_then(|index| self.steps.get(index))
    }

    /// Returns the declaration of a field.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.steps
            .iter()
            .flat_map(StepDefinition::fields)
            .find(|spec| spec.name == name)
    }

    /// Returns the field an entry hint key populates.
    #[must_use]
    pub fn hint_field(&self, hint: &str) -> Option<&str> {
        self.hints.get(hint).map(String::as_str)
    }

    /// Returns the files field that receives completed uploads.
    #[must_use]
    pub fn upload_field(&self) -> Option<&str> {
        self.upload_field.as_deref()
    }

    /// Returns a copy of the form without its dormant conditional fields.
    ///
    /// Undeclared fields are kept.
    #[must_use]
    pub fn without_dormant_fields(&self, form: &FormState) -> FormState {
        form.iter()
            .filter(|(name, _)| {
                self.field(name)
                    .is_none_or(|spec| !spec.requirement.is_dormant(form))
            })
            .map(|(name, value)| (name, value.clone()))
            .collect()
    }

    /// Returns the first step before `target` whose gate is closed.
    #[must_use]
    pub fn first_incomplete_before(
        &self,
        target: usize,
        form: &FormState,
    ) -> Option<&StepDefinition> {
        self.steps
            .iter()
            .take_while(|step| step.ordinal() < target)
            .find(|step| !step.is_complete(form))
    }

    /// Returns the furthest ordinal, not beyond `requested`, that the form
    /// can legitimately be at.
    #[must_use]
    pub fn furthest_reachable(&self, requested: usize, form: &FormState) -> usize {
        let requested: usize = requested.clamp(FIRST_ORDINAL, self.final_ordinal());
        self.first_incomplete_before(requested, form)
            .map_or(requested, StepDefinition::ordinal)
    }
}
