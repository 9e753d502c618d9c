// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod profile;

use crate::{FieldValue, FormState};

pub fn form_with(fields: &[(&str, &str)]) -> FormState {
    fields
        .iter()
        .map(|(name, value)| (*name, FieldValue::text(*value)))
        .collect()
}
