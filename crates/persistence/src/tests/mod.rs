// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod in_memory_tests;

use crate::DraftKey;
use upscalex_domain::{FieldValue, FileRef, FormState};

pub fn create_test_key(session: &str) -> DraftKey {
    DraftKey::new("signup", session).unwrap()
}

/// A form with one field of every kind; the attachment carries a handle.
pub fn create_test_form() -> FormState {
    [
        ("fullName", FieldValue::text("Ada Lovelace")),
        ("email", FieldValue::text("ada@example.com")),
        ("acceptTerms", FieldValue::Flag(true)),
        (
            "attachments",
            FieldValue::Files(vec![
                FileRef::new("f-1", "cv.pdf", 1_024)
                    .with_content_type("application/pdf")
                    .with_handle("/tmp/uploads/f-1"),
            ]),
        ),
    ]
    .into_iter()
    .collect()
}
