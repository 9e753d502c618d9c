// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use upscalex_domain::FormState;

use crate::data_models::DraftRow;
use crate::diesel_schema::drafts;
use crate::error::PersistenceError;
use crate::store::{DraftKey, DraftRecord};

/// Loads the draft stored under a key.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `key` - The draft key
///
/// # Returns
///
/// * `Ok(Some(record))` if a draft exists
/// * `Ok(None)` if no draft was saved under the key
///
/// # Errors
///
/// Returns an error if the query fails or the stored row cannot be decoded.
pub fn load_draft(
    conn: &mut SqliteConnection,
    key: &DraftKey,
) -> Result<Option<DraftRecord>, PersistenceError> {
    let row: Option<DraftRow> = drafts::table
        .filter(drafts::draft_key.eq(key.to_string()))
        .select(DraftRow::as_select())
        .first::<DraftRow>(conn)
        .optional()?;

    row.map(|row| decode(key, row)).transpose()
}

fn decode(key: &DraftKey, row: DraftRow) -> Result<DraftRecord, PersistenceError> {
    let corrupt = |reason: String| PersistenceError::CorruptDraft {
        key: key.to_string(),
        reason,
    };

    let form: FormState = serde_json::from_str(&row.form_json).map_err(|e| corrupt(e.to_string()))?;
    let current_ordinal: usize =
        usize::try_from(row.current_ordinal).map_err(|e| corrupt(e.to_string()))?;
    let revision: u64 = u64::try_from(row.revision).map_err(|e| corrupt(e.to_string()))?;
    let saved_at: OffsetDateTime =
        OffsetDateTime::parse(&row.saved_at, &Rfc3339).map_err(|e| corrupt(e.to_string()))?;

    Ok(DraftRecord {
        key: key.clone(),
        form,
        current_ordinal,
        revision,
        saved_at,
    })
}
