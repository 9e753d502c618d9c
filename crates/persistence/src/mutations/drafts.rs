// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Draft mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;
use upscalex_domain::FormState;

use crate::data_models::DraftRow;
use crate::diesel_schema::drafts;
use crate::error::PersistenceError;
use crate::store::{DraftKey, DraftRecord};

/// Saves a draft, replacing any earlier save under the same key.
///
/// The revision read and the write happen in one transaction, so two saves
/// of the same key always produce consecutive revisions.
///
/// # Arguments
///
/// * `conn` - The database connection
/// * `key` - The draft key
/// * `form` - The form to save
/// * `current_ordinal` - The step the user is on
///
/// # Errors
///
/// Returns an error if the form cannot be serialized or the write fails.
pub fn save_draft(
    conn: &mut SqliteConnection,
    key: &DraftKey,
    form: &FormState,
    current_ordinal: usize,
) -> Result<DraftRecord, PersistenceError> {
    let form: FormState = form.without_file_handles();
    let form_json: String = serde_json::to_string(&form)?;
    let ordinal: i64 = i64::try_from(current_ordinal)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let saved_at: OffsetDateTime = OffsetDateTime::now_utc();
    let saved_at_text: String = saved_at
        .format(&Rfc3339)
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))?;
    let draft_key: String = key.to_string();

    let revision: i64 = conn.transaction::<i64, PersistenceError, _>(|conn| {
        let previous: Option<i64> = drafts::table
            .filter(drafts::draft_key.eq(&draft_key))
            .select(drafts::revision)
            .first::<i64>(conn)
            .optional()?;
        let revision: i64 = previous.unwrap_or(0) + 1;

        let row: DraftRow = DraftRow {
            draft_key: draft_key.clone(),
            flow: key.flow().to_string(),
            session_id: key.session_id().to_string(),
            form_json,
            current_ordinal: ordinal,
            revision,
            saved_at: saved_at_text,
        };
        diesel::replace_into(drafts::table)
            .values(&row)
            .execute(conn)?;
        Ok(revision)
    })?;

    debug!(draft_key = %key, revision, "Saved draft");

    Ok(DraftRecord {
        key: key.clone(),
        form,
        current_ordinal,
        revision: u64::try_from(revision).unwrap_or_default(),
        saved_at,
    })
}

/// Deletes a draft. Deleting a missing draft succeeds.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn clear_draft(conn: &mut SqliteConnection, key: &DraftKey) -> Result<(), PersistenceError> {
    let deleted: usize =
        diesel::delete(drafts::table.filter(drafts::draft_key.eq(key.to_string()))).execute(conn)?;
    debug!(draft_key = %key, deleted, "Cleared draft");
    Ok(())
}
