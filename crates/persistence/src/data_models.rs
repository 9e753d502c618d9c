// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;

use crate::diesel_schema::drafts;

/// One row of the `drafts` table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = drafts)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct DraftRow {
    pub draft_key: String,
    pub flow: String,
    pub session_id: String,
    pub form_json: String,
    pub current_ordinal: i64,
    pub revision: i64,
    pub saved_at: String,
}
