//! Selection log and identity queries.

use jiff::civil::Date;
use log::warn;
use rusqlite::{Connection, OptionalExtension, params};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{SelectionCommitment, StepId},
};

const SELECT_SELECTIONS_SQL: &str = "SELECT owner_id, committed_date, step_ids FROM selections WHERE (?1 IS NULL OR owner_id = ?1) ORDER BY id";
const INSERT_SELECTION_SQL: &str =
    "INSERT INTO selections (owner_id, committed_date, step_ids) VALUES (?1, ?2, ?3)";
const SELECT_IDENTITY_SQL: &str = "SELECT owner_id FROM identity WHERE id = 1";
const UPSERT_IDENTITY_SQL: &str = "INSERT INTO identity (id, owner_id) VALUES (1, ?1) ON CONFLICT(id) DO UPDATE SET owner_id = excluded.owner_id";

/// Loads the selection log in commit order, skipping unparsable rows.
pub(super) fn load_selections(
    connection: &Connection,
    owner_id: Option<&str>,
) -> Result<Vec<SelectionCommitment>> {
    let mut stmt = connection
        .prepare(SELECT_SELECTIONS_SQL)
        .db_context("Failed to prepare selections query")?;
    let rows = stmt
        .query_map(params![owner_id], |row| {
            Ok((
                row.get::<_, Option<String>>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .db_context("Failed to query selections")?;

    let mut selections = Vec::new();
    for row in rows {
        let (owner_id, date, ids) = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping unreadable selection row: {e}");
                continue;
            }
        };

        let committed_date = match date.parse::<Date>() {
            Ok(date) => date,
            Err(e) => {
                warn!("Skipping selection with invalid date '{date}': {e}");
                continue;
            }
        };

        let step_ids = match serde_json::from_str::<Vec<StepId>>(&ids) {
            Ok(ids) => ids,
            Err(e) => {
                warn!("Skipping selection with invalid step ids '{ids}': {e}");
                continue;
            }
        };

        selections.push(SelectionCommitment::new(owner_id, committed_date, step_ids));
    }

    Ok(selections)
}

/// Appends a commitment to the selection log.
pub(super) fn insert_selection(
    connection: &Connection,
    commitment: &SelectionCommitment,
) -> Result<()> {
    let step_ids = serde_json::to_string(&commitment.selected_step_ids)?;
    connection
        .execute(
            INSERT_SELECTION_SQL,
            params![
                commitment.owner_id.as_deref(),
                commitment.committed_date.to_string(),
                step_ids
            ],
        )
        .db_context("Failed to insert selection")?;
    Ok(())
}

pub(super) fn load_identity(connection: &Connection) -> Result<Option<String>> {
    connection
        .query_row(SELECT_IDENTITY_SQL, [], |row| row.get(0))
        .optional()
        .db_context("Failed to load identity")
}

pub(super) fn save_identity(connection: &Connection, owner_id: &str) -> Result<()> {
    connection
        .execute(UPSERT_IDENTITY_SQL, params![owner_id])
        .db_context("Failed to save identity")?;
    Ok(())
}
