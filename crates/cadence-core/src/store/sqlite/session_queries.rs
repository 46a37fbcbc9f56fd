//! Session reads and appends.

use jiff::Timestamp;
use log::warn;
use rusqlite::{Connection, params};

use crate::{
    error::{DatabaseResultExt, Result},
    models::{SessionRecord, StepChoice},
};

const SELECT_SESSIONS_SQL: &str = "SELECT s.session_id, s.owner_id, s.completed_at, c.step_id, c.performed FROM sessions s LEFT JOIN session_choices c ON c.session_id = s.session_id WHERE (?1 IS NULL OR s.owner_id = ?1) ORDER BY s.completed_at, s.session_id, c.step_id";
const INSERT_SESSION_SQL: &str =
    "INSERT INTO sessions (session_id, owner_id, completed_at) VALUES (?1, ?2, ?3)";
const INSERT_CHOICE_SQL: &str =
    "INSERT INTO session_choices (session_id, step_id, performed) VALUES (?1, ?2, ?3)";

/// Raw joined row, one per (session, choice) pair.
struct SessionRow {
    session_id: String,
    owner_id: Option<String>,
    completed_at: String,
    step_id: Option<i64>,
    performed: Option<bool>,
}

impl SessionRow {
    fn from_row(row: &rusqlite::Row) -> rusqlite::Result<Self> {
        Ok(Self {
            session_id: row.get(0)?,
            owner_id: row.get(1)?,
            completed_at: row.get(2)?,
            step_id: row.get(3)?,
            performed: row.get(4)?,
        })
    }

    fn choice(&self) -> Option<StepChoice> {
        let step_id = u32::try_from(self.step_id?).ok()?;
        Some(StepChoice {
            step_id,
            performed: self.performed?,
        })
    }
}

/// Loads sessions with their choices, skipping rows that cannot be parsed.
pub(super) fn load_sessions(
    connection: &Connection,
    owner_id: Option<&str>,
) -> Result<Vec<SessionRecord>> {
    let mut stmt = connection
        .prepare(SELECT_SESSIONS_SQL)
        .db_context("Failed to prepare sessions query")?;
    let rows = stmt
        .query_map(params![owner_id], SessionRow::from_row)
        .db_context("Failed to query sessions")?;

    let mut sessions: Vec<SessionRecord> = Vec::new();
    let mut skipping: Option<String> = None;

    for row in rows {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                warn!("Skipping unreadable session row: {e}");
                continue;
            }
        };

        if skipping.as_deref() == Some(row.session_id.as_str()) {
            continue;
        }

        if let Some(current) = sessions
            .last_mut()
            .filter(|current| current.session_id == row.session_id)
        {
            current.choices.extend(row.choice());
            continue;
        }

        let completed_at = match row.completed_at.parse::<Timestamp>() {
            Ok(ts) => ts,
            Err(e) => {
                warn!(
                    "Skipping session {} with invalid completion time '{}': {e}",
                    row.session_id, row.completed_at
                );
                skipping = Some(row.session_id);
                continue;
            }
        };

        let choices = row.choice().into_iter().collect();
        sessions.push(SessionRecord {
            session_id: row.session_id,
            completed_at,
            owner_id: row.owner_id,
            choices,
        });
    }

    sessions.sort_by_key(|session| session.completed_at);
    Ok(sessions)
}

/// Inserts a session and its choices in one transaction.
pub(super) fn insert_session(connection: &mut Connection, record: &SessionRecord) -> Result<()> {
    let tx = connection
        .transaction()
        .db_context("Failed to begin transaction")?;

    tx.execute(
        INSERT_SESSION_SQL,
        params![
            &record.session_id,
            record.owner_id.as_deref(),
            record.completed_at.to_string()
        ],
    )
    .db_context("Failed to insert session")?;

    for choice in &record.choices {
        tx.execute(
            INSERT_CHOICE_SQL,
            params![&record.session_id, i64::from(choice.step_id), choice.performed],
        )
        .db_context("Failed to insert session choice")?;
    }

    tx.commit().db_context("Failed to commit transaction")
}
