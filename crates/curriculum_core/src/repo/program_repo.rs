//! Program repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `programs` table, joined with member courses.
//! - Resolve a requested course-id set against current membership on create
//!   and update.
//!
//! # Invariants
//! - Program fields and membership changes of one call commit together.
//! - Unknown course ids in a requested set are ignored, never inserted and
//!   never an error; they are reported in [`ResyncOutcome::ignored`].
//! - `delete_program` removes the program's membership rows explicitly and
//!   leaves the courses untouched.

use crate::model::course::{Course, CourseId};
use crate::model::program::{Program, ProgramDraft, ProgramId};
use crate::repo::course_repo::{parse_course_row, COURSE_SELECT_SQL};
use crate::repo::membership_repo::{apply_resync, delete_memberships_for_program, ResyncOutcome};
use crate::repo::{ensure_tables, ListQuery, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};
use std::collections::BTreeSet;

/// Column list shared by every program read. Callers alias `programs` as `p`.
pub(crate) const PROGRAM_SELECT_SQL: &str = "SELECT
    p.id AS id,
    p.name AS name,
    p.description AS description,
    p.total_duration_weeks AS total_duration_weeks
FROM programs p";

/// Result of a program write: the stored record plus the membership changes
/// made while writing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramWrite {
    pub program: Program,
    /// `None` when the write did not touch membership.
    pub resync: Option<ResyncOutcome>,
}

/// Repository interface for program CRUD.
pub trait ProgramRepository {
    /// Persists a program and links the known courses from `course_ids`.
    fn create_program(&self, draft: &ProgramDraft) -> RepoResult<ProgramWrite>;
    fn get_program(&self, id: ProgramId) -> RepoResult<Option<Program>>;
    /// Lists programs by id ascending, each with its courses.
    fn list_programs(&self, query: &ListQuery) -> RepoResult<Vec<Program>>;
    /// Replaces mutable fields and, when `course_ids` is present, resyncs
    /// membership to that set. `None` when the id is unknown.
    fn update_program(&self, id: ProgramId, draft: &ProgramDraft)
        -> RepoResult<Option<ProgramWrite>>;
    /// Deletes the program and its memberships. `false` when the id is unknown.
    fn delete_program(&self, id: ProgramId) -> RepoResult<bool>;
}

/// SQLite-backed program repository.
pub struct SqliteProgramRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteProgramRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["programs", "courses", "program_courses"])?;
        Ok(Self { conn })
    }
}

impl ProgramRepository for SqliteProgramRepository<'_> {
    fn create_program(&self, draft: &ProgramDraft) -> RepoResult<ProgramWrite> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO programs (name, description, total_duration_weeks)
             VALUES (?1, ?2, ?3);",
            params![
                draft.name.as_str(),
                draft.description.as_deref(),
                draft.total_duration_weeks,
            ],
        )?;
        let id = tx.last_insert_rowid();

        let resync = match draft.target_course_ids() {
            Some(target) if !target.is_empty() => Some(apply_resync(&tx, id, &target)?),
            _ => None,
        };
        let program = load_required_program(&tx, id)?;
        tx.commit()?;

        Ok(ProgramWrite { program, resync })
    }

    fn get_program(&self, id: ProgramId) -> RepoResult<Option<Program>> {
        load_program(self.conn, id)
    }

    fn list_programs(&self, query: &ListQuery) -> RepoResult<Vec<Program>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROGRAM_SELECT_SQL}
             ORDER BY p.id ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![query.applied_limit(), query.offset])?;
        let mut programs = Vec::new();
        while let Some(row) = rows.next()? {
            programs.push(parse_program_row(self.conn, row)?);
        }
        Ok(programs)
    }

    fn update_program(
        &self,
        id: ProgramId,
        draft: &ProgramDraft,
    ) -> RepoResult<Option<ProgramWrite>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let changed = tx.execute(
            "UPDATE programs
             SET
                name = ?2,
                description = ?3,
                total_duration_weeks = ?4
             WHERE id = ?1;",
            params![
                id,
                draft.name.as_str(),
                draft.description.as_deref(),
                draft.total_duration_weeks,
            ],
        )?;
        if changed == 0 {
            return Ok(None);
        }

        let resync = match draft.target_course_ids() {
            Some(target) => Some(apply_resync(&tx, id, &target)?),
            None => None,
        };
        let program = load_required_program(&tx, id)?;
        tx.commit()?;

        Ok(Some(ProgramWrite { program, resync }))
    }

    fn delete_program(&self, id: ProgramId) -> RepoResult<bool> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let memberships_removed = delete_memberships_for_program(&tx, id)?;
        let changed = tx.execute("DELETE FROM programs WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Ok(false);
        }
        tx.commit()?;

        debug!(
            "event=program_cascade module=program_repo status=ok program_id={id} memberships_removed={memberships_removed}"
        );
        Ok(true)
    }
}

pub(crate) fn load_program(conn: &Connection, id: ProgramId) -> RepoResult<Option<Program>> {
    let mut stmt = conn.prepare(&format!("{PROGRAM_SELECT_SQL} WHERE p.id = ?1;"))?;
    let mut rows = stmt.query([id])?;
    if let Some(row) = rows.next()? {
        return Ok(Some(parse_program_row(conn, row)?));
    }
    Ok(None)
}

fn load_required_program(conn: &Connection, id: ProgramId) -> RepoResult<Program> {
    load_program(conn, id)?.ok_or_else(|| {
        RepoError::InvalidData(format!("program {id} missing in read-back after write"))
    })
}

/// Builds a program read model from a `PROGRAM_SELECT_SQL` row.
pub(crate) fn parse_program_row(conn: &Connection, row: &Row<'_>) -> RepoResult<Program> {
    let id: ProgramId = row.get("id")?;
    Ok(Program {
        id,
        name: row.get("name")?,
        description: row.get("description")?,
        total_duration_weeks: row.get("total_duration_weeks")?,
        courses: load_program_courses(conn, id)?,
    })
}

/// Member courses of one program, ordered by course id.
pub(crate) fn load_program_courses(conn: &Connection, id: ProgramId) -> RepoResult<Vec<Course>> {
    let mut stmt = conn.prepare(&format!(
        "{COURSE_SELECT_SQL}
         INNER JOIN program_courses pc ON pc.course_id = c.id
         WHERE pc.program_id = ?1
         ORDER BY c.id ASC;"
    ))?;
    let mut rows = stmt.query([id])?;
    let mut courses = Vec::new();
    while let Some(row) = rows.next()? {
        courses.push(parse_course_row(row)?);
    }
    Ok(courses)
}

pub(crate) fn program_exists(conn: &Connection, id: ProgramId) -> RepoResult<bool> {
    let found = conn
        .query_row("SELECT 1 FROM programs WHERE id = ?1;", [id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// Member course ids of one program.
pub(crate) fn current_course_ids(
    conn: &Connection,
    id: ProgramId,
) -> RepoResult<BTreeSet<CourseId>> {
    let mut stmt = conn.prepare(
        "SELECT course_id
         FROM program_courses
         WHERE program_id = ?1;",
    )?;
    let mut rows = stmt.query([id])?;
    let mut ids = BTreeSet::new();
    while let Some(row) = rows.next()? {
        ids.insert(row.get(0)?);
    }
    Ok(ids)
}
