//! Program membership repository: the course ↔ program association.
//!
//! # Responsibility
//! - Add and remove single `(program_id, course_id)` pairs.
//! - Answer relationship queries (programs containing a course, courses not
//!   yet in a program).
//! - Resync a program's full membership to a target set with one set diff.
//! - Provide the cascade helpers used by course/program deletion.
//!
//! # Invariants
//! - A pair exists at most once and only while both referents exist.
//! - Resync computes `to_add`/`to_remove` once from the current set and never
//!   re-reads membership between individual mutations.
//! - Resyncing to the same target twice performs no mutation the second time.

use crate::model::course::{Course, CourseId};
use crate::model::program::{Program, ProgramId};
use crate::repo::course_repo::{parse_course_row, COURSE_SELECT_SQL};
use crate::repo::program_repo::{
    current_course_ids, parse_program_row, program_exists, PROGRAM_SELECT_SQL,
};
use crate::repo::{ensure_tables, RepoResult};
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Transaction, TransactionBehavior,
};
use std::collections::BTreeSet;

/// Outcome of a single add/remove membership call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOutcome {
    /// The pair was inserted (add) or deleted (remove).
    Applied,
    /// The pair was already present (add) or already absent (remove).
    Unchanged,
    ProgramNotFound,
    CourseNotFound,
}

impl MembershipOutcome {
    /// Whether the call changed membership.
    pub fn is_applied(self) -> bool {
        matches!(self, Self::Applied)
    }

    pub fn is_missing_referent(self) -> bool {
        matches!(self, Self::ProgramNotFound | Self::CourseNotFound)
    }
}

/// Membership changes computed (and then applied) by a resync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResyncOutcome {
    /// Course ids linked to the program, ascending.
    pub added: Vec<CourseId>,
    /// Course ids unlinked from the program, ascending.
    pub removed: Vec<CourseId>,
    /// Requested course ids that match no course, ascending.
    pub ignored: Vec<CourseId>,
}

impl ResyncOutcome {
    /// Number of membership rows inserted or deleted.
    pub fn mutation_count(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    pub fn is_noop(&self) -> bool {
        self.mutation_count() == 0
    }
}

/// Plans a resync from the current membership to `target`.
///
/// `known` is the subset of `target` that refers to existing courses.
/// Ids in `target` but not in `known` are reported as ignored.
pub fn plan_resync(
    current: &BTreeSet<CourseId>,
    target: &BTreeSet<CourseId>,
    known: &BTreeSet<CourseId>,
) -> ResyncOutcome {
    let mut outcome = ResyncOutcome::default();
    for id in target {
        if !known.contains(id) {
            outcome.ignored.push(*id);
        } else if !current.contains(id) {
            outcome.added.push(*id);
        }
    }
    outcome.removed = current.difference(target).copied().collect();
    outcome
}

/// Repository interface for membership mutations and relationship queries.
pub trait MembershipRepository {
    fn add_membership(
        &self,
        program_id: ProgramId,
        course_id: CourseId,
    ) -> RepoResult<MembershipOutcome>;
    fn remove_membership(
        &self,
        program_id: ProgramId,
        course_id: CourseId,
    ) -> RepoResult<MembershipOutcome>;
    /// Programs whose membership includes the course, by program id.
    /// Empty for unknown courses.
    fn programs_containing(&self, course_id: CourseId) -> RepoResult<Vec<Program>>;
    /// Courses not in the program, by course id. `None` for unknown programs.
    fn courses_not_in(&self, program_id: ProgramId) -> RepoResult<Option<Vec<Course>>>;
    /// Replaces the program's membership with the known courses of `target`.
    /// `None` for unknown programs.
    fn resync_memberships(
        &self,
        program_id: ProgramId,
        target: &BTreeSet<CourseId>,
    ) -> RepoResult<Option<ResyncOutcome>>;
}

/// SQLite-backed membership repository.
pub struct SqliteMembershipRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMembershipRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["programs", "courses", "program_courses"])?;
        Ok(Self { conn })
    }
}

impl MembershipRepository for SqliteMembershipRepository<'_> {
    fn add_membership(
        &self,
        program_id: ProgramId,
        course_id: CourseId,
    ) -> RepoResult<MembershipOutcome> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if let Some(missing) = missing_referent(&tx, program_id, course_id)? {
            return Ok(missing);
        }

        let inserted = insert_membership(&tx, program_id, course_id)?;
        tx.commit()?;
        Ok(if inserted {
            MembershipOutcome::Applied
        } else {
            MembershipOutcome::Unchanged
        })
    }

    fn remove_membership(
        &self,
        program_id: ProgramId,
        course_id: CourseId,
    ) -> RepoResult<MembershipOutcome> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if let Some(missing) = missing_referent(&tx, program_id, course_id)? {
            return Ok(missing);
        }

        let deleted = delete_membership(&tx, program_id, course_id)?;
        tx.commit()?;
        Ok(if deleted {
            MembershipOutcome::Applied
        } else {
            MembershipOutcome::Unchanged
        })
    }

    fn programs_containing(&self, course_id: CourseId) -> RepoResult<Vec<Program>> {
        let mut stmt = self.conn.prepare(&format!(
            "{PROGRAM_SELECT_SQL}
             WHERE EXISTS (
                SELECT 1
                FROM program_courses pc
                WHERE pc.program_id = p.id
                  AND pc.course_id = ?1
             )
             ORDER BY p.id ASC;"
        ))?;
        let mut rows = stmt.query([course_id])?;
        let mut programs = Vec::new();
        while let Some(row) = rows.next()? {
            programs.push(parse_program_row(self.conn, row)?);
        }
        Ok(programs)
    }

    fn courses_not_in(&self, program_id: ProgramId) -> RepoResult<Option<Vec<Course>>> {
        if !program_exists(self.conn, program_id)? {
            return Ok(None);
        }

        let mut stmt = self.conn.prepare(&format!(
            "{COURSE_SELECT_SQL}
             WHERE NOT EXISTS (
                SELECT 1
                FROM program_courses pc
                WHERE pc.program_id = ?1
                  AND pc.course_id = c.id
             )
             ORDER BY c.id ASC;"
        ))?;
        let mut rows = stmt.query([program_id])?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next()? {
            courses.push(parse_course_row(row)?);
        }
        Ok(Some(courses))
    }

    fn resync_memberships(
        &self,
        program_id: ProgramId,
        target: &BTreeSet<CourseId>,
    ) -> RepoResult<Option<ResyncOutcome>> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        if !program_exists(&tx, program_id)? {
            return Ok(None);
        }

        let outcome = apply_resync(&tx, program_id, target)?;
        tx.commit()?;
        Ok(Some(outcome))
    }
}

/// Diffs and applies a resync on a connection already inside a transaction.
pub(crate) fn apply_resync(
    conn: &Connection,
    program_id: ProgramId,
    target: &BTreeSet<CourseId>,
) -> RepoResult<ResyncOutcome> {
    let current = current_course_ids(conn, program_id)?;
    let known = existing_course_ids(conn, target)?;
    let outcome = plan_resync(&current, target, &known);

    for course_id in &outcome.removed {
        delete_membership(conn, program_id, *course_id)?;
    }
    for course_id in &outcome.added {
        insert_membership(conn, program_id, *course_id)?;
    }
    Ok(outcome)
}

/// Removes every membership row of one course. Returns the removed count.
pub(crate) fn delete_memberships_for_course(
    conn: &Connection,
    course_id: CourseId,
) -> RepoResult<usize> {
    let removed = conn.execute(
        "DELETE FROM program_courses WHERE course_id = ?1;",
        [course_id],
    )?;
    Ok(removed)
}

/// Removes every membership row of one program. Returns the removed count.
pub(crate) fn delete_memberships_for_program(
    conn: &Connection,
    program_id: ProgramId,
) -> RepoResult<usize> {
    let removed = conn.execute(
        "DELETE FROM program_courses WHERE program_id = ?1;",
        [program_id],
    )?;
    Ok(removed)
}

fn insert_membership(
    conn: &Connection,
    program_id: ProgramId,
    course_id: CourseId,
) -> RepoResult<bool> {
    let changed = conn.execute(
        "INSERT OR IGNORE INTO program_courses (program_id, course_id)
         VALUES (?1, ?2);",
        params![program_id, course_id],
    )?;
    Ok(changed == 1)
}

fn delete_membership(
    conn: &Connection,
    program_id: ProgramId,
    course_id: CourseId,
) -> RepoResult<bool> {
    let changed = conn.execute(
        "DELETE FROM program_courses
         WHERE program_id = ?1
           AND course_id = ?2;",
        params![program_id, course_id],
    )?;
    Ok(changed == 1)
}

fn missing_referent(
    conn: &Connection,
    program_id: ProgramId,
    course_id: CourseId,
) -> RepoResult<Option<MembershipOutcome>> {
    if !program_exists(conn, program_id)? {
        return Ok(Some(MembershipOutcome::ProgramNotFound));
    }
    if !course_exists(conn, course_id)? {
        return Ok(Some(MembershipOutcome::CourseNotFound));
    }
    Ok(None)
}

fn course_exists(conn: &Connection, course_id: CourseId) -> RepoResult<bool> {
    let found = conn
        .query_row("SELECT 1 FROM courses WHERE id = ?1;", [course_id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

/// Bound parameters per `IN (...)` lookup; well below SQLite's variable limit.
const ID_LOOKUP_CHUNK: usize = 500;

/// Subset of `ids` that refers to existing courses.
fn existing_course_ids(
    conn: &Connection,
    ids: &BTreeSet<CourseId>,
) -> RepoResult<BTreeSet<CourseId>> {
    let ids: Vec<CourseId> = ids.iter().copied().collect();
    let mut known = BTreeSet::new();
    for chunk in ids.chunks(ID_LOOKUP_CHUNK) {
        let placeholders = vec!["?"; chunk.len()].join(", ");
        let mut stmt = conn.prepare_cached(&format!(
            "SELECT id FROM courses WHERE id IN ({placeholders});"
        ))?;
        let mut rows = stmt.query(params_from_iter(chunk.iter()))?;
        while let Some(row) = rows.next()? {
            known.insert(row.get(0)?);
        }
    }
    Ok(known)
}
