//! Course repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD over the `courses` table.
//! - Cascade membership cleanup on course deletion.
//!
//! # Invariants
//! - `delete_course` removes every `program_courses` row for the course in
//!   the same transaction as the course row itself.
//! - Read paths reject invalid persisted state instead of masking it.

use crate::model::course::{Course, CourseDraft, CourseId, Difficulty};
use crate::repo::membership_repo::delete_memberships_for_course;
use crate::repo::{ensure_tables, parse_bool, ListQuery, RepoError, RepoResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction, TransactionBehavior};

/// Column list shared by every course read. Callers alias `courses` as `c`.
pub(crate) const COURSE_SELECT_SQL: &str = "SELECT
    c.id AS id,
    c.title AS title,
    c.description AS description,
    c.total_hours AS total_hours,
    c.lecture_hours AS lecture_hours,
    c.practice_hours AS practice_hours,
    c.difficulty AS difficulty,
    c.has_online AS has_online
FROM courses c";

/// Repository interface for course CRUD.
pub trait CourseRepository {
    /// Persists a new course and returns it with its assigned id.
    fn create_course(&self, draft: &CourseDraft) -> RepoResult<Course>;
    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>>;
    /// Lists courses by id ascending.
    fn list_courses(&self, query: &ListQuery) -> RepoResult<Vec<Course>>;
    /// Replaces all mutable fields. `None` when the id is unknown.
    fn update_course(&self, id: CourseId, draft: &CourseDraft) -> RepoResult<Option<Course>>;
    /// Deletes the course and its memberships. `false` when the id is unknown.
    fn delete_course(&self, id: CourseId) -> RepoResult<bool>;
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    /// Wraps a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["courses", "program_courses"])?;
        Ok(Self { conn })
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn create_course(&self, draft: &CourseDraft) -> RepoResult<Course> {
        self.conn.execute(
            "INSERT INTO courses (
                title,
                description,
                total_hours,
                lecture_hours,
                practice_hours,
                difficulty,
                has_online
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7);",
            params![
                draft.title.as_str(),
                draft.description.as_deref(),
                draft.total_hours,
                draft.lecture_hours,
                draft.practice_hours,
                draft.difficulty.as_str(),
                draft.has_online,
            ],
        )?;

        Ok(course_from_draft(self.conn.last_insert_rowid(), draft))
    }

    fn get_course(&self, id: CourseId) -> RepoResult<Option<Course>> {
        load_course(self.conn, id)
    }

    fn list_courses(&self, query: &ListQuery) -> RepoResult<Vec<Course>> {
        let mut stmt = self.conn.prepare(&format!(
            "{COURSE_SELECT_SQL}
             ORDER BY c.id ASC
             LIMIT ?1 OFFSET ?2;"
        ))?;
        let mut rows = stmt.query(params![query.applied_limit(), query.offset])?;
        let mut courses = Vec::new();
        while let Some(row) = rows.next()? {
            courses.push(parse_course_row(row)?);
        }
        Ok(courses)
    }

    fn update_course(&self, id: CourseId, draft: &CourseDraft) -> RepoResult<Option<Course>> {
        let changed = self.conn.execute(
            "UPDATE courses
             SET
                title = ?2,
                description = ?3,
                total_hours = ?4,
                lecture_hours = ?5,
                practice_hours = ?6,
                difficulty = ?7,
                has_online = ?8
             WHERE id = ?1;",
            params![
                id,
                draft.title.as_str(),
                draft.description.as_deref(),
                draft.total_hours,
                draft.lecture_hours,
                draft.practice_hours,
                draft.difficulty.as_str(),
                draft.has_online,
            ],
        )?;

        if changed == 0 {
            return Ok(None);
        }
        Ok(Some(course_from_draft(id, draft)))
    }

    fn delete_course(&self, id: CourseId) -> RepoResult<bool> {
        let tx = Transaction::new_unchecked(self.conn, TransactionBehavior::Immediate)?;
        let memberships_removed = delete_memberships_for_course(&tx, id)?;
        let changed = tx.execute("DELETE FROM courses WHERE id = ?1;", [id])?;
        if changed == 0 {
            return Ok(false);
        }
        tx.commit()?;

        debug!(
            "event=course_cascade module=course_repo status=ok course_id={id} memberships_removed={memberships_removed}"
        );
        Ok(true)
    }
}

pub(crate) fn load_course(conn: &Connection, id: CourseId) -> RepoResult<Option<Course>> {
    let mut stmt = conn.prepare(&format!("{COURSE_SELECT_SQL} WHERE c.id = ?1;"))?;
    let row = stmt
        .query_row([id], |row| Ok(parse_course_row(row)))
        .optional()?;
    row.transpose()
}

pub(crate) fn parse_course_row(row: &Row<'_>) -> RepoResult<Course> {
    let difficulty_text: String = row.get("difficulty")?;
    let difficulty = Difficulty::parse(&difficulty_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid difficulty `{difficulty_text}` in courses.difficulty"
        ))
    })?;

    Ok(Course {
        id: row.get("id")?,
        title: row.get("title")?,
        description: row.get("description")?,
        total_hours: row.get("total_hours")?,
        lecture_hours: row.get("lecture_hours")?,
        practice_hours: row.get("practice_hours")?,
        difficulty,
        has_online: parse_bool(row.get("has_online")?, "courses.has_online")?,
    })
}

fn course_from_draft(id: CourseId, draft: &CourseDraft) -> Course {
    Course {
        id,
        title: draft.title.clone(),
        description: draft.description.clone(),
        total_hours: draft.total_hours,
        lecture_hours: draft.lecture_hours,
        practice_hours: draft.practice_hours,
        difficulty: draft.difficulty,
        has_online: draft.has_online,
    }
}
