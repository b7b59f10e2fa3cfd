use curriculum_core::db::open_db_in_memory;
use curriculum_core::{
    Course, CourseDraft, CourseRepository, CourseService, Difficulty, MembershipOutcome,
    MembershipService, ProgramDraft, ProgramRepository, ProgramService,
    SqliteCourseRepository, SqliteMembershipRepository, SqliteProgramRepository,
};
use rusqlite::Connection;
use std::collections::BTreeSet;

fn course(conn: &Connection, title: &str, total_hours: u32) -> Course {
    SqliteCourseRepository::try_new(conn)
        .unwrap()
        .create_course(&CourseDraft::new(title, total_hours, Difficulty::Beginner))
        .unwrap()
}

fn programs(conn: &Connection) -> ProgramService<SqliteProgramRepository<'_>> {
    ProgramService::new(SqliteProgramRepository::try_new(conn).unwrap())
}

fn memberships(conn: &Connection) -> MembershipService<SqliteMembershipRepository<'_>> {
    MembershipService::new(SqliteMembershipRepository::try_new(conn).unwrap())
}

fn course_ids_of(conn: &Connection, program_id: i64) -> Vec<i64> {
    programs(conn)
        .get_program(program_id)
        .unwrap()
        .unwrap()
        .courses
        .iter()
        .map(|course| course.id)
        .collect()
}

fn membership_rows(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM program_courses;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn create_program_links_known_courses_and_ignores_unknown_ids() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 40);
    let b = course(&conn, "B", 20);

    let write = programs(&conn)
        .create_program(ProgramDraft::new("Backend", 12).with_courses([b.id, a.id, a.id, 999]))
        .unwrap();
    assert_eq!(write.program.courses, vec![a.clone(), b.clone()]);
    assert_eq!(write.program.total_hours(), 60);

    let resync = write.resync.unwrap();
    assert_eq!(resync.added, vec![a.id, b.id]);
    assert!(resync.removed.is_empty());
    assert_eq!(resync.ignored, vec![999]);
}

#[test]
fn create_program_without_courses_has_empty_membership() {
    let conn = open_db_in_memory().unwrap();
    let write = programs(&conn)
        .create_program(ProgramDraft::new("Empty", 1))
        .unwrap();
    assert!(write.program.courses.is_empty());
    assert_eq!(write.resync, None);
}

#[test]
fn add_membership_twice_applies_then_reports_unchanged() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 10);
    let program = programs(&conn)
        .create_program(ProgramDraft::new("P", 4))
        .unwrap()
        .program;
    let service = memberships(&conn);

    let first = service.add_membership(program.id, a.id).unwrap();
    let second = service.add_membership(program.id, a.id).unwrap();
    assert_eq!((first.is_applied(), second.is_applied()), (true, false));
    assert_eq!(second, MembershipOutcome::Unchanged);
    assert_eq!(membership_rows(&conn), 1);
}

#[test]
fn membership_calls_report_missing_referents() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 10);
    let program = programs(&conn)
        .create_program(ProgramDraft::new("P", 4))
        .unwrap()
        .program;
    let service = memberships(&conn);

    assert_eq!(
        service.add_membership(404, a.id).unwrap(),
        MembershipOutcome::ProgramNotFound
    );
    assert_eq!(
        service.add_membership(program.id, 404).unwrap(),
        MembershipOutcome::CourseNotFound
    );
    assert_eq!(
        service.remove_membership(404, a.id).unwrap(),
        MembershipOutcome::ProgramNotFound
    );
    assert!(service
        .remove_membership(program.id, 404)
        .unwrap()
        .is_missing_referent());
    assert_eq!(membership_rows(&conn), 0);
}

#[test]
fn remove_membership_only_applies_to_present_pairs() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 10);
    let b = course(&conn, "B", 10);
    let program = programs(&conn)
        .create_program(ProgramDraft::new("P", 4).with_courses([a.id, b.id]))
        .unwrap()
        .program;
    let service = memberships(&conn);

    let other = course(&conn, "Other", 5);
    assert_eq!(
        service.remove_membership(program.id, other.id).unwrap(),
        MembershipOutcome::Unchanged
    );

    assert!(service.remove_membership(program.id, a.id).unwrap().is_applied());
    assert_eq!(course_ids_of(&conn, program.id), vec![b.id]);
    assert!(service.programs_containing(a.id).unwrap().is_empty());
}

#[test]
fn deleting_course_removes_it_from_every_program() {
    let conn = open_db_in_memory().unwrap();
    let shared = course(&conn, "Shared", 10);
    let other = course(&conn, "Other", 10);
    let program_ids: Vec<i64> = (0..3)
        .map(|idx| {
            programs(&conn)
                .create_program(
                    ProgramDraft::new(format!("P{idx}"), 4).with_courses([shared.id, other.id]),
                )
                .unwrap()
                .program
                .id
        })
        .collect();

    let containing = memberships(&conn).programs_containing(shared.id).unwrap();
    assert_eq!(
        containing.iter().map(|p| p.id).collect::<Vec<_>>(),
        program_ids
    );

    let course_service = CourseService::new(SqliteCourseRepository::try_new(&conn).unwrap());
    assert!(course_service.delete_course(shared.id).unwrap());

    for program_id in &program_ids {
        assert_eq!(course_ids_of(&conn, *program_id), vec![other.id]);
    }
    assert!(memberships(&conn)
        .programs_containing(shared.id)
        .unwrap()
        .is_empty());
    assert_eq!(membership_rows(&conn), 3);
}

#[test]
fn deleting_program_removes_its_rows_and_keeps_courses() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 10);
    let keep = programs(&conn)
        .create_program(ProgramDraft::new("Keep", 4).with_courses([a.id]))
        .unwrap()
        .program;
    let drop_me = programs(&conn)
        .create_program(ProgramDraft::new("Drop", 4).with_courses([a.id]))
        .unwrap()
        .program;

    assert!(programs(&conn).delete_program(drop_me.id).unwrap());
    assert!(!programs(&conn).delete_program(drop_me.id).unwrap());

    assert!(SqliteCourseRepository::try_new(&conn)
        .unwrap()
        .get_course(a.id)
        .unwrap()
        .is_some());
    let containing = memberships(&conn).programs_containing(a.id).unwrap();
    assert_eq!(containing.len(), 1);
    assert_eq!(containing[0].id, keep.id);
    assert_eq!(membership_rows(&conn), 1);
}

#[test]
fn courses_not_in_partitions_all_courses() {
    let conn = open_db_in_memory().unwrap();
    let all: Vec<Course> = (0..5)
        .map(|idx| course(&conn, &format!("c{idx}"), 10))
        .collect();
    let program = programs(&conn)
        .create_program(ProgramDraft::new("P", 4).with_courses([all[1].id, all[3].id]))
        .unwrap()
        .program;

    let available = memberships(&conn)
        .courses_not_in(program.id)
        .unwrap()
        .unwrap();
    let available_ids: BTreeSet<i64> = available.iter().map(|c| c.id).collect();
    let member_ids = program.course_ids();

    assert!(available_ids.is_disjoint(&member_ids));
    let union: BTreeSet<i64> = available_ids.union(&member_ids).copied().collect();
    let all_ids: BTreeSet<i64> = all.iter().map(|c| c.id).collect();
    assert_eq!(union, all_ids);
    assert_eq!(
        available.iter().map(|c| c.id).collect::<Vec<_>>(),
        vec![all[0].id, all[2].id, all[4].id]
    );
}

#[test]
fn courses_not_in_distinguishes_unknown_program_from_full_program() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 10);
    let full = programs(&conn)
        .create_program(ProgramDraft::new("Full", 4).with_courses([a.id]))
        .unwrap()
        .program;

    let service = memberships(&conn);
    assert_eq!(service.courses_not_in(404).unwrap(), None);
    assert_eq!(service.courses_not_in(full.id).unwrap(), Some(Vec::new()));
}

#[test]
fn programs_containing_unknown_course_is_empty() {
    let conn = open_db_in_memory().unwrap();
    assert!(memberships(&conn).programs_containing(12).unwrap().is_empty());
}

#[test]
fn resync_is_idempotent() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 10);
    let b = course(&conn, "B", 10);
    let c = course(&conn, "C", 10);
    let program = programs(&conn)
        .create_program(ProgramDraft::new("P", 4).with_courses([a.id, b.id]))
        .unwrap()
        .program;
    let service = memberships(&conn);

    let first = service
        .resync_memberships(program.id, [b.id, c.id])
        .unwrap()
        .unwrap();
    assert_eq!(first.added, vec![c.id]);
    assert_eq!(first.removed, vec![a.id]);

    let second = service
        .resync_memberships(program.id, [c.id, b.id])
        .unwrap()
        .unwrap();
    assert!(second.is_noop());
    assert_eq!(course_ids_of(&conn, program.id), vec![b.id, c.id]);
}

#[test]
fn resync_unknown_program_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 10);
    assert_eq!(
        memberships(&conn).resync_memberships(404, [a.id]).unwrap(),
        None
    );
    assert_eq!(membership_rows(&conn), 0);
}

#[test]
fn add_then_delete_course_scenario() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 40);
    let b = course(&conn, "B", 20);
    let program = programs(&conn)
        .create_program(ProgramDraft::new("P", 10).with_courses([a.id]))
        .unwrap()
        .program;
    assert_eq!(program.courses, vec![a.clone()]);

    assert!(memberships(&conn)
        .add_membership(program.id, b.id)
        .unwrap()
        .is_applied());
    assert_eq!(course_ids_of(&conn, program.id), vec![a.id, b.id]);

    assert!(SqliteCourseRepository::try_new(&conn)
        .unwrap()
        .delete_course(a.id)
        .unwrap());
    assert_eq!(course_ids_of(&conn, program.id), vec![b.id]);
    assert!(memberships(&conn)
        .programs_containing(a.id)
        .unwrap()
        .is_empty());
}

#[test]
fn update_program_resyncs_to_target_set() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 10);
    let b = course(&conn, "B", 10);
    let c = course(&conn, "C", 10);
    let program = programs(&conn)
        .create_program(ProgramDraft::new("P", 10).with_courses([a.id, b.id]))
        .unwrap()
        .program;

    let mut draft = ProgramDraft::new("P renamed", 14).with_courses([b.id, c.id]);
    draft.description = Some("refreshed".to_string());
    let write = programs(&conn)
        .update_program(program.id, draft)
        .unwrap()
        .unwrap();

    assert_eq!(write.program.name, "P renamed");
    assert_eq!(write.program.total_duration_weeks, 14);
    assert_eq!(write.program.description.as_deref(), Some("refreshed"));
    assert_eq!(write.program.course_ids(), BTreeSet::from([b.id, c.id]));
    let resync = write.resync.unwrap();
    assert_eq!(resync.added, vec![c.id]);
    assert_eq!(resync.removed, vec![a.id]);
}

#[test]
fn update_program_without_course_ids_keeps_membership() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 10);
    let program = programs(&conn)
        .create_program(ProgramDraft::new("P", 10).with_courses([a.id]))
        .unwrap()
        .program;

    let write = programs(&conn)
        .update_program(program.id, ProgramDraft::new("Renamed", 10))
        .unwrap()
        .unwrap();
    assert_eq!(write.resync, None);
    assert_eq!(write.program.course_ids(), BTreeSet::from([a.id]));
}

#[test]
fn update_program_with_same_target_twice_mutates_nothing_second_time() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 10);
    let program = programs(&conn)
        .create_program(ProgramDraft::new("P", 10))
        .unwrap()
        .program;

    let target = ProgramDraft::new("P", 10).with_courses([a.id, 77]);
    let first = programs(&conn)
        .update_program(program.id, target.clone())
        .unwrap()
        .unwrap();
    let second = programs(&conn)
        .update_program(program.id, target)
        .unwrap()
        .unwrap();

    assert_eq!(first.resync.unwrap().mutation_count(), 1);
    let second = second.resync.unwrap();
    assert!(second.is_noop());
    assert_eq!(second.ignored, vec![77]);
    assert_eq!(first.program, reload_program(&conn, program.id));
}

#[test]
fn update_unknown_program_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let result = programs(&conn)
        .update_program(5, ProgramDraft::new("Ghost", 1).with_courses([1]))
        .unwrap();
    assert_eq!(result, None);
}

#[test]
fn list_programs_includes_courses_and_orders_by_id() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 10);
    let service = programs(&conn);
    let first = service
        .create_program(ProgramDraft::new("First", 1).with_courses([a.id]))
        .unwrap()
        .program;
    let second = service
        .create_program(ProgramDraft::new("Second", 2))
        .unwrap()
        .program;

    let page = service.list_programs(0, None).unwrap();
    assert_eq!(page.items, vec![first.clone(), second]);
    assert_eq!(page.items[0].courses, vec![a]);

    let repo = SqliteProgramRepository::try_new(&conn).unwrap();
    let tail = repo
        .list_programs(&curriculum_core::ListQuery::new(1, Some(1)))
        .unwrap();
    assert_eq!(tail.len(), 1);
    assert_eq!(tail[0].name, "Second");
}

fn reload_program(conn: &Connection, id: i64) -> curriculum_core::Program {
    programs(conn).get_program(id).unwrap().unwrap()
}

#[test]
fn large_target_with_mostly_unknown_ids_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    let a = course(&conn, "A", 10);
    let b = course(&conn, "B", 10);

    let write = programs(&conn)
        .create_program(ProgramDraft::new("Huge", 1).with_courses((100_000..140_000).chain([a.id])))
        .unwrap();
    assert_eq!(write.program.course_ids(), BTreeSet::from([a.id]));
    let resync = write.resync.unwrap();
    assert_eq!(resync.added, vec![a.id]);
    assert_eq!(resync.ignored.len(), 40_000);

    let outcome = memberships(&conn)
        .resync_memberships(write.program.id, (200_000..240_000).chain([b.id]))
        .unwrap()
        .unwrap();
    assert_eq!(outcome.added, vec![b.id]);
    assert_eq!(outcome.removed, vec![a.id]);
    assert_eq!(outcome.ignored.len(), 40_000);
    assert_eq!(course_ids_of(&conn, write.program.id), vec![b.id]);
}
