use curriculum_core::db::open_db_in_memory;
use curriculum_core::{
    CourseDraft, CourseRepository, CourseService, Difficulty, ListQuery, ModelValidationError,
    ServiceError, SqliteCourseRepository,
};

fn draft(title: &str, total_hours: u32) -> CourseDraft {
    let mut draft = CourseDraft::new(title, total_hours, Difficulty::Intermediate);
    draft.lecture_hours = total_hours / 2;
    draft.practice_hours = total_hours / 2;
    draft.description = Some(format!("{title} description"));
    draft.has_online = true;
    draft
}

#[test]
fn create_and_get_roundtrip() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    let created = repo.create_course(&draft("Databases", 40)).unwrap();
    assert!(created.id > 0);

    let loaded = repo.get_course(created.id).unwrap().unwrap();
    assert_eq!(loaded, created);
    assert_eq!(loaded.difficulty, Difficulty::Intermediate);
    assert_eq!(loaded.lecture_hours, 20);
    assert!(loaded.has_online);
}

#[test]
fn ids_are_assigned_and_never_reused() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    let first = repo.create_course(&draft("First", 10)).unwrap();
    assert!(repo.delete_course(first.id).unwrap());
    let second = repo.create_course(&draft("Second", 10)).unwrap();
    assert!(second.id > first.id);
}

#[test]
fn get_unknown_course_returns_none() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();
    assert_eq!(repo.get_course(404).unwrap(), None);
}

#[test]
fn list_is_ordered_by_id_and_paginated() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();
    let ids: Vec<_> = (0..5)
        .map(|idx| repo.create_course(&draft(&format!("c{idx}"), 10)).unwrap().id)
        .collect();

    let all = repo.list_courses(&ListQuery::default()).unwrap();
    assert_eq!(all.iter().map(|c| c.id).collect::<Vec<_>>(), ids);

    let page = repo.list_courses(&ListQuery::new(1, Some(2))).unwrap();
    assert_eq!(page.iter().map(|c| c.id).collect::<Vec<_>>(), ids[1..3].to_vec());

    let past_end = repo.list_courses(&ListQuery::new(10, None)).unwrap();
    assert!(past_end.is_empty());
}

#[test]
fn update_replaces_all_fields() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();
    let created = repo.create_course(&draft("Old", 10)).unwrap();

    let replacement = CourseDraft::new("New", 64, Difficulty::Advanced);
    let updated = repo.update_course(created.id, &replacement).unwrap().unwrap();
    assert_eq!(updated.title, "New");
    assert_eq!(updated.description, None);
    assert_eq!(updated.lecture_hours, 0);
    assert!(!updated.has_online);

    let loaded = repo.get_course(created.id).unwrap().unwrap();
    assert_eq!(loaded, updated);
}

#[test]
fn update_and_delete_unknown_course_report_absence() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteCourseRepository::try_new(&conn).unwrap();

    assert_eq!(repo.update_course(7, &draft("Ghost", 1)).unwrap(), None);
    assert!(!repo.delete_course(7).unwrap());
}

#[test]
fn service_trims_fields_and_rejects_blank_title() {
    let conn = open_db_in_memory().unwrap();
    let service = CourseService::new(SqliteCourseRepository::try_new(&conn).unwrap());

    let mut padded = CourseDraft::new("  Networks  ", 30, Difficulty::Beginner);
    padded.description = Some(String::new());
    let created = service.create_course(padded).unwrap();
    assert_eq!(created.title, "Networks");
    assert_eq!(created.description, None);

    let err = service
        .create_course(CourseDraft::new("   ", 30, Difficulty::Beginner))
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(ModelValidationError::BlankCourseTitle)
    ));
    assert_eq!(service.list_courses(0, None).unwrap().items.len(), 1);
}

#[test]
fn service_accepts_inconsistent_hour_breakdown() {
    let conn = open_db_in_memory().unwrap();
    let service = CourseService::new(SqliteCourseRepository::try_new(&conn).unwrap());

    let mut overbooked = CourseDraft::new("Overbooked", 10, Difficulty::Beginner);
    overbooked.lecture_hours = 8;
    overbooked.practice_hours = 8;
    let created = service.create_course(overbooked).unwrap();
    assert_eq!(created.lecture_hours + created.practice_hours, 16);
}

#[test]
fn service_list_reports_applied_limit() {
    let conn = open_db_in_memory().unwrap();
    let service = CourseService::new(SqliteCourseRepository::try_new(&conn).unwrap());
    for idx in 0..3 {
        service.create_course(draft(&format!("c{idx}"), 5)).unwrap();
    }

    let defaulted = service.list_courses(0, None).unwrap();
    assert_eq!(defaulted.applied_limit, 100);
    assert_eq!(defaulted.items.len(), 3);

    let capped = service.list_courses(1, Some(5_000)).unwrap();
    assert_eq!(capped.applied_limit, 1000);
    assert_eq!(capped.offset, 1);
    assert_eq!(capped.items.len(), 2);
}
