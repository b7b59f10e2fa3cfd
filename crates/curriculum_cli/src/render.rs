//! Plain-text rendering of API payloads.
//!
//! Every function returns a `String` so output stays testable; `main` does
//! the printing.

use curriculum_core::{Course, Program};

/// Boxed section title.
pub fn header(title: &str) -> String {
    let width = title.chars().count() + 2;
    let bar = "═".repeat(width);
    format!("╔{bar}╗\n║ {title} ║\n╚{bar}╝")
}

/// One-line course summary used by listings.
pub fn course_line(course: &Course) -> String {
    format!(
        "{:>4}: {} ({} h, {})",
        course.id, course.title, course.total_hours, course.difficulty
    )
}

/// One-line program summary used by listings.
pub fn program_line(program: &Program) -> String {
    format!(
        "{:>4}: {} ({} weeks, {} courses)",
        program.id,
        program.name,
        program.total_duration_weeks,
        program.courses.len()
    )
}

pub fn course_details(course: &Course, containing: &[Program]) -> String {
    let mut lines = vec![
        header(&course.title),
        format!("id:              {}", course.id),
        format!("description:     {}", description(&course.description)),
        format!("total hours:     {}", course.total_hours),
        format!("lecture hours:   {}", course.lecture_hours),
        format!("practice hours:  {}", course.practice_hours),
        format!("difficulty:      {}", course.difficulty),
        format!("online:          {}", yes_no(course.has_online)),
    ];
    if containing.is_empty() {
        lines.push("\nnot part of any program".to_string());
    } else {
        lines.push("\nincluded in programs:".to_string());
        lines.extend(
            containing
                .iter()
                .map(|program| format!("  - {} (id {})", program.name, program.id)),
        );
    }
    lines.join("\n")
}

pub fn program_details(program: &Program) -> String {
    let mut lines = vec![
        header(&program.name),
        format!("id:           {}", program.id),
        format!("description:  {}", description(&program.description)),
        format!("duration:     {} weeks", program.total_duration_weeks),
        format!("total hours:  {}", program.total_hours()),
    ];
    if program.courses.is_empty() {
        lines.push("\nno courses yet".to_string());
    } else {
        lines.push("\ncourses:".to_string());
        lines.extend(program.courses.iter().map(|course| {
            format!(
                "  - {} (id {}, {} h)",
                course.title, course.id, course.total_hours
            )
        }));
    }
    lines.join("\n")
}

/// Listing body, or `empty` when there is nothing to show.
pub fn listing<T>(items: &[T], line: impl Fn(&T) -> String, empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }
    items.iter().map(line).collect::<Vec<_>>().join("\n")
}

fn description(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curriculum_core::Difficulty;

    fn course(id: i64, title: &str, total_hours: u32) -> Course {
        Course {
            id,
            title: title.to_string(),
            description: None,
            total_hours,
            lecture_hours: 0,
            practice_hours: 0,
            difficulty: Difficulty::Beginner,
            has_online: true,
        }
    }

    #[test]
    fn header_box_fits_title() {
        assert_eq!(header("Курсы"), "╔═══════╗\n║ Курсы ║\n╚═══════╝");
    }

    #[test]
    fn course_line_shows_hours_and_difficulty() {
        assert_eq!(course_line(&course(7, "Rust", 40)), "   7: Rust (40 h, beginner)");
    }

    #[test]
    fn course_details_lists_programs() {
        let program = Program {
            id: 3,
            name: "Backend".to_string(),
            description: None,
            total_duration_weeks: 12,
            courses: Vec::new(),
        };
        let text = course_details(&course(1, "Rust", 40), &[program]);
        assert!(text.contains("online:          yes"));
        assert!(text.contains("  - Backend (id 3)"));
        assert!(text.contains("description:     -"));
    }

    #[test]
    fn program_details_sums_hours() {
        let program = Program {
            id: 1,
            name: "Backend".to_string(),
            description: Some("server side".to_string()),
            total_duration_weeks: 12,
            courses: vec![course(1, "Rust", 40), course(2, "SQL", 20)],
        };
        let text = program_details(&program);
        assert!(text.contains("total hours:  60"));
        assert!(text.contains("  - SQL (id 2, 20 h)"));
    }

    #[test]
    fn empty_listing_uses_placeholder() {
        let courses: Vec<Course> = Vec::new();
        assert_eq!(listing(&courses, course_line, "no courses"), "no courses");
    }
}
