//! Console client for the curriculum HTTP API.
//!
//! Provides the `curriculum` binary with `health`, `courses` and `programs`
//! subcommands. Every command probes `/health` first so an unreachable
//! server is reported once, up front.

mod client;
mod render;

use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use curriculum_core::{CourseDraft, CourseId, Difficulty, ProgramDraft, ProgramId};
use log::warn;

use client::{ApiClient, ClientError};

/// Console client for the curriculum service.
#[derive(Parser)]
#[command(name = "curriculum", version, about = "Manage courses and educational programs")]
struct Cli {
    /// Base URL of the curriculum server.
    #[arg(
        long,
        env = "CURRICULUM_API_URL",
        default_value = "http://localhost:8000",
        global = true
    )]
    base_url: String,

    /// Log level for client diagnostics on stderr.
    #[arg(long, default_value = "warn", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the server is up.
    Health,
    /// Course management.
    #[command(subcommand)]
    Courses(CourseCommand),
    /// Program management and course membership.
    #[command(subcommand)]
    Programs(ProgramCommand),
}

#[derive(Subcommand)]
enum CourseCommand {
    /// List courses.
    List(ListArgs),
    /// Show one course and the programs that include it.
    Show { id: CourseId },
    /// Create a course. Requires --title, --hours and --difficulty.
    Create(CourseFields),
    /// Update a course. Omitted fields keep their current values.
    Update {
        id: CourseId,
        #[command(flatten)]
        fields: CourseFields,
    },
    /// Delete a course. It is removed from every program that includes it.
    Delete {
        id: CourseId,
        /// Confirm deletion of a course that belongs to programs.
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ProgramCommand {
    /// List programs.
    List(ListArgs),
    /// Show one program with its courses.
    Show { id: ProgramId },
    /// Create a program. Requires --name and --weeks.
    Create(ProgramFields),
    /// Update a program. Membership changes only when --courses is given.
    Update {
        id: ProgramId,
        #[command(flatten)]
        fields: ProgramFields,
    },
    /// Delete a program. Its courses are kept.
    Delete {
        id: ProgramId,
        /// Confirm deletion of a program that still has courses.
        #[arg(long)]
        yes: bool,
    },
    /// Add a course to a program.
    AddCourse {
        program_id: ProgramId,
        course_id: CourseId,
    },
    /// Remove a course from a program.
    RemoveCourse {
        program_id: ProgramId,
        course_id: CourseId,
    },
    /// List courses that are not yet in the program.
    Available { id: ProgramId },
}

#[derive(Args)]
struct ListArgs {
    #[arg(long, default_value_t = 0)]
    skip: u32,
    #[arg(long)]
    limit: Option<u32>,
}

#[derive(Args, Default)]
struct CourseFields {
    #[arg(long)]
    title: Option<String>,
    /// Description; an empty value clears it.
    #[arg(long)]
    description: Option<String>,
    /// Total hours.
    #[arg(long = "hours")]
    total_hours: Option<u32>,
    #[arg(long)]
    lecture_hours: Option<u32>,
    #[arg(long)]
    practice_hours: Option<u32>,
    /// beginner, intermediate or advanced.
    #[arg(long, value_parser = parse_difficulty)]
    difficulty: Option<Difficulty>,
    /// Whether an online version exists (true/false).
    #[arg(long)]
    online: Option<bool>,
}

impl CourseFields {
    fn into_new_draft(self) -> Result<CourseDraft, CliError> {
        let title = self.title.clone().ok_or(CliError::MissingFlag("--title"))?;
        let total_hours = self.total_hours.ok_or(CliError::MissingFlag("--hours"))?;
        let difficulty = self
            .difficulty
            .ok_or(CliError::MissingFlag("--difficulty"))?;
        Ok(self.apply_to(CourseDraft::new(title, total_hours, difficulty)))
    }

    fn apply_to(self, base: CourseDraft) -> CourseDraft {
        CourseDraft {
            title: self.title.unwrap_or(base.title),
            description: merge_description(self.description, base.description),
            total_hours: self.total_hours.unwrap_or(base.total_hours),
            lecture_hours: self.lecture_hours.unwrap_or(base.lecture_hours),
            practice_hours: self.practice_hours.unwrap_or(base.practice_hours),
            difficulty: self.difficulty.unwrap_or(base.difficulty),
            has_online: self.online.unwrap_or(base.has_online),
        }
    }
}

#[derive(Args, Default)]
struct ProgramFields {
    #[arg(long)]
    name: Option<String>,
    /// Description; an empty value clears it.
    #[arg(long)]
    description: Option<String>,
    /// Total duration in weeks.
    #[arg(long)]
    weeks: Option<u32>,
    /// Comma-separated course ids; an empty value clears the program.
    #[arg(long, value_parser = parse_id_list)]
    courses: Option<CourseIdList>,
}

impl ProgramFields {
    fn into_new_draft(self) -> Result<ProgramDraft, CliError> {
        let name = self.name.ok_or(CliError::MissingFlag("--name"))?;
        let weeks = self.weeks.ok_or(CliError::MissingFlag("--weeks"))?;
        Ok(ProgramDraft {
            name,
            description: self.description,
            total_duration_weeks: weeks,
            course_ids: self.courses.map(|list| list.0),
        })
    }

    /// `course_ids` stays `None` unless `--courses` was given, so the server
    /// leaves membership alone.
    fn apply_to(self, base: ProgramDraft) -> ProgramDraft {
        ProgramDraft {
            name: self.name.unwrap_or(base.name),
            description: merge_description(self.description, base.description),
            total_duration_weeks: self.weeks.unwrap_or(base.total_duration_weeks),
            course_ids: self.courses.map(|list| list.0),
        }
    }
}

/// `--description ""` clears; an omitted flag keeps `current`.
fn merge_description(flag: Option<String>, current: Option<String>) -> Option<String> {
    match flag {
        Some(value) if value.trim().is_empty() => None,
        Some(value) => Some(value),
        None => current,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CourseIdList(Vec<CourseId>);

fn parse_id_list(value: &str) -> Result<CourseIdList, String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<CourseId>()
                .map_err(|_| format!("`{part}` is not a course id"))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(CourseIdList)
}

fn parse_difficulty(value: &str) -> Result<Difficulty, String> {
    value.parse::<Difficulty>().map_err(|err| err.to_string())
}

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error("missing required flag {0}")]
    MissingFlag(&'static str),
    #[error("{0}")]
    NeedsConfirmation(String),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            Self::Client(err) if err.is_not_found() => 3,
            Self::Client(_) => 1,
            Self::MissingFlag(_) | Self::NeedsConfirmation(_) => 2,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = curriculum_core::init_logging(&cli.log_level, None) {
        eprintln!("warning: logging disabled: {err}");
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let client = ApiClient::new(&cli.base_url)?;
    let health = client.health()?;

    match cli.command {
        Commands::Health => {
            println!(
                "{} at {}: {} (version {})",
                health.status,
                client.base_url(),
                health.message,
                health.version
            );
            Ok(())
        }
        Commands::Courses(command) => run_course_command(&client, command),
        Commands::Programs(command) => run_program_command(&client, command),
    }
}

fn run_course_command(client: &ApiClient, command: CourseCommand) -> Result<(), CliError> {
    match command {
        CourseCommand::List(args) => {
            let courses = client.list_courses(args.skip, args.limit)?;
            println!("{}", render::header("Courses"));
            println!("{}", render::listing(&courses, render::course_line, "no courses"));
        }
        CourseCommand::Show { id } => {
            let course = client.get_course(id)?;
            let programs = client.course_programs(id)?;
            println!("{}", render::course_details(&course, &programs));
        }
        CourseCommand::Create(fields) => {
            let course = client.create_course(&fields.into_new_draft()?)?;
            println!("created course {}", course.id);
            println!("{}", render::course_details(&course, &[]));
        }
        CourseCommand::Update { id, fields } => {
            let current = client.get_course(id)?;
            let course = client.update_course(id, &fields.apply_to(current.to_draft()))?;
            println!("updated course {}", course.id);
            println!("{}", render::course_details(&course, &client.course_programs(id)?));
        }
        CourseCommand::Delete { id, yes } => {
            let programs = client.course_programs(id)?;
            if !programs.is_empty() {
                println!("course {id} is part of {} program(s):", programs.len());
                println!("{}", render::listing(&programs, render::program_line, ""));
                if !yes {
                    return Err(CliError::NeedsConfirmation(
                        "re-run with --yes to delete it from all of them".to_string(),
                    ));
                }
                warn!(
                    "event=course_delete module=cli status=warn course_id={id} programs={}",
                    programs.len()
                );
            }
            client.delete_course(id)?;
            println!("deleted course {id}");
        }
    }
    Ok(())
}

fn run_program_command(client: &ApiClient, command: ProgramCommand) -> Result<(), CliError> {
    match command {
        ProgramCommand::List(args) => {
            let programs = client.list_programs(args.skip, args.limit)?;
            println!("{}", render::header("Programs"));
            println!("{}", render::listing(&programs, render::program_line, "no programs"));
        }
        ProgramCommand::Show { id } => {
            println!("{}", render::program_details(&client.get_program(id)?));
        }
        ProgramCommand::Create(fields) => {
            let requested = fields.courses.as_ref().map_or(0, |list| list.0.len());
            let program = client.create_program(&fields.into_new_draft()?)?;
            report_skipped_courses(requested, program.courses.len());
            println!("created program {}", program.id);
            println!("{}", render::program_details(&program));
        }
        ProgramCommand::Update { id, fields } => {
            let current = client.get_program(id)?;
            let base = ProgramDraft {
                name: current.name,
                description: current.description,
                total_duration_weeks: current.total_duration_weeks,
                course_ids: None,
            };
            let requested = fields.courses.as_ref().map(|list| list.0.len());
            let program = client.update_program(id, &fields.apply_to(base))?;
            if let Some(requested) = requested {
                report_skipped_courses(requested, program.courses.len());
            }
            println!("updated program {}", program.id);
            println!("{}", render::program_details(&program));
        }
        ProgramCommand::Delete { id, yes } => {
            let program = client.get_program(id)?;
            if !program.courses.is_empty() && !yes {
                println!(
                    "program {id} still has {} course(s); the courses themselves are kept",
                    program.courses.len()
                );
                return Err(CliError::NeedsConfirmation(
                    "re-run with --yes to delete the program".to_string(),
                ));
            }
            client.delete_program(id)?;
            println!("deleted program {id}");
        }
        ProgramCommand::AddCourse {
            program_id,
            course_id,
        } => {
            println!("{}", client.add_course(program_id, course_id)?);
        }
        ProgramCommand::RemoveCourse {
            program_id,
            course_id,
        } => {
            println!("{}", client.remove_course(program_id, course_id)?);
        }
        ProgramCommand::Available { id } => {
            let courses = client.available_courses(id)?;
            println!("{}", render::header("Available courses"));
            println!(
                "{}",
                render::listing(&courses, render::course_line, "every course is already included")
            );
        }
    }
    Ok(())
}

/// Warns when the server dropped ids that do not refer to existing courses.
/// Duplicate ids in the request are counted as skipped too.
fn report_skipped_courses(requested: usize, linked: usize) {
    if requested > linked {
        println!(
            "note: {} requested course id(s) were skipped (unknown or duplicate)",
            requested - linked
        );
    }
}
