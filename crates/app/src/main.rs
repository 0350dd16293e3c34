use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use services::{
    AuthService, Clock, DEFAULT_RECENT_LIMIT, PlaybackSession, PlayerWidget, ProgressService,
    load_catalog,
};
use storage::documents::{SessionStore, UserDirectory};
use storage::repository::Storage;
use tracing_subscriber::EnvFilter;
use watch_core::model::{Catalog, Course, CourseId};

#[derive(Debug, Clone)]
enum Command {
    Login { username: String, password: String },
    Logout,
    Courses { category: String },
    Recent,
    Watch {
        course_id: CourseId,
        seconds: f64,
        duration: Option<f64>,
    },
}

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    catalog_path: PathBuf,
    command: Command,
}

#[derive(Debug)]
enum ArgsError {
    MissingCommand,
    UnknownCommand(String),
    MissingValue { flag: &'static str },
    UnknownArg(String),
    MissingPositional { name: &'static str },
    InvalidCourseId { raw: String },
    InvalidNumber { flag: &'static str, raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingCommand => write!(f, "missing command"),
            ArgsError::UnknownCommand(cmd) => write!(f, "unknown command: {cmd}"),
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::MissingPositional { name } => write!(f, "missing <{name}> argument"),
            ArgsError::InvalidCourseId { raw } => write!(f, "invalid course id: {raw}"),
            ArgsError::InvalidNumber { flag, raw } => {
                write!(f, "invalid {flag} value: {raw}")
            }
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

impl Args {
    fn parse() -> Result<Self, ArgsError> {
        let mut db_url = std::env::var("WATCH_DB_URL")
            .unwrap_or_else(|_| "sqlite:watch.sqlite3?mode=rwc".into());
        let mut catalog_path = PathBuf::from(
            std::env::var("WATCH_CATALOG").unwrap_or_else(|_| "data/courses.json".into()),
        );
        let mut category = "all".to_owned();
        let mut seconds: Option<f64> = None;
        let mut duration: Option<f64> = None;
        let mut positionals: Vec<String> = Vec::new();
        let mut command_name: Option<String> = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => db_url = require_value(&mut args, "--db")?,
                "--catalog" => {
                    catalog_path = PathBuf::from(require_value(&mut args, "--catalog")?);
                }
                "--category" => category = require_value(&mut args, "--category")?,
                "--seconds" => {
                    let raw = require_value(&mut args, "--seconds")?;
                    seconds = Some(raw.parse::<f64>().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--seconds",
                        raw,
                    })?);
                }
                "--duration" => {
                    let raw = require_value(&mut args, "--duration")?;
                    duration = Some(raw.parse::<f64>().map_err(|_| ArgsError::InvalidNumber {
                        flag: "--duration",
                        raw,
                    })?);
                }
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                other if other.starts_with('-') => {
                    return Err(ArgsError::UnknownArg(other.to_owned()));
                }
                other => {
                    if command_name.is_none() {
                        command_name = Some(other.to_owned());
                    } else {
                        positionals.push(other.to_owned());
                    }
                }
            }
        }

        let command_name = command_name.ok_or(ArgsError::MissingCommand)?;
        let mut positionals = positionals.into_iter();
        let command = match command_name.as_str() {
            "login" => Command::Login {
                username: positionals
                    .next()
                    .ok_or(ArgsError::MissingPositional { name: "username" })?,
                password: positionals
                    .next()
                    .ok_or(ArgsError::MissingPositional { name: "password" })?,
            },
            "logout" => Command::Logout,
            "courses" => Command::Courses { category },
            "recent" => Command::Recent,
            "watch" => {
                let raw = positionals
                    .next()
                    .ok_or(ArgsError::MissingPositional { name: "course-id" })?;
                let id = raw
                    .parse::<u64>()
                    .map_err(|_| ArgsError::InvalidCourseId { raw })?;
                Command::Watch {
                    course_id: CourseId::new(id),
                    seconds: seconds.ok_or(ArgsError::MissingValue { flag: "--seconds" })?,
                    duration,
                }
            }
            other => return Err(ArgsError::UnknownCommand(other.to_owned())),
        };

        Ok(Self {
            db_url,
            catalog_path,
            command,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- login <username> <password>");
    eprintln!("  cargo run -p app -- logout");
    eprintln!(
        "  cargo run -p app -- courses [--category <{}>]",
        Catalog::categories().join("|")
    );
    eprintln!("  cargo run -p app -- recent");
    eprintln!("  cargo run -p app -- watch <course-id> --seconds <n> [--duration <n>]");
    eprintln!();
    eprintln!("Global options:");
    eprintln!("  --db <sqlite_url>      SQLite URL (default: sqlite:watch.sqlite3?mode=rwc)");
    eprintln!("  --catalog <path>       Catalog JSON (default: data/courses.json)");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  WATCH_DB_URL, WATCH_CATALOG");
}

/// Stand-in widget for the CLI: position and duration are scripted rather
/// than decoded from a real stream.
struct ScriptedWidget {
    position: Mutex<f64>,
    duration: f64,
}

impl ScriptedWidget {
    fn new(duration: f64) -> Self {
        Self {
            position: Mutex::new(0.0),
            duration,
        }
    }

    fn set_position(&self, seconds: f64) {
        if let Ok(mut guard) = self.position.lock() {
            *guard = seconds;
        }
    }
}

impl PlayerWidget for ScriptedWidget {
    fn current_time(&self) -> f64 {
        self.position.lock().map_or(0.0, |guard| *guard)
    }

    fn duration(&self) -> f64 {
        self.duration
    }

    fn seek_to(&self, seconds: f64) {
        self.set_position(seconds);
    }
}

fn print_course_line(course: &Course) {
    let marker = course.category().unwrap_or("-");
    println!("{:>4}  [{marker}]  {}", course.id(), course.title());
}

async fn watch(
    progress: Arc<ProgressService>,
    catalog: &Catalog,
    course_id: CourseId,
    seconds: f64,
    duration_override: Option<f64>,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(course) = catalog.get(course_id) else {
        eprintln!("no course with id {course_id}");
        std::process::exit(1);
    };
    let duration = duration_override
        .or(course.duration_secs())
        .unwrap_or_default();

    let initial = progress
        .progress_for(course_id)
        .await
        .map_or(0.0, |record| record.played_fraction);

    let widget = Arc::new(ScriptedWidget::new(duration));
    let session = PlaybackSession::new(
        course_id,
        Arc::clone(&widget) as Arc<dyn PlayerWidget>,
        Arc::clone(&progress),
        initial,
    );

    session.on_ready().await;
    session.on_play().await;
    // Give the settle delay a chance to land the resume seek.
    tokio::time::sleep(Duration::from_millis(700)).await;
    widget.set_position(seconds);
    session.on_progress(seconds).await;
    session.on_pause().await;
    session.teardown().await;

    match progress.progress_for(course_id).await {
        Some(record) => println!(
            "watched '{}' to {:.1}% ({})",
            course.title(),
            record.played_fraction * 100.0,
            if record.completed { "completed" } else { "in progress" }
        ),
        None => println!("no progress saved (are you logged in?)"),
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let sessions = SessionStore::new(Arc::clone(&storage.documents));
    let users = UserDirectory::new(Arc::clone(&storage.documents));
    let catalog = Arc::new(load_catalog(&args.catalog_path)?);

    let auth = AuthService::new(sessions.clone());
    let progress = Arc::new(ProgressService::new(
        Clock::default(),
        sessions,
        users,
        Arc::clone(&catalog),
    ));

    match args.command {
        Command::Login { username, password } => {
            if auth.login(&username, &password).await {
                println!("logged in as {username}");
            } else {
                eprintln!("invalid credentials");
                std::process::exit(1);
            }
        }
        Command::Logout => {
            auth.logout().await;
            println!("logged out");
        }
        Command::Courses { category } => {
            if !Catalog::categories().contains(&category.as_str()) {
                eprintln!(
                    "unknown category '{category}' (expected one of: {})",
                    Catalog::categories().join(", ")
                );
                std::process::exit(1);
            }
            for course in catalog.by_category(&category) {
                print_course_line(&course);
            }
        }
        Command::Recent => {
            let recent = progress.recent_courses(DEFAULT_RECENT_LIMIT).await;
            if recent.is_empty() {
                println!("nothing watched yet");
            }
            for course in recent {
                print_course_line(&course);
            }
        }
        Command::Watch {
            course_id,
            seconds,
            duration,
        } => watch(progress, &catalog, course_id, seconds, duration).await?,
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
