use std::fmt;

use chrono::{DateTime, Utc};
use storage::documents::UserDirectory;
use storage::repository::Storage;
use watch_core::model::{ProgressLog, UserAccount, UserId, UserRole};

#[derive(Debug, Clone)]
struct Args {
    db_url: String,
    username: String,
    email: String,
    password: String,
    now: Option<DateTime<Utc>>,
}

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidNow { raw: String },
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidNow { raw } => {
                write!(f, "invalid --now value (expected RFC3339): {raw}")
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
        let mut db_url =
            std::env::var("WATCH_DB_URL").unwrap_or_else(|_| "sqlite:watch.sqlite3?mode=rwc".into());
        let mut username = "admin".to_owned();
        let mut email = "admin@example.com".to_owned();
        let mut password = "password123".to_owned();
        let mut now = None;

        let mut args = std::env::args().skip(1);
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => db_url = require_value(&mut args, "--db")?,
                "--username" => username = require_value(&mut args, "--username")?,
                "--email" => email = require_value(&mut args, "--email")?,
                "--password" => password = require_value(&mut args, "--password")?,
                "--now" => {
                    let raw = require_value(&mut args, "--now")?;
                    let parsed = DateTime::parse_from_rfc3339(&raw)
                        .map_err(|_| ArgsError::InvalidNow { raw })?;
                    now = Some(parsed.with_timezone(&Utc));
                }
                "-h" | "--help" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => return Err(ArgsError::UnknownArg(other.to_owned())),
            }
        }

        Ok(Self {
            db_url,
            username,
            email,
            password,
            now,
        })
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p storage --bin seed -- [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --db <sqlite_url>    SQLite URL (default: sqlite:watch.sqlite3?mode=rwc)");
    eprintln!("  --username <name>    Seed account username (default: admin)");
    eprintln!("  --email <email>      Seed account email (default: admin@example.com)");
    eprintln!("  --password <pw>      Seed account password (default: password123)");
    eprintln!("  --now <rfc3339>      Fixed creation time for deterministic seeding");
    eprintln!("  -h, --help           Show this help");
    eprintln!();
    eprintln!("Environment (same as flags):");
    eprintln!("  WATCH_DB_URL");
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse().map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    let storage = Storage::sqlite(&args.db_url).await?;
    let users = UserDirectory::new(storage.documents);
    let now = args.now.unwrap_or_else(Utc::now);

    let mut existing = users.all().await;
    let account = UserAccount {
        id: UserId::new(1),
        username: args.username.clone(),
        email: args.email,
        password: args.password,
        first_name: None,
        last_name: None,
        progress: ProgressLog::new(),
        role: UserRole::Admin,
        created_at: now,
    };
    match existing.iter_mut().find(|user| user.id == account.id) {
        Some(slot) => *slot = account,
        None => existing.push(account),
    }
    users.save_all(&existing).await;

    println!(
        "Seeded user '{}' ({} total) into {}",
        args.username,
        existing.len(),
        args.db_url
    );

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
