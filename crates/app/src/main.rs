use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock, DEFAULT_BATCH_SIZE, StoreConfig};
use storage::import::import_questions;
use storage::remote::RemoteConfig;
use storage::repository::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://factquiz.sqlite3";
const DEFAULT_LOG_FILTER: &str = "info,sqlx=warn,reqwest=warn";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidBatchSize { raw: String },
    MissingSeedFile,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidBatchSize { raw } => {
                write!(f, "invalid --batch-size value: {raw}")
            }
            ArgsError::MissingSeedFile => write!(f, "seed requires --file <json>"),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui   [--db <sqlite_url>] [--store-url <url>] [--batch-size <n>]");
    eprintln!("  cargo run -p app -- seed --file <json> [--db <sqlite_url>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --batch-size {DEFAULT_BATCH_SIZE}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  FACTQUIZ_DB_URL, FACTQUIZ_STORE_URL, FACTQUIZ_STORE_KEY, FACTQUIZ_BATCH_SIZE, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Seed,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "seed" => Some(Self::Seed),
            _ => None,
        }
    }
}

#[derive(Debug)]
struct Args {
    db_url: String,
    store_url: Option<String>,
    batch_size: usize,
    seed_file: Option<PathBuf>,
}

impl Args {
    fn from_env() -> Result<Self, ArgsError> {
        let db_url = std::env::var("FACTQUIZ_DB_URL")
            .ok()
            .filter(|value| !value.trim().is_empty())
            .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url);
        let store_url = std::env::var("FACTQUIZ_STORE_URL")
            .ok()
            .filter(|value| !value.trim().is_empty());
        let batch_size = match std::env::var("FACTQUIZ_BATCH_SIZE") {
            Ok(raw) => parse_batch_size(raw)?,
            Err(_) => DEFAULT_BATCH_SIZE,
        };
        Ok(Self {
            db_url,
            store_url,
            batch_size,
            seed_file: None,
        })
    }

    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::from_env()?;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--store-url" => {
                    parsed.store_url = Some(require_value(args, "--store-url")?);
                }
                "--batch-size" => {
                    parsed.batch_size = parse_batch_size(require_value(args, "--batch-size")?)?;
                }
                "--file" if cmd == Command::Seed => {
                    parsed.seed_file = Some(PathBuf::from(require_value(args, "--file")?));
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Seed && parsed.seed_file.is_none() {
            return Err(ArgsError::MissingSeedFile);
        }
        Ok(parsed)
    }

    fn store_config(&self) -> Result<StoreConfig, Box<dyn std::error::Error>> {
        let remote = match &self.store_url {
            Some(url) => {
                let key = std::env::var("FACTQUIZ_STORE_KEY").unwrap_or_default();
                Some(RemoteConfig::new(url, key)?)
            }
            None => None,
        };
        Ok(StoreConfig {
            db_url: self.db_url.clone(),
            remote,
            batch_size: self.batch_size,
        })
    }
}

fn parse_batch_size(raw: String) -> Result<usize, ArgsError> {
    match raw.trim().parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(ArgsError::InvalidBatchSize { raw }),
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init();
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // No subcommand launches the UI.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();
    prepare_sqlite_file(&parsed.db_url)?;

    match cmd {
        Command::Ui => {
            let config = parsed.store_config()?;
            let services = AppServices::connect(&config, Clock::system()).await?;
            info!(
                db = %config.db_url,
                remote = config.remote.is_some(),
                batch_size = config.batch_size,
                "services ready"
            );

            let app: Arc<dyn UiApp> = Arc::new(services);
            let context = build_app_context(&app);

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title("Fake News Quiz")
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Seed => {
            let Some(file) = parsed.seed_file.as_ref() else {
                return Err(ArgsError::MissingSeedFile.into());
            };
            let json = std::fs::read_to_string(file)?;
            let storage = Storage::sqlite(&parsed.db_url).await?;
            let report = import_questions(storage.questions.as_ref(), &json).await?;
            info!(
                file = %file.display(),
                imported = report.imported,
                skipped = report.skipped,
                "seed finished"
            );
            println!(
                "imported {} fact checks ({} skipped) into {}",
                report.imported, report.skipped, parsed.db_url
            );
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(items: &[&str]) -> std::vec::IntoIter<String> {
        items
            .iter()
            .map(|s| (*s).to_string())
            .collect::<Vec<_>>()
            .into_iter()
    }

    #[test]
    fn seed_requires_a_file() {
        let err = Args::parse(Command::Seed, &mut args(&[])).unwrap_err();
        assert!(matches!(err, ArgsError::MissingSeedFile));

        let parsed = Args::parse(Command::Seed, &mut args(&["--file", "facts.json"])).unwrap();
        assert_eq!(parsed.seed_file, Some(PathBuf::from("facts.json")));
    }

    #[test]
    fn ui_rejects_seed_only_flags_and_bad_sizes() {
        let err = Args::parse(Command::Ui, &mut args(&["--file", "x.json"])).unwrap_err();
        assert!(matches!(err, ArgsError::UnknownArg(_)));

        let err = Args::parse(Command::Ui, &mut args(&["--batch-size", "0"])).unwrap_err();
        assert!(matches!(err, ArgsError::InvalidBatchSize { .. }));

        let err = Args::parse(Command::Ui, &mut args(&["--db"])).unwrap_err();
        assert!(matches!(err, ArgsError::MissingValue { flag: "--db" }));
    }

    #[test]
    fn flags_override_defaults() {
        let parsed = Args::parse(
            Command::Ui,
            &mut args(&["--db", "sqlite://quiz.db", "--batch-size", "5", "--store-url", "https://db.example.org"]),
        )
        .unwrap();
        assert_eq!(parsed.db_url, "sqlite://quiz.db");
        assert_eq!(parsed.batch_size, 5);
        assert_eq!(parsed.store_url.as_deref(), Some("https://db.example.org"));
    }

    #[test]
    fn relative_paths_become_absolute_urls() {
        let url = normalize_sqlite_url("data/quiz.sqlite3".to_string());
        assert!(url.starts_with("sqlite:///"));
        assert!(url.ends_with("data/quiz.sqlite3"));
        assert_eq!(normalize_sqlite_url("sqlite::memory:".into()), "sqlite::memory:");
    }
}
