/// Version injected at compile time via HALCTL_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("HALCTL_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use halctl::api::HalClient;
use halctl::config::Config;
use halctl::resource::{self, LinkedResource};
use serde::Serialize;
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Client for HAL-style REST management APIs
#[derive(Parser, Debug)]
#[command(name = "halctl", version, about, long_about = None)]
struct Args {
    /// API endpoint, e.g. https://cmp.example.com:8443
    #[arg(long, global = true)]
    url: Option<String>,

    /// Username used to obtain API tokens
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json", global = true)]
    output: OutputFormat,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Authenticate and report whether the credentials work
    Login,
    /// Fetch a resource by its href
    Get { href: String },
    /// Find a resource by exact name
    Find {
        kind: String,
        name: String,
        /// Fail when more than one resource has this name
        #[arg(long)]
        strict: bool,
    },
    /// Resolve a slash-delimited path (e.g. "org/dept/team") in a tree kind
    Resolve { kind: String, path: String },
    /// List the first page of a collection
    List {
        kind: String,
        /// Only resources with exactly this name
        #[arg(long)]
        name: Option<String>,
    },
    /// Show known resource kinds
    Kinds,
    /// Save connection settings to the config file.
    ///
    /// The password is never taken as an argument: pipe it in with
    /// --password-stdin, or set HALCTL_PASSWORD at run time instead.
    Configure {
        #[arg(long)]
        api_version: Option<String>,
        #[arg(long)]
        auth_path: Option<String>,
        #[arg(long)]
        timeout_secs: Option<u64>,
        /// Read the password from the first line of stdin and save it
        #[arg(long)]
        password_stdin: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    let Some(tracing_level) = level.to_tracing_level() else {
        return Ok(None);
    };

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .with_context(|| format!("Failed to open log file {:?}", log_path))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_max_level(tracing_level)
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("halctl {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Ok(Some(guard))
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("halctl").join("halctl.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".halctl").join("halctl.log");
    }
    PathBuf::from("halctl.log")
}

fn print<T: Serialize>(format: OutputFormat, value: &T) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    };
    println!("{}", rendered.trim_end());
    Ok(())
}

/// Effective config (CLI > env > config file)
fn effective_config(args: &Args) -> Config {
    let mut config = Config::load().with_env();
    if let Some(url) = &args.url {
        config.base_url = Some(url.clone());
    }
    if let Some(username) = &args.username {
        config.username = Some(username.clone());
    }
    config
}

fn connect(config: &Config) -> Result<HalClient> {
    let settings = config.client_settings()?;
    tracing::info!("Using endpoint {}", settings.base_url);
    HalClient::new(settings).context("Failed to create API client")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level)?;

    let config = effective_config(&args);

    match &args.command {
        Command::Login => {
            let client = connect(&config)?;
            let status = client.authenticate().await.context("Login failed")?;
            println!("Authenticated as {} ({})", client.session().username(), status);
        },
        Command::Get { href } => {
            let client = connect(&config)?;
            let value: serde_json::Value = resource::get_href(&client, href).await?;
            print(args.output, &value)?;
        },
        Command::Find { kind, name, strict } => {
            let client = connect(&config)?;
            let kind = resource::get_kind(kind)?;
            let found: LinkedResource = if *strict {
                resource::find_unique_by_name(&client, &kind, name).await?
            } else {
                resource::find_by_name(&client, &kind, name).await?
            };
            print(args.output, &found)?;
        },
        Command::Resolve { kind, path } => {
            let client = connect(&config)?;
            let kind = resource::get_kind(kind)?;
            let found: LinkedResource = resource::resolve(&client, &kind, path).await?;
            print(args.output, &found)?;
        },
        Command::List { kind, name } => {
            let client = connect(&config)?;
            let kind = resource::get_kind(kind)?;
            let page =
                resource::list_filtered::<serde_json::Value>(&client, &kind, name.as_deref()).await?;
            print(args.output, &page)?;
        },
        Command::Kinds => {
            print(args.output, &resource::ALL_KINDS)?;
        },
        Command::Configure {
            api_version,
            auth_path,
            timeout_secs,
            password_stdin,
        } => {
            // Persist file values plus CLI flags only; env vars stay out of the file
            let mut saved = Config::load();
            if let Some(url) = &args.url {
                saved.base_url = Some(url.clone());
            }
            if let Some(username) = &args.username {
                saved.username = Some(username.clone());
            }
            if let Some(v) = api_version {
                saved.api_version = v.clone();
            }
            if let Some(p) = auth_path {
                saved.auth_path = p.clone();
            }
            if let Some(t) = timeout_secs {
                saved.timeout_secs = *t;
            }
            if *password_stdin {
                saved
                    .read_password(std::io::stdin().lock())
                    .context("Failed to read password from stdin")?;
            }
            saved.save().context("Failed to save config")?;
            match Config::config_path() {
                Some(path) => println!("Saved {}", path.display()),
                None => println!("No config directory available; nothing saved"),
            }
        },
    }

    Ok(())
}
