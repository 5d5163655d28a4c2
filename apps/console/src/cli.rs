//! Command-line surface of the admin console.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Autonomo Control administration console.
#[derive(Parser, Debug)]
#[command(name = "autonomo", version, about = "Autonomo Control admin console", long_about = None)]
pub struct Cli {
    /// API base URL, overrides AUTONOMO_API_BASE_URL
    #[arg(long, global = true)]
    pub api_base_url: Option<String>,

    /// Token file path, overrides AUTONOMO_TOKEN_PATH
    #[arg(long, global = true)]
    pub token_path: Option<PathBuf>,

    /// Request timeout in seconds, overrides AUTONOMO_HTTP_TIMEOUT_SECS
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Sign in and store the session token
    Login(LoginArgs),
    /// Remove the stored session token
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Check whether a usable session token is stored
    Status,
    /// Create an account
    Register(RegisterArgs),
    /// Audit log inspection and retention
    #[command(subcommand)]
    Audit(AuditCommand),
    /// System configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Administrative reports
    #[command(subcommand)]
    Reports(ReportsCommand),
    /// Account administration
    #[command(subcommand)]
    Users(UsersCommand),
}

/// Sign-in credentials.
#[derive(Args, Debug, Clone)]
pub struct LoginArgs {
    /// Account email
    #[arg(long, required_unless_present = "google_token")]
    pub email: Option<String>,

    /// Account password
    #[arg(long, env = "AUTONOMO_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Google ID token, used instead of email and password
    #[arg(long, conflicts_with = "email")]
    pub google_token: Option<String>,
}

/// New account fields.
#[derive(Args, Debug, Clone)]
pub struct RegisterArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Display name
    #[arg(long)]
    pub name: String,

    /// Account password
    #[arg(long, env = "AUTONOMO_NEW_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Audit log subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum AuditCommand {
    /// List entries matching a filter
    List(AuditFilterArgs),
    /// Show aggregated statistics
    Stats(DaysArgs),
    /// Show the action and resource type filter options
    Actions,
    /// Delete entries older than a retention window
    Cleanup {
        /// Days of history to keep
        #[arg(long, default_value_t = 90)]
        days_to_keep: u32,
    },
    /// Export matching entries as CSV
    Export {
        #[command(flatten)]
        filter: AuditFilterArgs,

        /// Output directory for the CSV file
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,
    },
}

/// Audit log filter flags.
#[derive(Args, Debug, Clone, Default)]
pub struct AuditFilterArgs {
    /// Action code, e.g. LOGIN
    #[arg(long)]
    pub action: Option<String>,

    /// Resource type, e.g. USER
    #[arg(long)]
    pub resource_type: Option<String>,

    /// Actor email
    #[arg(long)]
    pub performed_by: Option<String>,

    /// Lower bound, ISO date or instant
    #[arg(long)]
    pub start_date: Option<String>,

    /// Upper bound, ISO date or instant
    #[arg(long)]
    pub end_date: Option<String>,

    /// Rows skipped
    #[arg(long, default_value_t = 0)]
    pub skip: u32,

    /// Maximum rows returned
    #[arg(long, default_value_t = 100)]
    pub limit: u32,
}

/// Reporting window.
#[derive(Args, Debug, Clone, Default)]
pub struct DaysArgs {
    /// Window length in days (30 when omitted)
    #[arg(long)]
    pub days: Option<u32>,
}

/// System configuration subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommand {
    /// List configuration values
    List {
        /// Restrict to one category
        #[arg(long, conflicts_with = "public")]
        category: Option<String>,

        /// Restrict to public values
        #[arg(long)]
        public: bool,
    },
    /// Show one value
    Get {
        /// Dotted key, e.g. app.name
        key: String,
    },
    /// Update one or more values given as KEY=VALUE pairs
    Set {
        /// Pairs such as app.name="Autonomo" security.session_timeout=45
        #[arg(required = true, value_parser = parse_assignment)]
        assignments: Vec<(String, String)>,
    },
    /// Show change history
    History {
        /// Restrict to one key
        #[arg(long)]
        key: Option<String>,

        /// Maximum rows returned
        #[arg(long)]
        limit: Option<u32>,
    },
    /// List known categories
    Categories,
    /// Restore every value to its default
    Reset,
    /// Create missing default values
    Initialize,
}

/// Report subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum ReportsCommand {
    /// Landing page aggregate
    Dashboard,
    /// User population statistics
    Users(DaysArgs),
    /// Usage statistics
    Usage(DaysArgs),
    /// Financial overview
    Financial(DaysArgs),
    /// Engagement report
    Engagement(DaysArgs),
    /// Backend health
    Health,
    /// Every windowed report plus health
    All(DaysArgs),
}

/// Account administration subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum UsersCommand {
    /// List accounts
    List {
        /// Free text matched against name and email
        #[arg(long)]
        search: Option<String>,

        /// Role filter
        #[arg(long)]
        role: Option<String>,

        /// Status filter
        #[arg(long)]
        active: Option<bool>,

        /// Rows skipped
        #[arg(long, default_value_t = 0)]
        skip: u32,

        /// Maximum rows returned
        #[arg(long, default_value_t = 100)]
        limit: u32,
    },
    /// Show one account
    Show {
        /// Account id
        id: i64,
    },
    /// Allow an account to sign in
    Activate {
        /// Account id
        id: i64,
    },
    /// Block an account from signing in
    Deactivate {
        /// Account id
        id: i64,
    },
}

fn parse_assignment(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }

    Ok((key.to_owned(), value.to_owned()))
}
