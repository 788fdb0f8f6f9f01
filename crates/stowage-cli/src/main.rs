use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use stowage_app::CalendarMode;
use stowage_core::{Priority, StowageConfig, Theme};
use tracing::debug;

mod commands;

use commands::Output;

#[derive(Parser)]
#[command(
    name = "stowage",
    about = "Stowage: user dashboard and todo manager over synced local storage",
    version,
    propagate_version = true,
)]
struct Cli {
    /// Path to stowage.toml (defaults apply when it does not exist)
    #[arg(short, long, global = true, default_value = "stowage.toml")]
    config: PathBuf,
    /// Output format: text or json
    #[arg(short, long, global = true, default_value = "text")]
    format: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a stowage.toml scaffold
    Init {
        /// Directory holding the redb state file
        #[arg(long, default_value = ".stowage")]
        data_dir: PathBuf,
        /// Prefix every storage key with this namespace
        #[arg(long)]
        namespace: Option<String>,
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Show or change the colour theme
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
    /// Sign in. Any well-formed email is accepted.
    Login {
        #[arg(short, long)]
        email: String,
        /// Accepted for parity with the login screen; never checked
        #[arg(short, long, default_value = "")]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Manage user records (requires login)
    Users {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage todos (requires login)
    Todos {
        #[command(subcommand)]
        action: TodoAction,
    },
    /// Show todos on a calendar (requires login)
    Calendar {
        /// month, week or day
        #[arg(long, default_value = "month")]
        view: CalendarMode,
        /// Any day inside the window to show (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Inspect raw storage slots
    Storage {
        #[command(subcommand)]
        action: StorageAction,
    },
}

#[derive(Subcommand)]
enum ThemeAction {
    Show,
    Toggle,
    Set { theme: Theme },
}

#[derive(Subcommand)]
enum UserAction {
    List,
    Show {
        id: u64,
    },
    Add {
        #[command(flatten)]
        fields: commands::users::UserFields,
    },
    Edit {
        id: u64,
        #[command(flatten)]
        fields: commands::users::UserFields,
    },
    Delete {
        id: u64,
    },
}

#[derive(Subcommand)]
enum TodoAction {
    List,
    Add {
        title: String,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<NaiveDate>,
        /// low (whenever), medium (soon) or high (asap)
        #[arg(long, default_value = "medium")]
        priority: Priority,
    },
    /// Toggle a todo's completion
    Done {
        id: u64,
    },
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,
        #[arg(long)]
        clear_due: bool,
        #[arg(long)]
        priority: Option<Priority>,
    },
    Delete {
        id: u64,
    },
    /// Remove every completed todo
    ClearCompleted,
}

#[derive(Subcommand)]
enum StorageAction {
    /// List occupied slots
    Keys,
    /// Print a slot's raw content
    Get { key: String },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = StowageConfig::load_or_default(&cli.config)?;

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log.filter))?,
        )
        .init();
    debug!(config = %cli.config.display(), backend = ?config.storage.backend, "config loaded");

    let out = Output::parse(&cli.format)?;

    if let Commands::Init {
        data_dir,
        namespace,
        force,
    } = &cli.command
    {
        return commands::init::init(&cli.config, data_dir, namespace.as_deref(), *force);
    }

    let ws = commands::open_workspace(&config)?;

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Theme { action } => match action {
            ThemeAction::Show => commands::theme::show(&ws, out),
            ThemeAction::Toggle => commands::theme::toggle(&ws, out),
            ThemeAction::Set { theme } => commands::theme::set(&ws, theme, out),
        },
        Commands::Login { email, password } => commands::session::login(&ws, email, password, out),
        Commands::Logout => commands::session::logout(&ws),
        Commands::Whoami => commands::session::whoami(&ws, out),
        Commands::Users { action } => {
            ws.require_user()?;
            match action {
                UserAction::List => commands::users::list(&ws, out),
                UserAction::Show { id } => commands::users::show(&ws, id, out),
                UserAction::Add { fields } => commands::users::add(&ws, fields, out),
                UserAction::Edit { id, fields } => commands::users::edit(&ws, id, fields, out),
                UserAction::Delete { id } => commands::users::delete(&ws, id),
            }
        }
        Commands::Todos { action } => {
            ws.require_user()?;
            match action {
                TodoAction::List => commands::todos::list(&ws, out),
                TodoAction::Add {
                    title,
                    due,
                    priority,
                } => commands::todos::add(&ws, &title, due, priority, out),
                TodoAction::Done { id } => commands::todos::toggle(&ws, id, out),
                TodoAction::Edit {
                    id,
                    title,
                    due,
                    clear_due,
                    priority,
                } => {
                    let due = if clear_due { Some(None) } else { due.map(Some) };
                    commands::todos::edit(&ws, id, title, due, priority, out)
                }
                TodoAction::Delete { id } => commands::todos::delete(&ws, id),
                TodoAction::ClearCompleted => commands::todos::clear_completed(&ws),
            }
        }
        Commands::Calendar { view, date } => {
            ws.require_user()?;
            commands::calendar::show(&ws, view, date, out)
        }
        Commands::Storage { action } => match action {
            StorageAction::Keys => commands::storage::keys(&ws, out),
            StorageAction::Get { key } => commands::storage::get(&ws, &key),
        },
    }
}
