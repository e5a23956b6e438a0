mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "amp",
    about = "Action Amplifier — capture, triage, and review your next actions",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (default: ~/.amp)
    #[arg(long, global = true, env = "AMP_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scaffold a new user directory
    Init {
        /// User slug (lowercase, hyphenated)
        user: String,
    },

    /// Capture a thought into the inbox
    Capture {
        user: String,
        title: String,
        /// Free-form note body
        #[arg(long)]
        body: Option<String>,
    },

    /// List open inbox items
    Inbox { user: String },

    /// Turn an inbox item into a project action
    Triage {
        user: String,
        /// Inbox item id
        id: String,
        #[arg(long)]
        area: String,
        #[arg(long)]
        project: String,
        /// Override the action title (default: the item's title)
        #[arg(long)]
        title: Option<String>,
        /// low, medium, or high
        #[arg(long)]
        priority: Option<String>,
    },

    /// Open (or create) today's review entry
    Review {
        user: String,
        /// daily, weekly, or monthly
        cadence: String,
    },

    /// Start the HTTP server
    Serve {
        /// Port to listen on (0 = OS-assigned)
        #[arg(long, default_value = "2900")]
        port: u16,

        /// Open the browser once listening
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Serve { .. } => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let result = root::resolve_root(cli.root.as_deref())
        .map_err(anyhow::Error::from)
        .and_then(|root| match cli.command {
            Commands::Init { user } => cmd::init::run(&root, &user),
            Commands::Capture { user, title, body } => {
                cmd::capture::run(&root, &user, &title, body.as_deref(), cli.json)
            }
            Commands::Inbox { user } => cmd::inbox::run(&root, &user, cli.json),
            Commands::Triage {
                user,
                id,
                area,
                project,
                title,
                priority,
            } => cmd::triage::run(
                &root,
                &user,
                &id,
                &area,
                &project,
                title.as_deref(),
                priority.as_deref(),
                cli.json,
            ),
            Commands::Review { user, cadence } => cmd::review::run(&root, &user, &cadence, cli.json),
            Commands::Serve { port, open } => cmd::serve::run(&root, port, open),
        });

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
