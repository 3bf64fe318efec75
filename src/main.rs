use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrum_agent::config::Config;
use scrum_agent::transport::cli;

#[derive(Parser)]
#[command(name = "scrum-agent")]
#[command(author, version, about = "AI Scrum Agent - generate, review and export Scrum backlogs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backlog service API root (overrides config and SCRUM_AGENT_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive terminal client
    Tui,

    /// Generate a backlog from requirements
    Generate {
        /// Requirements text
        #[arg(short, long, conflicts_with = "file", required_unless_present = "file")]
        requirements: Option<String>,

        /// Read requirements from a file (`-` for stdin)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Story points per sprint (1-100)
        #[arg(short, long)]
        capacity: Option<u32>,

        /// Additional context for the generator
        #[arg(long)]
        context: Option<String>,

        /// Guidance on how to prioritize stories
        #[arg(long)]
        priority_guidance: Option<String>,

        /// Output format: table or json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Show the current backlog
    Show {
        /// Output format: table or json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Record the completed points of a sprint
    Velocity {
        /// Sprint number (asked interactively when missing)
        #[arg(short, long)]
        sprint: Option<u32>,

        /// Completed story points (asked interactively when missing)
        #[arg(short, long)]
        points: Option<u32>,

        /// Free-form retrospective feedback
        #[arg(long)]
        feedback: Option<String>,
    },

    /// Export the backlog (markdown, csv or json)
    Export {
        /// Export format
        format: String,

        /// Directory for the exported file
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },

    /// Delete the current backlog
    Clear {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Re-plan sprints for the current stories
    Plan {
        /// Story points per sprint (1-100)
        #[arg(short, long)]
        capacity: Option<u32>,

        /// Number of sprints to plan
        #[arg(long)]
        sprints: Option<u32>,
    },

    /// Check that the backlog service answers
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "scrum_agent=debug"
    } else {
        "scrum_agent=info"
    };

    // The TUI owns the terminal, so its logs go to a file
    let writer = match cli.command {
        Commands::Tui => match cli::open_tui_log() {
            Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
            Err(_) => BoxMakeWriter::new(std::io::sink),
        },
        _ => BoxMakeWriter::new(std::io::stderr),
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(writer))
        .init();

    let mut config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config, using defaults: {}", e);
        Config::default()
    });
    if let Some(url) = cli.api_url {
        config.service.base_url = url;
    }

    match cli.command {
        Commands::Tui => {
            tracing::info!(base_url = %config.service.base_url, "Starting TUI");
            cli::run_tui(config).await?;
        }
        Commands::Generate {
            requirements,
            file,
            capacity,
            context,
            priority_guidance,
            format,
        } => {
            let requirements = match (requirements, file) {
                (Some(text), _) => text,
                (None, Some(path)) => cli::read_requirements(&path)?,
                (None, None) => String::new(),
            };
            cli::run_generate(config, requirements, capacity, context, priority_guidance, &format)
                .await?;
        }
        Commands::Show { format } => {
            cli::run_show(config, &format).await?;
        }
        Commands::Velocity {
            sprint,
            points,
            feedback,
        } => {
            cli::run_velocity(config, sprint, points, feedback).await?;
        }
        Commands::Export { format, dir } => {
            cli::run_export(config, &format, dir).await?;
        }
        Commands::Clear { yes } => {
            cli::run_clear(config, yes).await?;
        }
        Commands::Plan { capacity, sprints } => {
            cli::run_plan(config, capacity, sprints).await?;
        }
        Commands::Status => {
            cli::run_status(config).await?;
        }
    }

    Ok(())
}
