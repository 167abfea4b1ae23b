use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "weekplan", version, about = "Weekly application planner")]
struct Cli {
    /// User id (defaults to `default_user` from config)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Weekly plan and progress
    Plan {
        #[command(subcommand)]
        action: commands::plan::PlanAction,
    },
    /// Container (application) management
    Container {
        #[command(subcommand)]
        action: commands::container::ContainerAction,
    },
    /// Work item management
    Item {
        #[command(subcommand)]
        action: commands::item::ItemAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Logs go to stderr so JSON on stdout stays parseable.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("WEEKPLAN_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Plan { action } => commands::plan::run(action, commands::resolve_user(cli.user)),
        Commands::Container { action } => {
            commands::container::run(action, commands::resolve_user(cli.user))
        }
        Commands::Item { action } => commands::item::run(action, commands::resolve_user(cli.user)),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
