use clap::{Parser, Subcommand};
use opsdeck_cli::commands;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    /// Dashboard server endpoint
    #[arg(short, long, global = true, default_value = opsdeck_config::DEFAULT_SERVER_URL)]
    url: String,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the groups and their instruction statuses
    Groups,
    /// List the available command templates
    Commands,
    /// Print the most recent log entries
    Logs {
        /// Keep paging until the start of the log
        #[arg(long)]
        all: bool,
    },
    /// List user accounts known to the server
    Users,
    /// List global variables
    Variables,
    /// Request execution of a whole group
    #[command(name = "apply-group")]
    ApplyGroup { id: String },
    /// Request execution of a single instruction
    #[command(name = "apply-instruction")]
    ApplyInstruction { id: String },
    /// Stay connected and stream state changes
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::WARN
    };
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber).expect("default subscriber");

    match cli.command {
        Commands::Groups => commands::cmd_groups(&cli.url).await?,
        Commands::Commands => commands::cmd_commands(&cli.url).await?,
        Commands::Logs { all } => commands::cmd_logs(&cli.url, all).await?,
        Commands::Users => commands::cmd_users(&cli.url).await?,
        Commands::Variables => commands::cmd_variables(&cli.url).await?,
        Commands::ApplyGroup { id } => commands::cmd_apply_group(&cli.url, id).await?,
        Commands::ApplyInstruction { id } => commands::cmd_apply_instruction(&cli.url, id).await?,
        Commands::Watch => commands::cmd_watch(&cli.url).await?,
    }

    Ok(())
}
