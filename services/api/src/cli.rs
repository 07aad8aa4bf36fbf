use crate::commands::{run_lead_create, LeadCreateArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use showroom_leads::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Showroom Leads",
    about = "Serve and exercise the showroom lead intake workflow",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Work with leads from the command line
    Lead {
        #[command(subcommand)]
        command: LeadCommand,
    },
}

#[derive(Subcommand, Debug)]
enum LeadCommand {
    /// Create a lead from a JSON payload file against the configured showroom catalog
    Create(LeadCreateArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Lead {
            command: LeadCommand::Create(args),
        } => run_lead_create(args),
    }
}
