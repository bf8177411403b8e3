use crate::cli::{Commands, GlobalFlags};

pub mod analyze;
pub mod config;
pub mod fetch;
pub mod report;
pub mod schema;
pub mod shared;

/// Route a parsed command to its handler.
pub async fn dispatch(command: Commands, flags: &GlobalFlags) -> anyhow::Result<()> {
    match command {
        Commands::Analyze(args) => analyze::handle(&args, flags).await,
        Commands::Report(args) => report::handle(&args, flags).await,
        Commands::Fetch(args) => fetch::handle(&args, flags).await,
        Commands::Config => config::handle(flags),
        Commands::Schema => schema::handle(flags),
    }
}
