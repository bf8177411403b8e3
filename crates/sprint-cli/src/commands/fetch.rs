use anyhow::Context;
use serde::Serialize;
use sprint_board::save_snapshot_file;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::FetchArgs;
use crate::commands::shared;
use crate::output::output;

#[derive(Debug, Serialize)]
struct FetchSummary {
    board_id: String,
    board_name: String,
    lists: usize,
    members: usize,
    cards: usize,
    path: String,
}

/// Handle `sprint fetch`: capture a board once for later offline analysis.
pub async fn handle(args: &FetchArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = shared::load_config(flags)?;
    let board_id = config.board_id(args.board.as_deref())?;
    let snapshot = shared::fetch_board(&config, board_id).await?;

    save_snapshot_file(&snapshot, &args.output)
        .with_context(|| format!("failed to save snapshot to {}", args.output.display()))?;
    tracing::info!(path = %args.output.display(), "snapshot saved");

    output(
        &FetchSummary {
            board_id: snapshot.board_id.clone(),
            board_name: snapshot.board_name.clone(),
            lists: snapshot.lists.len(),
            members: snapshot.members.len(),
            cards: snapshot.cards.len(),
            path: args.output.display().to_string(),
        },
        flags.format,
    )
}
