use crate::cli::GlobalFlags;
use crate::commands::shared;
use crate::output::output;

/// Handle `sprint config`: print the effective configuration, secrets masked.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    let config = shared::load_config(flags)?;
    output(&config.redacted(), flags.format)
}
