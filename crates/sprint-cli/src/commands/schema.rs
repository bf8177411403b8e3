use schemars::schema_for;
use sprint_core::board::BoardSnapshot;

use crate::cli::GlobalFlags;
use crate::output::output;

/// Handle `sprint schema`: the JSON schema accepted by `--snapshot`.
pub fn handle(flags: &GlobalFlags) -> anyhow::Result<()> {
    output(&schema_for!(BoardSnapshot), flags.format)
}
