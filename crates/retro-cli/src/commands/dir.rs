use std::process::ExitCode;

use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct DirResponse {
    orbit_id: String,
    dir: String,
    initialized: bool,
}

/// Handle `retrograde <orbit> dir`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let store = ctx.new_store()?;
    let response = DirResponse {
        orbit_id: ctx.orbit_id.clone(),
        dir: store.dir().display().to_string(),
        initialized: store.is_initialized(),
    };
    output(&response, flags.format, |r| r.dir.clone())?;
    Ok(ExitCode::SUCCESS)
}
