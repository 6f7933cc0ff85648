use std::process::ExitCode;

use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::UrlArgs;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct DashboardResponse {
    gemtext: String,
}

/// Handle `retrograde <orbit> dashboard`.
pub fn handle(args: &UrlArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let store = ctx.open_store()?;
    let response = DashboardResponse {
        gemtext: retro_api::render_dashboard(&store, &args.url)?,
    };
    output(&response, flags.format, |r| r.gemtext.clone())?;
    Ok(ExitCode::SUCCESS)
}
