use std::process::ExitCode;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::{lines, output};

/// Handle `retrograde <orbit> list`.
pub fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let store = ctx.open_store()?;
    let urls = retro_api::list_urls(&store)?;
    output(&urls, flags.format, |urls| lines(urls))?;
    Ok(ExitCode::SUCCESS)
}
