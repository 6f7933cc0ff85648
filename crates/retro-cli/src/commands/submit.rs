use std::process::ExitCode;

use retro_core::urls::normalize_url;
use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::UrlArgs;
use crate::context::AppContext;
use crate::output::{lines, output};

#[derive(Serialize)]
struct SubmitResponse {
    url: String,
    queued: bool,
}

/// Handle `retrograde <orbit> submit`.
pub fn handle(args: &UrlArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let store = ctx.open_store()?;
    let queued = retro_api::submit_url(&store, &args.url)?;
    let response = SubmitResponse {
        url: normalize_url(&args.url)?,
        queued,
    };
    output(&response, flags.format, |r| {
        if r.queued {
            format!("Submitted {}", r.url)
        } else {
            format!("Already submitted: {}", r.url)
        }
    })?;
    Ok(ExitCode::SUCCESS)
}

/// Handle `retrograde <orbit> submissions`.
pub fn handle_list(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let store = ctx.open_store()?;
    let urls = store.read_submissions()?;
    output(&urls, flags.format, |urls| lines(urls))?;
    Ok(ExitCode::SUCCESS)
}
