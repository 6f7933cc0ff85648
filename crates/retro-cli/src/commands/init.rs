use std::process::ExitCode;

use anyhow::Context;
use retro_core::Settings;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::InitArgs;
use crate::context::AppContext;
use crate::output::output;

/// Handle `retrograde <orbit> init`.
pub fn handle(args: &InitArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let store = ctx.new_store()?;
    if store.is_initialized() {
        anyhow::bail!(
            "orbit '{}' is already initialized at {}",
            ctx.orbit_id,
            store.dir().display()
        );
    }

    let settings = store
        .init_settings(&Settings::new(&args.name, &args.base_url))
        .with_context(|| format!("failed to initialize orbit '{}'", ctx.orbit_id))?;
    tracing::info!(orbit = %ctx.orbit_id, dir = %store.dir().display(), "orbit initialized");

    output(&settings, flags.format, |s| {
        format!("Initialized orbit '{}' with base URL {}", s.name, s.base_url)
    })?;
    Ok(ExitCode::SUCCESS)
}
