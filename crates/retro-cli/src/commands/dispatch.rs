use std::process::ExitCode;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Dir => commands::dir::handle(ctx, flags),
        Commands::Init(args) => commands::init::handle(&args, ctx, flags),
        Commands::List => commands::list::handle(ctx, flags),
        Commands::Check(args) => commands::check::handle(&args, ctx, flags).await,
        Commands::CheckLog(args) => commands::check::handle_log(&args, ctx, flags),
        Commands::CheckSubmissions => commands::check::handle_submissions(ctx, flags).await,
        Commands::Submit(args) => commands::submit::handle(&args, ctx, flags),
        Commands::Submissions => commands::submit::handle_list(ctx, flags),
        Commands::Next(args) => commands::navigate::handle_next(&args, ctx, flags),
        Commands::Prev(args) => commands::navigate::handle_prev(&args, ctx, flags),
        Commands::Random(args) => commands::navigate::handle_random(&args, ctx, flags),
        Commands::Dashboard(args) => commands::dashboard::handle(&args, ctx, flags),
    }
}
