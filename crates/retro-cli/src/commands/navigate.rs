use std::process::ExitCode;

use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{RandomArgs, UrlArgs};
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct NavigateResponse {
    url: Option<String>,
}

const EMPTY_POOL: &str = "No (other) URLs in orbit!";

/// Handle `retrograde <orbit> next`.
pub fn handle_next(args: &UrlArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let store = ctx.open_store()?;
    let url = retro_api::next_url(&store, &args.url)?;
    respond(Some(url), flags)
}

/// Handle `retrograde <orbit> prev`.
pub fn handle_prev(args: &UrlArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let store = ctx.open_store()?;
    let url = retro_api::prev_url(&store, &args.url)?;
    respond(Some(url), flags)
}

/// Handle `retrograde <orbit> random`. Exits with failure when nothing can be picked.
pub fn handle_random(
    args: &RandomArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<ExitCode> {
    let store = ctx.open_store()?;
    let url = retro_api::random_url(&store, args.url.as_deref())?;
    respond(url, flags)
}

fn respond(url: Option<String>, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let response = NavigateResponse { url };
    output(&response, flags.format, text)?;
    Ok(exit_code(&response))
}

fn text(response: &NavigateResponse) -> String {
    response
        .url
        .clone()
        .unwrap_or_else(|| EMPTY_POOL.to_string())
}

const fn exit_code(response: &NavigateResponse) -> ExitCode {
    if response.url.is_some() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use std::process::ExitCode;

    use retro_core::Settings;

    use super::*;
    use crate::cli::OutputFormat;
    use crate::output::render;

    fn orbit(temp: &tempfile::TempDir, members: &[&str]) -> (AppContext, GlobalFlags) {
        let flags = GlobalFlags {
            format: OutputFormat::Text,
            quiet: true,
            verbose: false,
            state_dir: Some(temp.path().to_path_buf()),
        };
        let ctx = AppContext::new("demo", retro_config::RetroConfig::default(), &flags).unwrap();
        let store = ctx.new_store().unwrap();
        store
            .init_settings(&Settings::new("Demo", "gemini://orbit.example/demo/"))
            .unwrap();
        for member in members {
            store.insert_member(member).unwrap();
        }
        (ctx, flags)
    }

    fn same(a: ExitCode, b: ExitCode) -> bool {
        format!("{a:?}") == format!("{b:?}")
    }

    #[test]
    fn random_from_empty_orbit_fails() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, flags) = orbit(&temp, &[]);

        let code = handle_random(&RandomArgs { url: None }, &ctx, &flags).unwrap();
        assert!(same(code, ExitCode::FAILURE));
    }

    #[test]
    fn random_excluding_the_only_member_fails() {
        let temp = tempfile::tempdir().unwrap();
        let (ctx, flags) = orbit(&temp, &["gemini://a.example/"]);

        let args = RandomArgs {
            url: Some(String::from("gemini://a.example/")),
        };
        assert!(same(handle_random(&args, &ctx, &flags).unwrap(), ExitCode::FAILURE));
        assert!(same(
            handle_random(&RandomArgs { url: None }, &ctx, &flags).unwrap(),
            ExitCode::SUCCESS
        ));
    }

    #[test]
    fn empty_pool_message_and_exit_code() {
        let response = NavigateResponse { url: None };
        assert_eq!(
            render(&response, OutputFormat::Text, text).unwrap(),
            "No (other) URLs in orbit!"
        );
        assert!(same(exit_code(&response), ExitCode::FAILURE));

        let json = render(&response, OutputFormat::Json, text).unwrap();
        assert_eq!(serde_json::from_str::<serde_json::Value>(&json).unwrap()["url"], serde_json::Value::Null);
    }

    #[test]
    fn picked_url_is_printed_as_is() {
        let response = NavigateResponse {
            url: Some(String::from("gemini://a.example/")),
        };
        assert_eq!(
            render(&response, OutputFormat::Text, text).unwrap(),
            "gemini://a.example/"
        );
        assert!(same(exit_code(&response), ExitCode::SUCCESS));
    }
}
