use std::process::ExitCode;

use retro_check::CheckOutcome;
use retro_core::{CheckLog, Verdict};
use serde::Serialize;

use crate::cli::root_commands::UrlArgs;
use crate::cli::{GlobalFlags, OutputFormat};
use crate::context::AppContext;
use crate::output::output;

const NO_CHECK_LOG: &str = "No check log found.";

#[derive(Debug, Serialize)]
struct CheckResponse {
    url: String,
    verdict: Verdict,
    was_valid: bool,
    is_valid: bool,
    message: String,
}

impl From<&CheckOutcome> for CheckResponse {
    fn from(outcome: &CheckOutcome) -> Self {
        Self {
            url: outcome.url.clone(),
            verdict: outcome.verdict,
            was_valid: outcome.log.was_valid,
            is_valid: outcome.log.is_valid,
            message: outcome.log.message.clone(),
        }
    }
}

/// Handle `retrograde <orbit> check`.
pub async fn handle(args: &UrlArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let store = ctx.open_store()?;
    let fetcher = ctx.fetcher()?;
    let outcome = retro_check::check_url(&store, &fetcher, &args.url).await?;
    output(&CheckResponse::from(&outcome), flags.format, |r| r.message.clone())?;
    Ok(ExitCode::SUCCESS)
}

/// Handle `retrograde <orbit> check-log`.
pub fn handle_log(args: &UrlArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let store = ctx.open_store()?;
    let log = store.read_check_log(&args.url)?;
    output(&log, flags.format, log_text)?;
    Ok(ExitCode::SUCCESS)
}

#[allow(clippy::ref_option)]
fn log_text(log: &Option<CheckLog>) -> String {
    log.as_ref()
        .map_or_else(|| String::from(NO_CHECK_LOG), |log| log.message.clone())
}

/// Handle `retrograde <orbit> check-submissions`.
///
/// Text output reports each page as soon as it has been checked.
pub async fn handle_submissions(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<ExitCode> {
    let store = ctx.open_store()?;
    let fetcher = ctx.fetcher()?;
    let stream_text = flags.format == OutputFormat::Text;

    let outcomes = retro_check::check_submissions(&store, &fetcher, |outcome| {
        if stream_text {
            println!("{}", summary_line(outcome));
        }
    })
    .await?;

    if stream_text {
        if outcomes.is_empty() && !flags.quiet {
            println!("No submissions to check.");
        }
    } else {
        let responses = outcomes.iter().map(CheckResponse::from).collect::<Vec<_>>();
        output(&responses, flags.format, |_| String::new())?;
    }
    Ok(ExitCode::SUCCESS)
}

fn summary_line(outcome: &CheckOutcome) -> String {
    format!("{}: {}", outcome.url, outcome.verdict.label())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use retro_check::{MemoryFetcher, check_url};
    use retro_core::{NavigationLinks, Settings};
    use retro_db::OrbitStore;

    use super::*;
    use crate::output::render;

    const BASE: &str = "gemini://orbit.example/demo/";
    const PAGE: &str = "gemini://page.example/";

    fn orbit(temp: &tempfile::TempDir) -> OrbitStore {
        let store = OrbitStore::new(
            temp.path().join("demo"),
            std::sync::Arc::new(retro_db::FileLocker::new()),
        );
        store.init_settings(&Settings::new("Demo", BASE)).unwrap();
        store
    }

    #[test]
    fn missing_check_log_is_reported() {
        let temp = tempfile::tempdir().unwrap();
        orbit(&temp);
        let flags = GlobalFlags {
            format: OutputFormat::Text,
            quiet: true,
            verbose: false,
            state_dir: Some(temp.path().to_path_buf()),
        };
        let ctx = AppContext::new("demo", retro_config::RetroConfig::default(), &flags).unwrap();

        let args = UrlArgs {
            url: String::from(PAGE),
        };
        let code = handle_log(&args, &ctx, &flags).unwrap();
        assert_eq!(format!("{code:?}"), format!("{:?}", ExitCode::SUCCESS));

        assert_eq!(render(&None, OutputFormat::Text, log_text).unwrap(), "No check log found.");
        assert_eq!(render(&None::<CheckLog>, OutputFormat::Json, log_text).unwrap(), "null");
    }

    #[test]
    fn stored_check_log_message_is_printed() {
        let log = CheckLog {
            timestamp: 0,
            is_valid: false,
            was_valid: false,
            message: String::from("Result: Remains out of orbit\n"),
        };
        assert_eq!(
            render(&Some(log), OutputFormat::Text, log_text).unwrap(),
            "Result: Remains out of orbit\n"
        );
    }

    #[tokio::test]
    async fn response_mirrors_outcome() {
        let temp = tempfile::tempdir().unwrap();
        let store = orbit(&temp);
        let links = NavigationLinks::for_page(BASE, PAGE);
        let body = links
            .required()
            .iter()
            .map(|link| format!("=> {link}"))
            .collect::<Vec<_>>();
        let fetcher = MemoryFetcher::new().with_page(PAGE, &body.join("\n"));

        let outcome = check_url(&store, &fetcher, PAGE).await.unwrap();
        let response = CheckResponse::from(&outcome);

        assert_eq!(response.verdict, Verdict::Added);
        assert!(!response.was_valid);
        assert!(response.is_valid);
        assert_eq!(summary_line(&outcome), "gemini://page.example/: Added to orbit");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["verdict"], "added");
    }
}
