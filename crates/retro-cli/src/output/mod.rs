use serde::Serialize;

use crate::cli::OutputFormat;

/// Render a response: `text` for humans, pretty JSON for machines.
pub fn render<T: Serialize>(
    value: &T,
    format: OutputFormat,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Text => Ok(text(value)),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
    }
}

/// Print a response in the requested format.
pub fn output<T: Serialize>(
    value: &T,
    format: OutputFormat,
    text: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    let rendered = render(value, format, text)?;
    if rendered.ends_with('\n') {
        print!("{rendered}");
    } else {
        println!("{rendered}");
    }
    Ok(())
}

/// One item per line.
pub fn lines(items: &[String]) -> String {
    items.iter().map(|item| format!("{item}\n")).collect()
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::{lines, render};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        url: &'static str,
        queued: bool,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Example {
            url: "gemini://a.example/",
            queued: true,
        };
        let out = render(&value, OutputFormat::Json, |_| unreachable!()).expect("json render");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["url"], "gemini://a.example/");
        assert_eq!(parsed["queued"], true);
    }

    #[test]
    fn text_render_uses_formatter() {
        let value = Example {
            url: "gemini://a.example/",
            queued: false,
        };
        let out = render(&value, OutputFormat::Text, |v| format!("queued={}", v.queued))
            .expect("text render");
        assert_eq!(out, "queued=false");
    }

    #[test]
    fn lines_terminates_every_item() {
        let items = vec![String::from("a"), String::from("b")];
        assert_eq!(lines(&items), "a\nb\n");
        assert_eq!(lines(&[]), "");
    }
}
