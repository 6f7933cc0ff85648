use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Print the orbit's state directory.
    Dir,
    /// Create the orbit's settings.
    Init(InitArgs),
    /// List member URLs in orbit order.
    List,
    /// Check a page for membership now.
    Check(UrlArgs),
    /// Show the latest check log of a page.
    CheckLog(UrlArgs),
    /// Check every queued submission.
    CheckSubmissions,
    /// Queue a page for a membership check.
    Submit(UrlArgs),
    /// List queued submissions.
    Submissions,
    /// Member after a page.
    Next(UrlArgs),
    /// Member before a page.
    Prev(UrlArgs),
    /// Random member, other than the given page.
    Random(RandomArgs),
    /// Render the gemtext dashboard of a page.
    Dashboard(UrlArgs),
}

#[derive(Clone, Debug, Args)]
pub struct InitArgs {
    /// Display name of the orbit.
    #[arg(long)]
    pub name: String,

    /// Root URL that member pages link back to.
    #[arg(long)]
    pub base_url: String,
}

#[derive(Clone, Debug, Args)]
pub struct UrlArgs {
    /// Page URL.
    pub url: String,
}

#[derive(Clone, Debug, Args)]
pub struct RandomArgs {
    /// Page to leave out of the draw.
    pub url: Option<String>,
}
