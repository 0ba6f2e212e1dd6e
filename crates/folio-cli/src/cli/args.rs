use clap::Args;

#[derive(Debug, Args)]
pub struct RebuildArgs {
    /// Subtree to rebuild; the whole store when omitted.
    pub path: Option<String>,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    pub path: String,
    /// Print one page of labels instead of the raw listing.
    #[arg(long)]
    pub page: Option<usize>,
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(allow_hyphen_values = true)]
    pub query: String,
    /// Apply the direct-or-choices policy instead of printing every hit.
    #[arg(long, default_value_t = false)]
    pub select: bool,
}

#[derive(Debug, Args)]
pub struct PathArg {
    pub path: String,
}

#[derive(Debug, Args)]
pub struct OpenArgs {
    pub dir: String,
    pub name: String,
}

#[derive(Debug, Args)]
pub struct CanEnterArgs {
    pub path: String,
    #[arg(long = "user", allow_hyphen_values = true)]
    pub user_id: i64,
}

#[derive(Debug, Args)]
pub struct PutArgs {
    pub dir: String,
    pub name: String,
    /// Item record, e.g. `{"type":"url","url":"https://example.org"}`.
    #[arg(long = "json", value_name = "RECORD")]
    pub record: String,
}

#[derive(Debug, Args)]
pub struct LinkArgs {
    pub dir: String,
    pub name: String,
    pub target: String,
}

#[derive(Debug, Args)]
pub struct ConfigArgs {
    pub path: String,
    #[arg(long)]
    pub icon: Option<String>,
    /// Channel or group whose members may enter; empty string unlocks.
    #[arg(long)]
    pub locked_channel: Option<String>,
    #[arg(long = "suggestion", value_name = "NAME")]
    pub suggestions: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    pub dir: String,
    /// Item to remove; removes the folder `dir` itself when omitted.
    pub name: Option<String>,
}

#[derive(Debug, Args)]
pub struct MoveArgs {
    pub dir: String,
    pub from: String,
    pub to: String,
}
