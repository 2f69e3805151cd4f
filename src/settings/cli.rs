use super::Parser;

/// Session-authenticated posts API.
#[derive(Parser, Debug)]
#[command(name = "postgate", version)]
pub struct Cli {
    /// Settings file; defaults to settings/dev.toml or settings/release.toml.
    #[arg(long)]
    pub settings: Option<String>,
}
