use clap::Parser;

/// Ask a language model from the terminal, streaming the answer with
/// highlighted code blocks.
#[derive(Debug, Parser)]
#[command(name = "palaver", version, about)]
pub struct Cli {
    /// Free-text prompt; words are joined with single spaces.
    pub prompt: Vec<String>,

    /// Answer with the web-search provider instead of the assistant.
    #[arg(short, long)]
    pub search: bool,

    /// Scope the web search to a site (implies --search).
    #[arg(short, long, value_name = "URL")]
    pub url: Option<String>,

    /// Start a fresh conversation instead of continuing the current one.
    #[arg(short, long)]
    pub new: bool,

    /// List stored conversations (most recently updated first) and exit.
    #[arg(long)]
    pub list: bool,
}

impl Cli {
    #[must_use]
    pub fn prompt_text(&self) -> String {
        self.prompt.join(" ").trim().to_string()
    }
}
