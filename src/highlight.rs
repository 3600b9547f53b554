//! Terminal rendering for scanner output.
//!
//! Plain text is written verbatim. A code block renders as a dimmed fence
//! line carrying the language tag, the payload highlighted through syntect
//! when the tag is recognized, and a dimmed closing fence. An unsupported
//! language tag degrades to the verbatim payload; it is not an error.

use std::io::{self, Write};
use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Style, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::{as_24_bit_terminal_escaped, LinesWithEndings};

use crate::scanner::ScanEvent;

const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

const THEME_NAME: &str = "base16-eighties.dark";

struct HighlightAssets {
    syntaxes: SyntaxSet,
    theme: Theme,
}

// Loading the default syntax set takes tens of milliseconds; share one
// instance for the process lifetime.
fn assets() -> &'static HighlightAssets {
    static CACHED: OnceLock<HighlightAssets> = OnceLock::new();
    CACHED.get_or_init(|| {
        let syntaxes = SyntaxSet::load_defaults_newlines();
        let mut theme_set = ThemeSet::load_defaults();
        let theme = theme_set
            .themes
            .remove(THEME_NAME)
            .or_else(|| theme_set.themes.into_values().next())
            .unwrap_or_default();
        HighlightAssets { syntaxes, theme }
    })
}

/// Force syntax/theme loading off the first-render path.
pub fn prewarm_highlighting() {
    let _ = assets();
}

/// Highlight a code payload for the given language tag, or `None` when the
/// tag is empty or unrecognized.
pub fn highlight_code(code: &str, lang: &str) -> Option<String> {
    let token = lang.trim();
    if token.is_empty() {
        return None;
    }

    let assets = assets();
    let syntax = assets.syntaxes.find_syntax_by_token(token)?;
    let mut highlighter = HighlightLines::new(syntax, &assets.theme);

    let mut out = String::new();
    for line in LinesWithEndings::from(code) {
        let ranges: Vec<(Style, &str)> = highlighter
            .highlight_line(line, &assets.syntaxes)
            .ok()?;
        out.push_str(&as_24_bit_terminal_escaped(&ranges, false));
    }
    out.push_str(RESET);
    Some(out)
}

/// Write one scan event to the terminal.
pub fn render_event(event: &ScanEvent, out: &mut impl Write) -> io::Result<()> {
    match event {
        ScanEvent::Text(text) => out.write_all(text.as_bytes()),
        ScanEvent::CodeBlock { lang, code } => {
            writeln!(out, "{DIM}```{lang}{RESET}")?;
            match highlight_code(code, lang) {
                Some(highlighted) => out.write_all(highlighted.as_bytes())?,
                None => out.write_all(code.as_bytes())?,
            }
            write!(out, "\n{DIM}```{RESET}")
        }
    }
}
