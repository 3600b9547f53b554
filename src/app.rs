//! Prompt/response orchestration.
//!
//! Decides which provider answers, assembles the effective prompt, wires
//! the streamed response through the fence scanner, and does conversation
//! bookkeeping around the call. Search-mode requests never touch the
//! conversation store.

use std::io::Write;

use chat_api::{ChatApiConfig, ChatClient, ChatRequest, ProviderKind};
use conversation_store::{ConversationStore, Message, Role};
use tracing::debug;

use crate::error::AppError;
use crate::highlight::render_event;
use crate::scanner::FenceScanner;

/// Rendered history beyond this many characters drops oldest turns first.
/// The source behavior was unbounded context stuffing; the cap is a
/// deliberate deviation.
pub const HISTORY_CHAR_BUDGET: usize = 24_000;

const SYSTEM_PROMPT: &str = "You are a helpful assistant answering questions in a terminal. \
Keep answers concise and put code in fenced code blocks with a language tag.";

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub prompt: String,
    pub search: bool,
    pub url: Option<String>,
    pub new_conversation: bool,
}

impl RunOptions {
    fn wants_search(&self) -> bool {
        self.search
            || self
                .url
                .as_deref()
                .is_some_and(|url| !url.trim().is_empty())
    }
}

pub async fn run(options: RunOptions, out: &mut impl Write) -> Result<(), AppError> {
    if options.prompt.trim().is_empty() {
        return Err(AppError::EmptyPrompt);
    }

    if options.wants_search() {
        run_search(options, out).await
    } else {
        run_assistant(options, out).await
    }
}

/// Print stored conversations, most recently updated first. The current
/// conversation is marked with `*`.
pub fn list_conversations(out: &mut impl Write) -> Result<(), AppError> {
    let store = ConversationStore::open_default()?;
    let current = store.current_conversation_id()?;

    for summary in store.list_conversations()? {
        let marker = if current.as_deref() == Some(summary.id.as_str()) {
            '*'
        } else {
            ' '
        };
        writeln!(out, "{marker} {}  {}", summary.id, summary.updated_at)?;
    }

    Ok(())
}

async fn run_search(options: RunOptions, out: &mut impl Write) -> Result<(), AppError> {
    let config = ChatApiConfig::from_env(ProviderKind::Search)?;
    let client = ChatClient::new(config)?;

    let query = search_query(&options.prompt, options.url.as_deref());
    debug!(query = %query, "dispatching web-search request");

    let request = ChatRequest::user(client.config().model.clone(), query);
    stream_response(&client, &request, out).await?;
    Ok(())
}

async fn run_assistant(options: RunOptions, out: &mut impl Write) -> Result<(), AppError> {
    // Credential and storage are both checked before any network activity.
    let config = ChatApiConfig::from_env(ProviderKind::Assistant)?;
    let client = ChatClient::new(config)?;
    let mut store = ConversationStore::open_default()?;

    let conversation_id = resolve_conversation(&mut store, options.new_conversation)?;
    debug!(conversation = %conversation_id, "continuing conversation");

    let history = store.conversation_messages(&conversation_id)?;
    let composite = compose_prompt(&history, &options.prompt);

    store.append_message(Some(&conversation_id), Role::User, &options.prompt, false)?;

    let request = ChatRequest::user(client.config().model.clone(), composite);
    let response = stream_response(&client, &request, out).await?;
    debug!(chars = response.len(), "assistant response complete");

    store.append_message(Some(&conversation_id), Role::Assistant, &response, false)?;
    Ok(())
}

/// Conversation selection policy: a new-conversation request always creates
/// one; otherwise the current pointer is reused when present. A freshly
/// created conversation is seeded with one system turn.
fn resolve_conversation(
    store: &mut ConversationStore,
    create_new: bool,
) -> Result<String, AppError> {
    if !create_new {
        if let Some(id) = store.current_conversation_id()? {
            return Ok(id);
        }
    }

    let id = store.create_conversation()?;
    store.append_message(Some(&id), Role::System, SYSTEM_PROMPT, false)?;
    debug!(conversation = %id, "created conversation");
    Ok(id)
}

fn search_query(prompt: &str, url: Option<&str>) -> String {
    match url.map(str::trim).filter(|url| !url.is_empty()) {
        Some(url) => format!("{prompt} inurl:{url}"),
        None => prompt.to_string(),
    }
}

/// Render history as alternating `role: content` lines and append the new
/// user turn with a trailing `assistant:` cue.
fn compose_prompt(history: &[Message], prompt: &str) -> String {
    let lines: Vec<String> = history
        .iter()
        .map(|message| format!("{}: {}", message.role.as_str(), message.content))
        .collect();

    let mut total: usize = lines.iter().map(|line| line.len() + 1).sum();
    let mut start = 0;
    while total > HISTORY_CHAR_BUDGET && start < lines.len() {
        total -= lines[start].len() + 1;
        start += 1;
    }

    let mut out = String::new();
    for line in &lines[start..] {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("user: ");
    out.push_str(prompt);
    out.push_str("\nassistant:");
    out
}

/// Drive the provider stream through the scanner and renderer, returning
/// the full response text from the scanner's side channel.
async fn stream_response(
    client: &ChatClient,
    request: &ChatRequest,
    out: &mut impl Write,
) -> Result<String, AppError> {
    let mut scanner = FenceScanner::default();
    let mut write_error: Option<std::io::Error> = None;

    client
        .stream_with_handler(request, |delta| {
            if write_error.is_some() {
                return;
            }
            for event in scanner.feed(delta) {
                if let Err(error) = render_event(&event, out) {
                    write_error = Some(error);
                    return;
                }
            }
            let _ = out.flush();
        })
        .await?;

    if let Some(error) = write_error {
        return Err(error.into());
    }
    if let Some(event) = scanner.finish() {
        render_event(&event, out)?;
    }
    writeln!(out)?;
    out.flush()?;

    Ok(scanner.into_transcript())
}
