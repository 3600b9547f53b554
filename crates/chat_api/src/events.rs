/// Stream event emitted by the SSE parser after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatStreamEvent {
    /// A fragment of assistant output text, in arrival order.
    ContentDelta { delta: String },
    /// The `[DONE]` sentinel; no further content will arrive.
    Done,
    /// Provider-reported stream error.
    Error {
        code: Option<String>,
        message: Option<String>,
    },
}
