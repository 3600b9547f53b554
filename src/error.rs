use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("a non-empty prompt is required; see --help")]
    EmptyPrompt,

    #[error(transparent)]
    Api(#[from] chat_api::ChatApiError),

    #[error(transparent)]
    Store(#[from] conversation_store::StoreError),

    #[error("terminal write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Usage errors exit 2; every other fatal error exits 1.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EmptyPrompt => 2,
            _ => 1,
        }
    }
}
