use std::env;
use std::time::Duration;

use crate::error::ChatApiError;
use crate::url::{DEFAULT_ASSISTANT_BASE_URL, DEFAULT_SEARCH_BASE_URL};

/// Which provider family a request goes to. Both speak the same
/// chat-completions wire contract; they differ in endpoint, model, and
/// credential.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Assistant,
    Search,
}

impl ProviderKind {
    pub fn credential_env(&self) -> &'static str {
        match self {
            Self::Assistant => "OPENAI_API_KEY",
            Self::Search => "PERPLEXITY_API_KEY",
        }
    }

    pub fn base_url_env(&self) -> &'static str {
        match self {
            Self::Assistant => "PALAVER_ASSISTANT_BASE_URL",
            Self::Search => "PALAVER_SEARCH_BASE_URL",
        }
    }

    pub fn model_env(&self) -> &'static str {
        match self {
            Self::Assistant => "PALAVER_ASSISTANT_MODEL",
            Self::Search => "PALAVER_SEARCH_MODEL",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Assistant => DEFAULT_ASSISTANT_BASE_URL,
            Self::Search => DEFAULT_SEARCH_BASE_URL,
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            Self::Assistant => "gpt-4o-mini",
            Self::Search => "sonar",
        }
    }
}

/// Transport configuration for chat completion requests.
#[derive(Debug, Clone)]
pub struct ChatApiConfig {
    /// Bearer token passed to `Authorization`.
    pub api_key: String,
    /// Base URL normalized to a chat completions endpoint at request time.
    pub base_url: String,
    pub model: String,
    /// Optional `User-Agent` override.
    pub user_agent: Option<String>,
    /// Optional request timeout.
    pub timeout: Option<Duration>,
}

impl ChatApiConfig {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_ASSISTANT_BASE_URL.to_string(),
            model: model.into(),
            user_agent: None,
            timeout: None,
        }
    }

    /// Resolve configuration for a provider family from the environment.
    ///
    /// The credential variable is required; base URL and model fall back to
    /// provider defaults. This is the precondition gate: a missing
    /// credential fails here, before any network attempt.
    pub fn from_env(kind: ProviderKind) -> Result<Self, ChatApiError> {
        let api_key = env::var(kind.credential_env())
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .ok_or(ChatApiError::MissingApiKey(kind.credential_env()))?;

        let base_url = env::var(kind.base_url_env())
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| kind.default_base_url().to_string());

        let model = env::var(kind.model_env())
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| kind.default_model().to_string());

        Ok(Self {
            api_key,
            base_url,
            model,
            user_agent: None,
            timeout: None,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
