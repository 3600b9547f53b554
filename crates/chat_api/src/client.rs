use futures_util::StreamExt;
use reqwest::header::{HeaderMap, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Response};

use crate::config::ChatApiConfig;
use crate::error::{parse_error_message, ChatApiError};
use crate::events::ChatStreamEvent;
use crate::payload::ChatRequest;
use crate::sse::SseStreamParser;
use crate::url::normalize_chat_url;

#[derive(Debug)]
pub struct ChatClient {
    http: Client,
    config: ChatApiConfig,
}

impl ChatClient {
    pub fn new(config: ChatApiConfig) -> Result<Self, ChatApiError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(ChatApiError::from)?;
        Ok(Self { http, config })
    }

    pub fn config(&self) -> &ChatApiConfig {
        &self.config
    }

    pub fn normalized_endpoint(&self) -> String {
        normalize_chat_url(&self.config.base_url)
    }

    fn build_headers(&self) -> Result<HeaderMap, ChatApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            format!("Bearer {}", self.config.api_key.trim())
                .parse()
                .map_err(|_| ChatApiError::InvalidHeader("authorization".to_owned()))?,
        );
        headers.insert(
            ACCEPT,
            "text/event-stream"
                .parse()
                .map_err(|_| ChatApiError::InvalidHeader("accept".to_owned()))?,
        );
        headers.insert(
            CONTENT_TYPE,
            "application/json"
                .parse()
                .map_err(|_| ChatApiError::InvalidHeader("content-type".to_owned()))?,
        );
        if let Some(user_agent) = self.config.user_agent.as_deref() {
            headers.insert(
                USER_AGENT,
                user_agent
                    .parse()
                    .map_err(|_| ChatApiError::InvalidHeader("user-agent".to_owned()))?,
            );
        }
        Ok(headers)
    }

    pub fn build_request(
        &self,
        request: &ChatRequest,
    ) -> Result<reqwest::RequestBuilder, ChatApiError> {
        let mut payload = request.clone();
        payload.stream = true;

        Ok(self
            .http
            .post(self.normalized_endpoint())
            .headers(self.build_headers()?)
            .json(&payload))
    }

    /// Send the request once. No retries: every failure surfaces to the
    /// caller with whatever diagnostic body the provider returned.
    pub async fn send(&self, request: &ChatRequest) -> Result<Response, ChatApiError> {
        let response = self
            .build_request(request)?
            .send()
            .await
            .map_err(ChatApiError::from)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("request failed")
                .to_string()
        });
        Err(ChatApiError::Status(status, parse_error_message(status, &body)))
    }

    /// Stream the response, invoking `on_delta` for each content fragment
    /// in arrival order.
    pub async fn stream_with_handler<F>(
        &self,
        request: &ChatRequest,
        mut on_delta: F,
    ) -> Result<(), ChatApiError>
    where
        F: FnMut(&str),
    {
        let response = self.send(request).await?;
        let mut bytes = response.bytes_stream();
        let mut parser = SseStreamParser::default();
        let mut saw_content = false;

        'stream: while let Some(chunk) = bytes.next().await {
            let chunk = chunk.map_err(ChatApiError::from)?;
            for event in parser.feed(&chunk) {
                match event {
                    ChatStreamEvent::ContentDelta { delta } => {
                        saw_content = true;
                        on_delta(&delta);
                    }
                    ChatStreamEvent::Done => break 'stream,
                    ChatStreamEvent::Error { code, message } => {
                        return Err(ChatApiError::StreamFailed {
                            code,
                            message: message
                                .unwrap_or_else(|| "provider reported an error".to_owned()),
                        });
                    }
                }
            }
        }

        if !saw_content {
            return Err(ChatApiError::EmptyBody);
        }

        Ok(())
    }

    /// Collect the full streamed response into one string.
    pub async fn stream_to_string(&self, request: &ChatRequest) -> Result<String, ChatApiError> {
        let mut text = String::new();
        self.stream_with_handler(request, |delta| text.push_str(delta))
            .await?;
        Ok(text)
    }
}
