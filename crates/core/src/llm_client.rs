use crate::snapshot::snapshots_from_chunks;
use anyhow::{Context, Result};
use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs, ResponseFormat,
        ResponseFormatJsonSchema,
    },
};
use async_trait::async_trait;
use futures::{Stream, StreamExt};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::pin::Pin;

/// Who authored a message in a generation conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// A provider-neutral chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// A structured-output request: the model must answer with JSON matching `schema`.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRequest {
    /// Identifier for the schema, sent to providers that require one.
    pub name: String,
    pub schema: Value,
    pub messages: Vec<ChatMessage>,
}

/// A stream of full document snapshots, each at least as complete as the previous one.
pub type SnapshotStream = Pin<Box<dyn Stream<Item = Result<Value>> + Send>>;

/// The generation capability the rest of the crate is written against.
///
/// Implementations own the model choice; callers only supply schema and messages.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GenerationClient: Send + Sync {
    /// Makes a single, blocking structured-output call and returns the parsed object.
    async fn gen_object(&self, request: ObjectRequest) -> Result<Value>;

    /// Opens a streaming structured-output call that yields whole-document snapshots.
    async fn stream_object(&self, request: ObjectRequest) -> Result<SnapshotStream>;
}

/// An implementation of `GenerationClient` for any OpenAI-compatible API.
pub struct OpenAICompatibleClient {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAICompatibleClient {
    /// Creates a new client for an OpenAI-compatible service.
    ///
    /// # Arguments
    ///
    /// * `config` - The configuration for the OpenAI client, including API key and base URL.
    /// * `model` - The specific model identifier to use for chat completions (e.g., "gpt-4o").
    pub fn new(config: OpenAIConfig, model: String) -> Self {
        Self {
            client: Client::with_config(config),
            model,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn build_request(&self, request: ObjectRequest, stream: bool) -> Result<CreateChatCompletionRequest> {
        let messages = request
            .messages
            .iter()
            .map(to_openai_message)
            .collect::<Result<Vec<_>>>()?;

        let response_format = ResponseFormat::JsonSchema {
            json_schema: ResponseFormatJsonSchema {
                description: None,
                name: request.name,
                schema: Some(request.schema),
                strict: Some(false),
            },
        };

        Ok(CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .response_format(response_format)
            .stream(stream)
            .build()?)
    }
}

fn to_openai_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
    let converted = match message.role {
        ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(message.content.clone())
            .build()?
            .into(),
        ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(message.content.clone())
            .build()?
            .into(),
        ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(message.content.clone())
            .build()?
            .into(),
    };
    Ok(converted)
}

#[async_trait]
impl GenerationClient for OpenAICompatibleClient {
    async fn gen_object(&self, request: ObjectRequest) -> Result<Value> {
        let schema_name = request.name.clone();
        let request = self.build_request(request, false)?;

        let response = self.client.chat().create(request).await?;
        let content = response
            .choices
            .first()
            .context("No response choice from LLM")?
            .message
            .content
            .as_ref()
            .context("No content in LLM response")?;

        serde_json::from_str(content)
            .with_context(|| format!("LLM returned invalid JSON for schema '{}'", schema_name))
    }

    async fn stream_object(&self, request: ObjectRequest) -> Result<SnapshotStream> {
        let request = self.build_request(request, true)?;
        let stream = self.client.chat().create_stream(request).await?;

        let chunks = stream.filter_map(|result| async {
            match result {
                Ok(response) => response
                    .choices
                    .first()
                    .and_then(|choice| choice.delta.content.clone())
                    .filter(|content| !content.is_empty())
                    .map(Ok),
                Err(e) => Some(Err(anyhow::Error::from(e))),
            }
        });

        Ok(snapshots_from_chunks(chunks))
    }
}
