use crate::error::{OracleError, Result};
use crate::prompts;
use crate::{Oracle, OracleConfig};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Instant;

pub(crate) const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub(crate) const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

const CHAT_COMPLETIONS_URL: &str = "https://api.openai.com/v1/chat/completions";
const EMBEDDINGS_URL: &str = "https://api.openai.com/v1/embeddings";

/// Live oracle backed by the OpenAI chat-completions and embeddings APIs.
pub struct OpenAiOracle {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    embedding_model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct ChatResponse {
    pub(crate) choices: Vec<ChatChoice>,
    pub(crate) usage: Option<Usage>,
}

#[derive(Deserialize)]
pub(crate) struct ChatChoice {
    pub(crate) message: ChatContent,
}

#[derive(Deserialize)]
pub(crate) struct ChatContent {
    pub(crate) content: String,
}

#[derive(Deserialize)]
pub(crate) struct Usage {
    pub(crate) total_tokens: u64,
}

#[derive(Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct EmbeddingsResponse {
    pub(crate) data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
pub(crate) struct EmbeddingData {
    pub(crate) embedding: Vec<f32>,
}

impl OpenAiOracle {
    pub fn new(config: OracleConfig) -> Result<Self> {
        let api_key = config.api_key.ok_or(OracleError::MissingApiKey)?;
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            client,
            api_key,
            model: config.model,
            embedding_model: config.embedding_model,
        })
    }

    fn chat(&self, prompt: &str) -> Result<String> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
        };

        let started = Instant::now();
        let response = self
            .client
            .post(CHAT_COMPLETIONS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Api {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }

        let parsed: ChatResponse = response.json()?;
        log::debug!(
            "chat completion took {}ms ({} tokens)",
            started.elapsed().as_millis(),
            parsed.usage.map(|u| u.total_tokens).unwrap_or(0)
        );

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or(OracleError::EmptyCompletion)
    }
}

impl Oracle for OpenAiOracle {
    fn describe_leaf(
        &self,
        body: &str,
        callee_summaries: &BTreeMap<String, String>,
        enclosing_class: Option<&str>,
    ) -> Result<String> {
        self.chat(&prompts::function_summary(body, callee_summaries, enclosing_class))
    }

    fn describe_class(
        &self,
        name: &str,
        body: &str,
        method_summaries: &BTreeMap<String, String>,
    ) -> Result<String> {
        self.chat(&prompts::class_summary(name, body, method_summaries))
    }

    fn breakdown_needed(&self, task: &str) -> Result<bool> {
        // Greetings are conversational; never decompose them.
        let task_type = self.chat(&format!("{}{task}", prompts::TASK_TYPE_PROMPT))?;
        if task_type.to_ascii_lowercase().contains("greeting") {
            return Ok(false);
        }

        let answer = self.chat(&format!("{}{task}", prompts::IS_BREAKDOWN_REQUIRED_PROMPT))?;
        Ok(answer.to_ascii_lowercase().contains("yes"))
    }

    fn breakdown(&self, task: &str) -> Result<Vec<String>> {
        let completion = self.chat(&format!("{}{task}", prompts::BREAKDOWN_INTO_SUBTASK))?;
        Ok(split_subtasks(&completion))
    }

    fn solve(&self, task: &str, context: Option<&str>) -> Result<String> {
        self.chat(&prompts::solve_task(task, context))
    }

    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbeddingsRequest {
            model: &self.embedding_model,
            input: text,
        };

        let response = self
            .client
            .post(EMBEDDINGS_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(OracleError::Api {
                status: status.as_u16(),
                message: response.text().unwrap_or_default(),
            });
        }

        let parsed: EmbeddingsResponse = response.json()?;
        parsed
            .data
            .into_iter()
            .next()
            .map(|data| data.embedding)
            .ok_or(OracleError::EmptyEmbedding)
    }
}

/// The completion encodes sub-tasks `;`-delimited; order is preserved.
pub(crate) fn split_subtasks(completion: &str) -> Vec<String> {
    completion
        .split(';')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .take(3)
        .map(str::to_string)
        .collect()
}
