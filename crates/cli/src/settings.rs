use codemap_oracle::{OracleConfig, OracleKind};
use codemap_solver::DEFAULT_MAX_DEPTH;
use std::env;

/// Environment-backed settings; CLI flags override them.
#[derive(Debug, Clone)]
pub struct Settings {
    pub oracle: OracleKind,
    pub api_key: Option<String>,
    pub model: String,
    pub embedding_model: String,
    pub max_tree_depth: usize,
    pub force_breakdown: bool,
}

impl Settings {
    pub fn from_env() -> Self {
        let defaults = OracleConfig::default();

        let oracle = env::var("CODEMAP_ORACLE")
            .ok()
            .and_then(|value| match value.parse() {
                Ok(kind) => Some(kind),
                Err(e) => {
                    log::warn!("Ignoring CODEMAP_ORACLE: {e}");
                    None
                }
            })
            .unwrap_or(OracleKind::Canned);

        let max_tree_depth = env::var("CODEMAP_MAX_TREE_DEPTH")
            .ok()
            .and_then(|value| value.parse().ok())
            .unwrap_or(DEFAULT_MAX_DEPTH);

        Self {
            oracle,
            api_key: env::var("OPENAI_API_KEY").ok().filter(|key| !key.is_empty()),
            model: env::var("CODEMAP_OPENAI_MODEL").unwrap_or(defaults.model),
            embedding_model: env::var("CODEMAP_EMBEDDING_MODEL").unwrap_or(defaults.embedding_model),
            max_tree_depth,
            force_breakdown: env::var("CODEMAP_FORCE_BREAKDOWN")
                .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    pub fn oracle_config(&self) -> OracleConfig {
        OracleConfig {
            api_key: self.api_key.clone(),
            model: self.model.clone(),
            embedding_model: self.embedding_model.clone(),
            ..OracleConfig::default()
        }
    }
}
