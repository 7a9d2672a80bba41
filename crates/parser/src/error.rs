use thiserror::Error;

pub type Result<T> = std::result::Result<T, ParserError>;

#[derive(Error, Debug)]
pub enum ParserError {
    #[error("Parser initialization error: {0}")]
    Init(String),

    #[error("Malformed source: {0}")]
    Malformed(String),

    #[error("Parse error: {0}")]
    Parse(String),
}
