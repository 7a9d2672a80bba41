use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexerError>;

#[derive(Error, Debug)]
pub enum IndexerError {
    #[error("Parser error: {0}")]
    Parser(#[from] codemap_parser::ParserError),
}
