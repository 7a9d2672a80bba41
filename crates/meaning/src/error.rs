use thiserror::Error;

pub type Result<T> = std::result::Result<T, MeaningError>;

#[derive(Error, Debug)]
pub enum MeaningError {
    #[error("Oracle error while summarizing '{id}': {source}")]
    Oracle {
        id: String,
        #[source]
        source: codemap_oracle::OracleError,
    },
}
