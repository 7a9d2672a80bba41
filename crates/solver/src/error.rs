use thiserror::Error;

pub type Result<T> = std::result::Result<T, SolverError>;

#[derive(Error, Debug)]
pub enum SolverError {
    #[error("Oracle error while working on '{task}': {source}")]
    Oracle {
        task: String,
        #[source]
        source: codemap_oracle::OracleError,
    },
}
