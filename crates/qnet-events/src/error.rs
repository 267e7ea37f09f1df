use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventsError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
