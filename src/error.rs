use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Log file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("A logger is already installed")]
    LoggerAlreadySet(#[from] log::SetLoggerError),
}

// Create a type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
