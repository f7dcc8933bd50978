use std::{io, path::PathBuf};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("File '{}' not found or not executable", .0.to_string_lossy())]
    SubjectNotExecutable(PathBuf),

    #[error("Can't find {0} answers file")]
    MissingAnswer(String),

    #[error("Error while testing test: {test_id}: failed to spawn '{command}': {source}")]
    Spawn {
        test_id: String,
        command: String,
        #[source]
        source: io::Error,
    },

    #[error("Error while testing test: {test_id}: failed to communicate with subprocess: {source}")]
    Communicate {
        test_id: String,
        #[source]
        source: io::Error,
    },

    /// Strict mode only: the subject exited unsuccessfully.
    #[error("Error while testing test: {test_id}: command '{command}' {status}")]
    SubjectFailed {
        test_id: String,
        command: String,
        status: ExitStatusDesc,
        stderr: String,
    },

    #[error(transparent)]
    Fs(#[from] fsutil::Error),
}

/// Human readable form of how a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatusDesc {
    Code(i32),
    Signal,
}

impl std::fmt::Display for ExitStatusDesc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitStatusDesc::Code(code) => write!(f, "returned non-zero exit status {}", code),
            ExitStatusDesc::Signal => write!(f, "was terminated by signal"),
        }
    }
}

impl ExitStatusDesc {
    pub fn from_code(code: Option<i32>) -> Self {
        code.map_or(ExitStatusDesc::Signal, ExitStatusDesc::Code)
    }
}
