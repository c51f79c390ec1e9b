use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Rejection raised by the formatting engine when input cannot be tokenized.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{} on line {}", .message, .line)]
pub struct ParseError {
    pub line: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Coarse classification of [`Error`], used to derive exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Usage,
    Io,
    Parse,
}

impl ErrorKind {
    /// Process exit code for this kind, following the sysexits convention.
    pub fn exit_code(self) -> u8 {
        match self {
            ErrorKind::Usage => 64,
            ErrorKind::Parse => 65,
            ErrorKind::Io => 74,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("--{} option expects a value.", .0)]
    MissingValue(String),

    #[error("unsupported --{} value: {}.", .key, .value)]
    UnsupportedValue { key: String, value: String },

    #[error("--output argument is only valid for a single input file")]
    OutputWithMultipleInputs,

    #[error("{}", .0)]
    InvalidArguments(String),

    #[error("failed to find the user cache directory")]
    NoCacheDirectory,

    #[error("failed to create cache directory at: {}, {}", .path, .original)]
    CacheDirectory {
        path: String,
        original: std::io::Error,
    },

    #[error("failed to delete cache file at: {}, {}", .path, .original)]
    CacheDelete {
        path: String,
        original: std::io::Error,
    },

    #[error("Error {} cache file at `{}`: {}", .action, .path, .original)]
    Yaml {
        action: String,
        path: String,
        original: serde_yaml::Error,
    },

    #[error("IO error with {} at path `{}`: {}", .file_description, .path, .original)]
    Io {
        file_description: String,
        path: String,
        original: std::io::Error,
    },

    #[error("failed to write file: {}, {}", .path, .original)]
    Write {
        path: String,
        original: std::io::Error,
    },

    #[error("could not parse input: {}", .0)]
    ParseInput(#[from] ParseError),

    #[error("could not parse {}: {}", .path, .source)]
    ParseFile { path: String, source: ParseError },

    #[error("timed out waiting for standard input to be formatted")]
    StdinTimeout,

    #[error("STDIO error: {}", .0)]
    Stdio(#[from] std::io::Error),

    #[error("{}", .0)]
    Custom(String),
}

impl Error {
    pub fn custom(val: impl std::fmt::Display) -> Self {
        Self::Custom(val.to_string())
    }

    pub fn unsupported_value(key: &str, value: &str) -> Self {
        Self::UnsupportedValue {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    pub fn io_error(file_description: String, path: String, original: std::io::Error) -> Self {
        Self::Io {
            file_description,
            path,
            original,
        }
    }

    pub fn yaml_error(action: String, path: String, original: serde_yaml::Error) -> Self {
        Self::Yaml {
            action,
            path,
            original,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::MissingValue(_)
            | Error::UnsupportedValue { .. }
            | Error::OutputWithMultipleInputs
            | Error::InvalidArguments(_) => ErrorKind::Usage,
            Error::ParseInput(_) | Error::ParseFile { .. } => ErrorKind::Parse,
            Error::NoCacheDirectory
            | Error::CacheDirectory { .. }
            | Error::CacheDelete { .. }
            | Error::Yaml { .. }
            | Error::Io { .. }
            | Error::Write { .. }
            | Error::StdinTimeout
            | Error::Stdio(_)
            | Error::Custom(_) => ErrorKind::Io,
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.kind().exit_code()
    }
}
