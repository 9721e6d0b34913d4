//! Error types for flagstone.

use thiserror::Error;

/// Result type for flagstone operations.
pub type Result<T> = std::result::Result<T, FragmentError>;

/// Errors that can occur while loading, resolving, or importing fragments.
#[derive(Error, Debug)]
pub enum FragmentError {
    /// Failed to read a fragment file.
    #[error("Failed to read fragment file: {0}")]
    ReadFragment(#[from] std::io::Error),

    /// Failed to parse a TOML fragment.
    #[error("Failed to parse TOML fragment: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// Failed to serialize a record back to TOML.
    #[error("Failed to serialize fragment: {0}")]
    SerializeToml(#[from] toml::ser::Error),

    /// Failed to parse JSON (compile_commands.json).
    #[error("Failed to parse JSON: {0}")]
    ParseJson(#[from] serde_json::Error),

    /// A backtick substitution is missing its closing backtick.
    #[error("Unterminated backtick substitution: `{0}")]
    UnterminatedSubstitution(String),

    /// A backtick substitution contains no command.
    #[error("Empty backtick substitution")]
    EmptySubstitution,

    /// A quoted word is missing its closing quote.
    #[error("Unterminated {0} quote in flag string")]
    UnterminatedQuote(char),

    /// A helper program could not be spawned.
    #[error("Failed to run helper program `{program}`: {source}")]
    HelperSpawn {
        program: String,
        source: std::io::Error,
    },

    /// A helper program exited with a non-zero status.
    #[error("Helper program `{program}` failed ({status}): {stderr}")]
    HelperFailed {
        program: String,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// A helper program printed nothing usable.
    #[error("Helper program `{program}` produced no output")]
    HelperEmptyOutput { program: String },

    /// A helper program is not installed or not on PATH.
    #[error("Helper program not found on PATH: {0}")]
    ToolNotFound(String),

    /// A SCons-style fragment failed to parse.
    #[error("custom.py parse error at line {line}: {message}")]
    SconsSyntax { line: usize, message: String },

    /// A SCons-style fragment assigns a variable that is not part of the record.
    #[error("custom.py line {line}: unknown build variable `{name}`")]
    SconsUnknownVariable { line: usize, name: String },
}
