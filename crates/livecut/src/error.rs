use std::process::ExitStatus;

use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("manifest format error: {reason}")]
    ManifestFormat { reason: String },

    #[error("no reference point found in manifest; use raw segment numbers instead")]
    NoReferencePoint,

    #[error("invalid timestamp `{input}`: expected an ISO 8601 UTC instant or a segment number")]
    TimestampParse { input: String },

    #[error("invalid manifest URL `{input}`: {reason}")]
    InvalidUrl { input: String, reason: String },

    #[error("failed to spawn `{tool}`: {source}")]
    ToolSpawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{tool}` failed ({status}):\n{stderr_tail}")]
    ToolFailure {
        tool: String,
        status: ExitStatus,
        stderr_tail: String,
    },

    #[error("HTTP request failed: {source}")]
    Network {
        #[from]
        source: reqwest::Error,
    },

    #[error("request failed with HTTP {status} for {url}")]
    HttpStatus { status: StatusCode, url: String },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ExtractError {
    pub fn manifest_format(reason: impl Into<String>) -> Self {
        Self::ManifestFormat {
            reason: reason.into(),
        }
    }

    pub fn invalid_url(input: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub fn tool_spawn(tool: impl Into<String>, source: std::io::Error) -> Self {
        Self::ToolSpawn {
            tool: tool.into(),
            source,
        }
    }

    pub fn tool_failure(
        tool: impl Into<String>,
        status: ExitStatus,
        stderr_tail: impl Into<String>,
    ) -> Self {
        Self::ToolFailure {
            tool: tool.into(),
            status,
            stderr_tail: stderr_tail.into(),
        }
    }

    pub fn http_status(status: StatusCode, url: impl Into<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
        }
    }
}
