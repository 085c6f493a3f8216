use thiserror::Error;

/// Error codes that stop a multi-file operation instead of being recorded per file.
pub const FATAL_CODES: [&str; 3] = [
    "AUTHENTICATION_ERROR",
    "AUTHORIZATION_ERROR",
    "MAINTENANCE_MODE_ERROR",
];

/// Errors returned by a [`super::PlatformClient`], classified by kind.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("not authorized: {0}")]
    NotAuthorized(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("API error {code}: {message}")]
    Api { code: String, message: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ApiError {
    pub fn api(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Machine-readable code, when the platform supplied one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    /// Returns `true` for errors that will fail every following request too.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::NotAuthorized(_) => true,
            Self::Api { code, .. } => FATAL_CODES.contains(&code.as_str()),
            Self::NotFound(_) | Self::Transport(_) => false,
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::NotAuthorized(_) => {
                "Check the user id and secret, and that the user has access to the project."
            }
            Self::NotFound(_) => "Check the project id and file URI.",
            Self::Api { code, .. } if code == "MAINTENANCE_MODE_ERROR" => {
                "The platform is in maintenance mode; try again later."
            }
            Self::Api { code, .. } if FATAL_CODES.contains(&code.as_str()) => {
                "Check the user id and secret, and that the user has access to the project."
            }
            Self::Api { .. } => "The platform rejected the request; see the message above.",
            Self::Transport(_) => "Check your network connection and the --endpoint setting.",
        }
    }
}
