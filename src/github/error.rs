/// Failures surfaced by the provider client
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// GitHub answered with a non-success status code
    Status { status: u16, message: String },
    /// Request never produced a usable HTTP response
    Transport(String),
    /// Response body or file content could not be decoded
    Decode(String),
    /// Client could not be built from the given settings
    Configuration(String),
}

impl ProviderError {
    /// Convert octocrab error to the matching provider failure
    pub fn from_octocrab_error(error: octocrab::Error) -> Self {
        tracing::debug!("Raw octocrab error: {:?}", error);

        let result = match &error {
            octocrab::Error::GitHub { source, .. } => {
                let status = source.status_code.as_u16();
                tracing::debug!(
                    "GitHub API error - Status: {}, Message: {:?}, Documentation: {:?}",
                    status,
                    source.message,
                    source.documentation_url
                );
                Self::Status {
                    status,
                    message: source.message.clone(),
                }
            }
            octocrab::Error::Http { .. } | octocrab::Error::Hyper { .. } => {
                Self::Transport(format!("HTTP layer error: {}", headline(&error)))
            }
            octocrab::Error::Json { .. } | octocrab::Error::Serde { .. } => {
                Self::Decode(format!("JSON parsing error: {}", headline(&error)))
            }
            octocrab::Error::Uri { .. } | octocrab::Error::InvalidHeaderValue { .. } => {
                Self::Configuration(format!("Invalid request: {}", headline(&error)))
            }
            _ => Self::Transport(format!("Unknown error type: {}", headline(&error))),
        };

        tracing::debug!("Error classification result: {:?}", result);
        result
    }

    /// Builds a `Status` error from a non-success response.
    ///
    /// The message is GitHub's JSON `message` when the body has one, else the
    /// reason phrase. Bodies from proxies (HTML, empty) are not parsed further.
    pub fn from_response(status: u16, reason: Option<&str>, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .ok()
            .and_then(|body| body.message)
            .or_else(|| reason.map(str::to_string))
            .unwrap_or_default();

        Self::Status { status, message }
    }

    /// Status code of the failed response, if GitHub answered at all
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(serde::Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

/// First line of an octocrab error; its Display appends the captured backtrace
fn headline(error: &octocrab::Error) -> String {
    error
        .to_string()
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

impl From<octocrab::Error> for ProviderError {
    fn from(error: octocrab::Error) -> Self {
        Self::from_octocrab_error(error)
    }
}

impl std::fmt::Display for ProviderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Status { status, message } if message.is_empty() => {
                write!(f, "API response {}", status)
            }
            Self::Status { status, message } => write!(f, "API response {}: {}", status, message),
            Self::Transport(msg) => write!(f, "Transport error: {}", msg),
            Self::Decode(msg) => write!(f, "Decode error: {}", msg),
            Self::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}
