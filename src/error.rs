/// Error Handling Module
///
/// Errors are split by the phase that produces them:
/// 1. Key errors (construction time, fatal to startup)
/// 2. Token errors (verification time, exactly two outcomes)
/// 3. Issue errors (encoding failures while making a token)
/// 4. Configuration and logging setup errors
///
/// `AppError` unifies them for the binary. No variant ever carries key material.

use std::error::Error as StdError;
use std::fmt;

/// ============================================================================
/// 1. DOMAIN-SPECIFIC ERROR TYPES
/// ============================================================================

/// Rejected key material. A maker is never produced alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyError {
    TooShort { min: usize, actual: usize },
    InvalidLength { expected: usize, actual: usize },
}

impl fmt::Display for KeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyError::TooShort { min, actual } => {
                write!(f, "invalid key size: must be at least {} bytes, got {}", min, actual)
            }
            KeyError::InvalidLength { expected, actual } => {
                write!(f, "invalid key size: must be exactly {} bytes, got {}", expected, actual)
            }
        }
    }
}

impl StdError for KeyError {}

/// Verification outcomes other than success.
///
/// Anything that is not a well-formed, authentic, fresh token collapses into
/// `Invalid`. `Expired` is only reported once authenticity is established.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Invalid,
    Expired,
}

impl fmt::Display for TokenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenError::Invalid => write!(f, "token is invalid"),
            TokenError::Expired => write!(f, "token has expired"),
        }
    }
}

impl StdError for TokenError {}

/// Failure to encode a freshly made payload.
#[derive(Debug, Clone)]
pub struct IssueError(pub String);

impl fmt::Display for IssueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to issue token: {}", self.0)
    }
}

impl StdError for IssueError {}

/// ============================================================================
/// 2. UNIFIED APPLICATION ERROR TYPE
/// ============================================================================

#[derive(Debug)]
pub enum AppError {
    Key(KeyError),
    Token(TokenError),
    Issue(IssueError),
    Config(config::ConfigError),
    Telemetry(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Key(e) => write!(f, "cannot create token maker: {}", e),
            AppError::Token(e) => write!(f, "{}", e),
            AppError::Issue(e) => write!(f, "{}", e),
            AppError::Config(e) => write!(f, "Config error: {}", e),
            AppError::Telemetry(msg) => write!(f, "Failed to initialize logging: {}", msg),
        }
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            AppError::Key(e) => Some(e),
            AppError::Token(e) => Some(e),
            AppError::Issue(e) => Some(e),
            AppError::Config(e) => Some(e),
            AppError::Telemetry(_) => None,
        }
    }
}

// ============================================================================
// FROM IMPLEMENTATIONS
// ============================================================================

impl From<KeyError> for AppError {
    fn from(err: KeyError) -> Self {
        AppError::Key(err)
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Token(err)
    }
}

impl From<IssueError> for AppError {
    fn from(err: IssueError) -> Self {
        AppError::Issue(err)
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<tracing_subscriber::util::TryInitError> for AppError {
    fn from(err: tracing_subscriber::util::TryInitError) -> Self {
        AppError::Telemetry(err.to_string())
    }
}
