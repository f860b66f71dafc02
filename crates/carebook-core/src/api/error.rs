use thiserror::Error;

use crate::iban::IbanError;

#[derive(Error, Debug)]
pub enum BankLookupError {
    #[error("IBAN rejected before lookup: {0}")]
    InvalidIban(#[from] IbanError),

    #[error("Bank code not found: {0}")]
    NotFound(String),

    #[error("Rate limited by lookup service")]
    RateLimited,

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl BankLookupError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            404 => BankLookupError::NotFound(truncated),
            429 => BankLookupError::RateLimited,
            500..=599 => BankLookupError::ServerError(truncated),
            _ => BankLookupError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            BankLookupError::from_status(StatusCode::NOT_FOUND, "unknown"),
            BankLookupError::NotFound(ref body) if body == "unknown"
        ));
        assert!(matches!(
            BankLookupError::from_status(StatusCode::TOO_MANY_REQUESTS, ""),
            BankLookupError::RateLimited
        ));
        assert!(matches!(
            BankLookupError::from_status(StatusCode::BAD_GATEWAY, "down"),
            BankLookupError::ServerError(_)
        ));
        assert!(matches!(
            BankLookupError::from_status(StatusCode::BAD_REQUEST, "nope"),
            BankLookupError::InvalidResponse(ref msg) if msg.contains("400")
        ));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "ü".repeat(400);
        let truncated = BankLookupError::truncate_body(&body);
        assert!(truncated.len() < body.len());
        assert!(truncated.ends_with("(truncated, 800 total bytes)"));
    }
}
