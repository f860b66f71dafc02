//! IBAN formatting and structural validation.
//!
//! Only the shape of a German IBAN is checked (`DE` followed by 20
//! alphanumeric characters). There is no MOD-97 checksum verification.

use thiserror::Error;

/// Characters per display group.
const GROUP_SIZE: usize = 4;

/// Length of the `DE` IBAN body after the country code.
const GERMAN_IBAN_BODY_LEN: usize = 20;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IbanError {
    #[error("Please enter a valid German IBAN (DE + 20 characters).")]
    InvalidGermanIban,
}

impl IbanError {
    /// Translation key for the user-facing message.
    pub fn message_key(&self) -> &'static str {
        match self {
            IbanError::InvalidGermanIban => "sepa.ibanInvalid",
        }
    }
}

/// Canonical display form: ASCII letters and digits only, upper case,
/// a single space after every four characters, no trailing space.
pub fn normalize(raw: &str) -> String {
    let cleaned: Vec<char> = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect();

    cleaned
        .chunks(GROUP_SIZE)
        .map(|group| group.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

/// The IBAN without any spaces or separators, as used by the bank lookup.
pub fn compact(iban: &str) -> String {
    iban.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Check that the IBAN has the shape of a German IBAN.
pub fn validate(iban: &str) -> Result<(), IbanError> {
    let compact = compact(iban);
    let body = compact.strip_prefix("DE").ok_or(IbanError::InvalidGermanIban)?;

    if body.len() == GERMAN_IBAN_BODY_LEN && body.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(IbanError::InvalidGermanIban)
    }
}
