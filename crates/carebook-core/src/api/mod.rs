//! HTTP client for the bank lookup service.
//!
//! The service answers whether an IBAN's bank code is known and returns the
//! bank's name and BIC. The form only uses it to show the bank next to the
//! IBAN field, so every failure degrades to "no bank info".

pub mod client;
pub mod error;

pub use client::{BankInfo, BankLookupClient};
pub use error::BankLookupError;
