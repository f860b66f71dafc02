//! Core library for carebook.
//!
//! A five-step booking form for school child-care offerings: registrant,
//! child, notes, SEPA mandate and offering selection. This crate holds
//! everything that is not presentation:
//!
//! - `form`: the form aggregate and its edit operations
//! - `steps`: the step controller
//! - `validation`: required-field checks per step
//! - `catalog`: schools, classes and offerings, and the per-school view
//! - `iban`, `api`, `enrichment`: IBAN handling and bank lookups
//! - `i18n`, `config`, `submission`: translations, settings, export

pub mod api;
pub mod catalog;
pub mod config;
pub mod enrichment;
pub mod form;
pub mod i18n;
pub mod iban;
pub mod models;
pub mod steps;
pub mod submission;
pub mod validation;

pub use catalog::{Catalog, CatalogError, OfferingView};
pub use config::Config;
pub use form::BookingForm;
pub use i18n::{Language, Translations, Translator};
pub use steps::{Step, StepController, StepGate};
pub use submission::{BookingConfirmation, BookingSink, FormSnapshot, JsonExportSink, SubmissionError};
pub use validation::ValidationPolicy;
