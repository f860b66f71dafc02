//! Data models for the booking form.
//!
//! This module contains the field groups the registrant fills in and the
//! read-only catalog records they are checked against:
//!
//! - `Person`, `Child`: registrant and child details
//! - `Notes`: departure mode, medication, intolerances
//! - `Payment`: SEPA mandate consents, account holder, IBAN
//! - `OfferingSelection`, `DayKey`: booked offerings and their days
//! - Catalog types: `School`, `Offering`, `Timeslot`, `Weekday`

pub mod catalog;
pub mod notes;
pub mod offering;
pub mod payment;
pub mod person;

pub use catalog::{format_time_range, Offering, School, Timeslot, Weekday};
pub use notes::{DepartureMode, Notes, NotesEdit, NotesField};
pub use offering::{DayKey, OfferingSelection, SelectionEdit, SelectionState};
pub use payment::{Consent, Payment, PaymentEdit};
pub use person::{Child, ChildEdit, ChildField, Gender, Person, PersonEdit, PersonField, Salutation};
