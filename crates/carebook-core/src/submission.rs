//! Handing a completed form over for booking.
//!
//! The form produces a [`FormSnapshot`]; a [`BookingSink`] accepts it and
//! answers with a [`BookingConfirmation`]. Transport to a booking back-end
//! is left to sink implementations. [`JsonExportSink`] stores the snapshot
//! as a JSON file.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::models::{Child, Notes, OfferingSelection, Payment, Person};
use crate::steps::Step;

/// Prefix of booking references.
const REFERENCE_PREFIX: &str = "CB";

/// Everything the registrant entered, frozen at submission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[serde(rename_all = "camelCase")]
pub struct FormSnapshot {
    pub person: Person,
    pub child: Child,
    pub notes: Notes,
    pub payment: Payment,
    pub selections: Vec<OfferingSelection>,
    #[cfg_attr(feature = "ts", ts(type = "string"))]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingConfirmation {
    pub reference: String,
    /// Where the booking was stored, for sinks that store locally.
    pub location: Option<PathBuf>,
}

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("Step {0:?} is not complete")]
    Incomplete(Step),

    #[error("Failed to write booking to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize booking: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Accepts completed forms.
pub trait BookingSink {
    fn submit(&self, snapshot: &FormSnapshot) -> Result<BookingConfirmation, SubmissionError>;
}

/// Writes each booking as `booking-<reference>.json` into a directory.
#[derive(Debug, Clone)]
pub struct JsonExportSink {
    dir: PathBuf,
}

impl JsonExportSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn reference_for(snapshot: &FormSnapshot) -> String {
        format!(
            "{}-{}",
            REFERENCE_PREFIX,
            snapshot.created_at.format("%Y%m%d-%H%M%S%3f")
        )
    }
}

impl BookingSink for JsonExportSink {
    fn submit(&self, snapshot: &FormSnapshot) -> Result<BookingConfirmation, SubmissionError> {
        let reference = Self::reference_for(snapshot);
        let path = self.dir.join(format!("booking-{}.json", reference));
        let io_error = |source| SubmissionError::Io {
            path: path.clone(),
            source,
        };

        std::fs::create_dir_all(&self.dir).map_err(io_error)?;
        let contents = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&path, contents).map_err(io_error)?;

        info!(reference = %reference, path = %path.display(), "Booking exported");
        Ok(BookingConfirmation {
            reference,
            location: Some(path),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::models::{DayKey, SelectionEdit, Weekday};

    fn snapshot() -> FormSnapshot {
        FormSnapshot {
            person: Person::default(),
            child: Child::default(),
            notes: Notes::default(),
            payment: Payment::default(),
            selections: vec![OfferingSelection::default()
                .apply(SelectionEdit::Offering("Mittagessen".to_string()))
                .apply(SelectionEdit::ToggleDay(DayKey::Variant(
                    Weekday::Monday,
                    "mit Mittagessen".to_string(),
                )))],
            created_at: Utc.with_ymd_and_hms(2026, 9, 1, 7, 30, 5).unwrap(),
        }
    }

    #[test]
    fn test_reference_format() {
        assert_eq!(JsonExportSink::reference_for(&snapshot()), "CB-20260901-073005000");
    }

    #[test]
    fn test_export_writes_readable_json() {
        let dir = tempfile::tempdir().unwrap();
        let sink = JsonExportSink::new(dir.path().join("bookings"));

        let confirmation = sink.submit(&snapshot()).unwrap();
        let path = confirmation.location.unwrap();
        assert!(path.starts_with(sink.dir()));

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("monday:mit Mittagessen"));
        let parsed: FormSnapshot = serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed, snapshot());
    }

    #[test]
    fn test_export_into_file_path_fails() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let sink = JsonExportSink::new(file.path());
        assert!(matches!(sink.submit(&snapshot()), Err(SubmissionError::Io { .. })));
    }
}
