//! The offering catalog: which schools exist, which classes they have and
//! which care offerings they provide on which weekdays.
//!
//! The catalog is read-only and loaded once at start-up, either from the
//! bundled `data/catalog.json` or from a file named in the configuration.

pub mod view;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::School;

pub use view::{DayOption, DayVariant, OfferingView};

/// Catalog shipped with the crate.
const BUNDLED_CATALOG: &str = include_str!("../../data/catalog.json");

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Failed to read catalog file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid catalog data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Catalog contains no schools")]
    Empty,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    schools: Vec<School>,
}

impl Catalog {
    pub fn new(schools: Vec<School>) -> Self {
        Self { schools }
    }

    /// Parse a catalog from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = serde_json::from_str(json)?;
        if catalog.schools.is_empty() {
            return Err(CatalogError::Empty);
        }

        for school in &catalog.schools {
            for offering in &school.offerings {
                if offering.timeslots.is_empty() {
                    warn!(school = %school.name, offering = %offering.name, "Offering has no timeslots");
                }
            }
        }

        Ok(catalog)
    }

    /// The catalog compiled into the crate.
    pub fn bundled() -> Result<Self, CatalogError> {
        Self::from_json(BUNDLED_CATALOG)
    }

    /// Load the catalog from `path`, or the bundled one when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self, CatalogError> {
        match path {
            Some(path) => {
                let contents = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
                    path: path.to_path_buf(),
                    source,
                })?;
                let catalog = Self::from_json(&contents)?;
                debug!(path = %path.display(), schools = catalog.schools.len(), "Loaded catalog from disk");
                Ok(catalog)
            }
            None => Self::bundled(),
        }
    }

    pub fn schools(&self) -> &[School] {
        &self.schools
    }

    /// Look up a school by exact name.
    pub fn school(&self, name: &str) -> Option<&School> {
        self.schools.iter().find(|s| s.name == name)
    }

    /// Derive the offering view for a school name.
    pub fn view_for(&self, school: &str) -> OfferingView {
        OfferingView::derive(self, school)
    }
}
