//! Care-logistics notes: how the child leaves, medication and allergies.

use serde::{Deserialize, Serialize};

/// How the child leaves the care at the end of the day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum DepartureMode {
    #[serde(rename = "selbständig")]
    Independent,
    #[serde(rename = "Abholung")]
    Pickup,
    #[serde(rename = "Bus")]
    Bus,
}

impl DepartureMode {
    pub const ALL: [DepartureMode; 3] = [
        DepartureMode::Independent,
        DepartureMode::Pickup,
        DepartureMode::Bus,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            DepartureMode::Independent => "notes.independent",
            DepartureMode::Pickup => "notes.pickup",
            DepartureMode::Bus => "notes.bus",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotesField {
    PickupName,
    BusLine,
    Medication,
    Intolerances,
}

impl NotesField {
    pub const ALL: [NotesField; 4] = [
        NotesField::PickupName,
        NotesField::BusLine,
        NotesField::Medication,
        NotesField::Intolerances,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            NotesField::PickupName => "notes.pickupName",
            NotesField::BusLine => "notes.busLine",
            NotesField::Medication => "notes.medication",
            NotesField::Intolerances => "notes.intolerances",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesEdit {
    Departure(Option<DepartureMode>),
    TakesMedication(bool),
    HasIntolerances(bool),
    Text(NotesField, String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Notes {
    pub departure: Option<DepartureMode>,
    pub pickup_name: String,
    pub bus_line: String,
    pub takes_medication: bool,
    pub medication: String,
    pub has_intolerances: bool,
    pub intolerances: String,
}

impl Notes {
    /// Apply an edit, returning the updated record.
    ///
    /// Dependent text is cleared together with its gate: leaving the pickup
    /// mode clears the pickup name, leaving the bus mode clears the bus line,
    /// and unchecking a flag clears its description.
    pub fn apply(mut self, edit: NotesEdit) -> Self {
        match edit {
            NotesEdit::Departure(mode) => {
                self.departure = mode;
                if mode != Some(DepartureMode::Pickup) {
                    self.pickup_name.clear();
                }
                if mode != Some(DepartureMode::Bus) {
                    self.bus_line.clear();
                }
            }
            NotesEdit::TakesMedication(flag) => {
                self.takes_medication = flag;
                if !flag {
                    self.medication.clear();
                }
            }
            NotesEdit::HasIntolerances(flag) => {
                self.has_intolerances = flag;
                if !flag {
                    self.intolerances.clear();
                }
            }
            NotesEdit::Text(field, value) => *self.text_mut(field) = value,
        }
        self
    }

    pub fn text(&self, field: NotesField) -> &str {
        match field {
            NotesField::PickupName => &self.pickup_name,
            NotesField::BusLine => &self.bus_line,
            NotesField::Medication => &self.medication,
            NotesField::Intolerances => &self.intolerances,
        }
    }

    fn text_mut(&mut self, field: NotesField) -> &mut String {
        match field {
            NotesField::PickupName => &mut self.pickup_name,
            NotesField::BusLine => &mut self.bus_line,
            NotesField::Medication => &mut self.medication,
            NotesField::Intolerances => &mut self.intolerances,
        }
    }

    /// Whether a dependent text field is currently relevant (shown and required).
    pub fn is_relevant(&self, field: NotesField) -> bool {
        match field {
            NotesField::PickupName => self.departure == Some(DepartureMode::Pickup),
            NotesField::BusLine => self.departure == Some(DepartureMode::Bus),
            NotesField::Medication => self.takes_medication,
            NotesField::Intolerances => self.has_intolerances,
        }
    }
}
