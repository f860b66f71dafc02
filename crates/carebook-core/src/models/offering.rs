//! A booked care offering: one row of the offering step.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::catalog::Weekday;

/// Selected day of an offering.
///
/// A bare weekday is used when the offering has a single slot that day.
/// When it has several mutually exclusive slots, the chosen one is encoded
/// as `weekday:variant`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum DayKey {
    Day(Weekday),
    Variant(Weekday, String),
}

impl DayKey {
    pub fn weekday(&self) -> Weekday {
        match self {
            DayKey::Day(day) | DayKey::Variant(day, _) => *day,
        }
    }
}

impl fmt::Display for DayKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayKey::Day(day) => write!(f, "{}", day),
            DayKey::Variant(day, label) => write!(f, "{}:{}", day, label),
        }
    }
}

impl FromStr for DayKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((day, label)) => Ok(DayKey::Variant(day.parse()?, label.to_string())),
            None => Ok(DayKey::Day(s.parse()?)),
        }
    }
}

impl From<DayKey> for String {
    fn from(key: DayKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for DayKey {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Lifecycle of a selection row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionState {
    Unchosen,
    ChosenNoDays,
    ChosenWithDays,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEdit {
    /// Choose an offering by name; previously selected days are dropped.
    Offering(String),
    /// Select or deselect a day. Selecting replaces any other key for the
    /// same weekday.
    ToggleDay(DayKey),
    Sibling(bool),
    SiblingName(String),
}

/// One booked offering with its chosen days.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct OfferingSelection {
    pub offering: String,
    /// A sibling already attends or is registered for the same offering.
    pub sibling: bool,
    pub sibling_name: String,
    #[cfg_attr(feature = "ts", ts(type = "Array<string>"))]
    pub days: Vec<DayKey>,
}

impl OfferingSelection {
    pub fn apply(mut self, edit: SelectionEdit) -> Self {
        match edit {
            SelectionEdit::Offering(name) => {
                if name != self.offering {
                    self.days.clear();
                }
                self.offering = name;
            }
            SelectionEdit::ToggleDay(key) => {
                if self.days.contains(&key) {
                    self.days.retain(|k| k != &key);
                } else {
                    let day = key.weekday();
                    self.days.retain(|k| k.weekday() != day);
                    self.days.push(key);
                    self.days.sort_by_key(|k| k.weekday());
                }
            }
            SelectionEdit::Sibling(flag) => {
                self.sibling = flag;
                if !flag {
                    self.sibling_name.clear();
                }
            }
            SelectionEdit::SiblingName(name) => self.sibling_name = name,
        }
        self
    }

    pub fn state(&self) -> SelectionState {
        if self.offering.trim().is_empty() {
            SelectionState::Unchosen
        } else if self.days.is_empty() {
            SelectionState::ChosenNoDays
        } else {
            SelectionState::ChosenWithDays
        }
    }

    /// Sibling flag set but no name given yet.
    pub fn sibling_pending(&self) -> bool {
        self.sibling && self.sibling_name.trim().is_empty()
    }

    pub fn has_day(&self, key: &DayKey) -> bool {
        self.days.contains(key)
    }
}
