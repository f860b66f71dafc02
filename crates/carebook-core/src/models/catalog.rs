//! Offering catalog records: schools, their care offerings and weekday timeslots.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// School weekday on which an offering can take place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
}

impl Weekday {
    pub const ALL: [Weekday; 5] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
    ];

    /// Stable identifier used in catalog files and day keys.
    pub fn as_str(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
        }
    }

    /// Translation key for the weekday name.
    pub fn label_key(&self) -> &'static str {
        match self {
            Weekday::Monday => "weekdays.monday",
            Weekday::Tuesday => "weekdays.tuesday",
            Weekday::Wednesday => "weekdays.wednesday",
            Weekday::Thursday => "weekdays.thursday",
            Weekday::Friday => "weekdays.friday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Weekday {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown weekday: {}", s))
    }
}

/// Format an optional `start`/`end` pair as `start–end`.
///
/// The dash only appears when both ends are present. Returns `None` when
/// neither is set.
pub fn format_time_range(start: Option<&str>, end: Option<&str>) -> Option<String> {
    match (start, end) {
        (None, None) => None,
        (start, end) => {
            let dash = if start.is_some() && end.is_some() { "–" } else { "" };
            Some(format!("{}{}{}", start.unwrap_or(""), dash, end.unwrap_or("")))
        }
    }
}

/// A single weekday slot of an offering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timeslot {
    pub day: Weekday,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    /// Free-text label for slots without times (e.g. "kurz", "lang").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub option: Option<String>,
}

impl Timeslot {
    pub fn time_range(&self) -> Option<String> {
        format_time_range(self.start.as_deref(), self.end.as_deref())
    }

    /// Label distinguishing this slot from other slots on the same weekday.
    pub fn variant_label(&self) -> String {
        self.time_range()
            .or_else(|| self.option.clone())
            .unwrap_or_else(|| self.day.as_str().to_string())
    }

    /// True if the slot carries its own times, deviating from the offering default.
    pub fn has_own_times(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }
}

/// A named care package offered by a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<String>,
    #[serde(default)]
    pub timeslots: Vec<Timeslot>,
}

impl Offering {
    /// Default time range of the offering, used when a slot has no own times.
    pub fn time_range(&self) -> Option<String> {
        format_time_range(self.start.as_deref(), self.end.as_deref())
    }

    /// Weekdays with at least one slot, in catalog order and without duplicates.
    pub fn weekdays(&self) -> Vec<Weekday> {
        let mut days = Vec::new();
        for slot in &self.timeslots {
            if !days.contains(&slot.day) {
                days.push(slot.day);
            }
        }
        days
    }

    pub fn slots_on(&self, day: Weekday) -> Vec<&Timeslot> {
        self.timeslots.iter().filter(|s| s.day == day).collect()
    }

    /// True if the weekday has several mutually exclusive slots.
    pub fn has_variants(&self, day: Weekday) -> bool {
        self.slots_on(day).len() > 1
    }

    /// Effective time range for a slot: its own times, else the offering's.
    pub fn effective_time_range(&self, slot: &Timeslot) -> Option<String> {
        format_time_range(
            slot.start.as_deref().or(self.start.as_deref()),
            slot.end.as_deref().or(self.end.as_deref()),
        )
    }
}

/// A school with its classes and care offerings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub name: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default)]
    pub offerings: Vec<Offering>,
}

impl School {
    pub fn offering(&self, name: &str) -> Option<&Offering> {
        self.offerings.iter().find(|o| o.name == name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn afternoon() -> Offering {
        Offering {
            name: "Nachmittag".to_string(),
            start: Some("13:30".to_string()),
            end: Some("16:00".to_string()),
            timeslots: vec![
                Timeslot { day: Weekday::Monday, start: None, end: None, option: None },
                Timeslot {
                    day: Weekday::Friday,
                    start: Some("13:30".to_string()),
                    end: Some("14:30".to_string()),
                    option: None,
                },
                Timeslot {
                    day: Weekday::Friday,
                    start: Some("13:30".to_string()),
                    end: Some("16:00".to_string()),
                    option: None,
                },
            ],
        }
    }

    #[test]
    fn test_format_time_range() {
        assert_eq!(format_time_range(Some("07:00"), Some("08:30")).as_deref(), Some("07:00–08:30"));
        assert_eq!(format_time_range(Some("07:00"), None).as_deref(), Some("07:00"));
        assert_eq!(format_time_range(None, Some("08:30")).as_deref(), Some("08:30"));
        assert_eq!(format_time_range(None, None), None);
    }

    #[test]
    fn test_weekday_from_str() {
        assert_eq!("monday".parse::<Weekday>(), Ok(Weekday::Monday));
        assert_eq!("FRIDAY".parse::<Weekday>(), Ok(Weekday::Friday));
        assert!("saturday".parse::<Weekday>().is_err());
    }

    #[test]
    fn test_offering_weekdays_dedup() {
        assert_eq!(afternoon().weekdays(), vec![Weekday::Monday, Weekday::Friday]);
    }

    #[test]
    fn test_has_variants() {
        let offering = afternoon();
        assert!(offering.has_variants(Weekday::Friday));
        assert!(!offering.has_variants(Weekday::Monday));
        assert!(!offering.has_variants(Weekday::Tuesday));
    }

    #[test]
    fn test_variant_label_fallbacks() {
        let timed = Timeslot {
            day: Weekday::Friday,
            start: Some("13:30".to_string()),
            end: Some("14:30".to_string()),
            option: None,
        };
        assert_eq!(timed.variant_label(), "13:30–14:30");

        let labelled = Timeslot {
            day: Weekday::Friday,
            start: None,
            end: None,
            option: Some("kurz".to_string()),
        };
        assert_eq!(labelled.variant_label(), "kurz");

        let bare = Timeslot { day: Weekday::Friday, start: None, end: None, option: None };
        assert_eq!(bare.variant_label(), "friday");
    }

    #[test]
    fn test_effective_time_range_falls_back_to_offering() {
        let offering = afternoon();
        let monday = &offering.timeslots[0];
        assert_eq!(offering.effective_time_range(monday).as_deref(), Some("13:30–16:00"));
        let short_friday = &offering.timeslots[1];
        assert_eq!(offering.effective_time_range(short_friday).as_deref(), Some("13:30–14:30"));
    }
}
