//! Offering choices derived from the catalog for the currently chosen school.

use tracing::debug;

use crate::models::{DayKey, Offering, School, Weekday};

use super::Catalog;

/// Selection cap when no school is chosen yet, so one row can still be added.
const UNMATCHED_SCHOOL_MAX_SELECTIONS: usize = 1;

/// A selectable slot of a day option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayVariant {
    pub key: DayKey,
    /// Distinguishing label when the weekday has several slots.
    pub label: Option<String>,
    /// Times that apply to this slot (own times or the offering default).
    pub time_range: Option<String>,
    /// The slot has its own times deviating from the offering default.
    pub deviates: bool,
}

/// All slots of one weekday. More than one variant means they are
/// mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOption {
    pub day: Weekday,
    pub variants: Vec<DayVariant>,
}

impl DayOption {
    pub fn is_exclusive(&self) -> bool {
        self.variants.len() > 1
    }
}

/// What the offering step may offer for a school.
///
/// Derived once per school change and kept by the form; the offering list
/// and the selection cap always come from here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OfferingView {
    school: Option<School>,
}

impl OfferingView {
    pub fn derive(catalog: &Catalog, school_name: &str) -> Self {
        let school = catalog.school(school_name).cloned();
        debug!(
            school = %school_name,
            matched = school.is_some(),
            offerings = school.as_ref().map(|s| s.offerings.len()).unwrap_or(0),
            "Derived offering view"
        );
        Self { school }
    }

    pub fn school(&self) -> Option<&School> {
        self.school.as_ref()
    }

    pub fn offerings(&self) -> &[Offering] {
        self.school.as_ref().map(|s| s.offerings.as_slice()).unwrap_or(&[])
    }

    pub fn classes(&self) -> &[String] {
        self.school.as_ref().map(|s| s.classes.as_slice()).unwrap_or(&[])
    }

    /// Upper bound for the number of selection rows.
    pub fn max_selections(&self) -> usize {
        match &self.school {
            Some(school) => school.offerings.len(),
            None => UNMATCHED_SCHOOL_MAX_SELECTIONS,
        }
    }

    pub fn offering(&self, name: &str) -> Option<&Offering> {
        self.school.as_ref().and_then(|s| s.offering(name))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.school.as_ref().map(|s| s.has_class(class)).unwrap_or(false)
    }

    /// Day options of an offering, one per weekday in catalog order.
    pub fn day_options(&self, offering_name: &str) -> Vec<DayOption> {
        let Some(offering) = self.offering(offering_name) else {
            return Vec::new();
        };

        offering
            .weekdays()
            .into_iter()
            .map(|day| {
                let exclusive = offering.has_variants(day);
                let variants = offering
                    .slots_on(day)
                    .into_iter()
                    .map(|slot| {
                        let (key, label) = if exclusive {
                            let label = slot.variant_label();
                            (DayKey::Variant(day, label.clone()), Some(label))
                        } else {
                            (DayKey::Day(day), None)
                        };
                        DayVariant {
                            key,
                            label,
                            time_range: offering.effective_time_range(slot),
                            deviates: slot.has_own_times(),
                        }
                    })
                    .collect();
                DayOption { day, variants }
            })
            .collect()
    }

    /// Whether `key` is a day the offering actually provides.
    pub fn offers_day(&self, offering_name: &str, key: &DayKey) -> bool {
        self.day_options(offering_name)
            .iter()
            .flat_map(|option| option.variants.iter())
            .any(|variant| &variant.key == key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Timeslot;

    fn slot(day: Weekday, start: Option<&str>, end: Option<&str>) -> Timeslot {
        Timeslot {
            day,
            start: start.map(String::from),
            end: end.map(String::from),
            option: None,
        }
    }

    fn catalog() -> Catalog {
        Catalog::new(vec![School {
            name: "Grundschule Reute".to_string(),
            classes: vec!["1a".to_string(), "2a".to_string()],
            offerings: vec![
                Offering {
                    name: "Frühbetreuung".to_string(),
                    start: Some("07:00".to_string()),
                    end: Some("08:30".to_string()),
                    timeslots: vec![
                        slot(Weekday::Monday, None, None),
                        slot(Weekday::Wednesday, Some("07:30"), None),
                    ],
                },
                Offering {
                    name: "Nachmittag".to_string(),
                    start: None,
                    end: None,
                    timeslots: vec![
                        slot(Weekday::Friday, Some("13:30"), Some("14:30")),
                        slot(Weekday::Friday, Some("13:30"), Some("16:00")),
                    ],
                },
            ],
        }])
    }

    #[test]
    fn test_unmatched_school_defaults() {
        let view = OfferingView::derive(&catalog(), "Unbekannte Schule");
        assert!(view.school().is_none());
        assert!(view.offerings().is_empty());
        assert!(view.classes().is_empty());
        assert_eq!(view.max_selections(), 1);
    }

    #[test]
    fn test_matched_school() {
        let view = OfferingView::derive(&catalog(), "Grundschule Reute");
        assert_eq!(view.offerings().len(), 2);
        assert_eq!(view.max_selections(), 2);
        assert!(view.has_class("2a"));
        assert!(!view.has_class("4c"));
        assert!(view.offering("Nachmittag").is_some());
        assert!(view.offering("Ferien").is_none());
    }

    #[test]
    fn test_single_slot_days_use_bare_keys() {
        let view = OfferingView::derive(&catalog(), "Grundschule Reute");
        let options = view.day_options("Frühbetreuung");
        assert_eq!(options.len(), 2);

        let monday = &options[0];
        assert_eq!(monday.day, Weekday::Monday);
        assert!(!monday.is_exclusive());
        assert_eq!(monday.variants[0].key, DayKey::Day(Weekday::Monday));
        assert_eq!(monday.variants[0].time_range.as_deref(), Some("07:00–08:30"));
        assert!(!monday.variants[0].deviates);

        let wednesday = &options[1];
        assert_eq!(wednesday.variants[0].time_range.as_deref(), Some("07:30–08:30"));
        assert!(wednesday.variants[0].deviates);
    }

    #[test]
    fn test_multi_slot_days_use_compound_keys() {
        let view = OfferingView::derive(&catalog(), "Grundschule Reute");
        let options = view.day_options("Nachmittag");
        assert_eq!(options.len(), 1);
        assert!(options[0].is_exclusive());

        let keys: Vec<String> = options[0].variants.iter().map(|v| v.key.to_string()).collect();
        assert_eq!(keys, vec!["friday:13:30–14:30", "friday:13:30–16:00"]);
    }

    #[test]
    fn test_offers_day() {
        let view = OfferingView::derive(&catalog(), "Grundschule Reute");
        assert!(view.offers_day("Frühbetreuung", &DayKey::Day(Weekday::Monday)));
        assert!(!view.offers_day("Frühbetreuung", &DayKey::Day(Weekday::Friday)));
        assert!(!view.offers_day("Nachmittag", &DayKey::Day(Weekday::Friday)));
        assert!(view.offers_day(
            "Nachmittag",
            &DayKey::Variant(Weekday::Friday, "13:30–16:00".to_string())
        ));
        assert!(!view.offers_day("Ferien", &DayKey::Day(Weekday::Monday)));
    }
}
