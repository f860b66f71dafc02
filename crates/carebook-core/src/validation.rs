//! Required-field checks, one pure predicate per form step.
//!
//! The predicates only answer "may the user continue"; which field is
//! missing is shown next to the field itself.

use serde::{Deserialize, Serialize};

use crate::catalog::OfferingView;
use crate::iban;
use crate::models::{Child, Notes, NotesField, OfferingSelection, Payment, Person, PersonField};

/// Which gates are enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    /// Let the child step pass without checking its fields.
    #[serde(default)]
    pub skip_child_step: bool,
    /// Let every step pass. For trying out the flow, never for real bookings.
    #[serde(default)]
    pub test_mode: bool,
}

fn filled(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Step 0: salutation chosen and every text field filled.
pub fn person_complete(person: &Person) -> bool {
    person.salutation.is_some() && PersonField::ALL.iter().all(|f| filled(person.text(*f)))
}

/// Step 1: every field filled, a valid ISO birth date, a school from the
/// catalog and one of that school's classes.
///
/// `view` must be derived for `child.school`.
pub fn child_complete(child: &Child, view: &OfferingView) -> bool {
    filled(&child.first_name)
        && filled(&child.last_name)
        && child.gender.is_some()
        && child.birth_date().is_some()
        && view.school().map(|s| s.name == child.school).unwrap_or(false)
        && view.has_class(&child.class)
}

/// Step 2: departure mode chosen and each conditionally required text filled.
pub fn notes_complete(notes: &Notes) -> bool {
    notes.departure.is_some()
        && NotesField::ALL
            .iter()
            .all(|field| !notes.is_relevant(*field) || filled(notes.text(*field)))
}

/// Step 3: all consents given, account holder named and a structurally
/// valid IBAN.
pub fn payment_complete(payment: &Payment) -> bool {
    payment.all_consents_given()
        && filled(&payment.account_holder)
        && filled(&payment.iban)
        && iban::validate(&payment.iban).is_ok()
}

/// Whether a single row names an offering of the school, only uses days
/// that offering provides and names the sibling when flagged.
pub fn selection_complete(selection: &OfferingSelection, view: &OfferingView) -> bool {
    filled(&selection.offering)
        && view.offering(&selection.offering).is_some()
        && selection.days.iter().all(|key| view.offers_day(&selection.offering, key))
        && !selection.sibling_pending()
}

/// Step 4: at least one row, and every row complete.
pub fn offerings_complete(selections: &[OfferingSelection], view: &OfferingView) -> bool {
    !selections.is_empty() && selections.iter().all(|s| selection_complete(s, view))
}
