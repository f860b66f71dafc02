//! The booking form: all field groups plus the offering view derived for
//! the chosen school.
//!
//! Every edit goes through a typed reducer on the affected group. Rules that
//! span groups live here: changing the school re-derives the offering view,
//! drops a class the new school does not have, removes selections that
//! refer to offerings the new school does not provide and drops days the
//! remaining offerings no longer run on.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::catalog::{Catalog, OfferingView};
use crate::models::{
    Child, ChildEdit, ChildField, Notes, NotesEdit, OfferingSelection, Payment, PaymentEdit, Person,
    PersonEdit, SelectionEdit,
};
use crate::steps::{Step, StepGate};
use crate::submission::{FormSnapshot, SubmissionError};
use crate::validation::{self, ValidationPolicy};

#[derive(Debug, Clone)]
pub struct BookingForm {
    catalog: Arc<Catalog>,
    policy: ValidationPolicy,
    view: OfferingView,

    person: Person,
    child: Child,
    notes: Notes,
    payment: Payment,
    selections: Vec<OfferingSelection>,
}

impl BookingForm {
    /// An empty form with one unchosen offering row.
    pub fn new(catalog: Arc<Catalog>, policy: ValidationPolicy) -> Self {
        let view = catalog.view_for("");
        Self {
            catalog,
            policy,
            view,
            person: Person::default(),
            child: Child::default(),
            notes: Notes::default(),
            payment: Payment::default(),
            selections: vec![OfferingSelection::default()],
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    pub fn view(&self) -> &OfferingView {
        &self.view
    }

    pub fn person(&self) -> &Person {
        &self.person
    }

    pub fn child(&self) -> &Child {
        &self.child
    }

    pub fn notes(&self) -> &Notes {
        &self.notes
    }

    pub fn payment(&self) -> &Payment {
        &self.payment
    }

    pub fn selections(&self) -> &[OfferingSelection] {
        &self.selections
    }

    // =========================================================================
    // Field group edits
    // =========================================================================

    pub fn edit_person(&mut self, edit: PersonEdit) {
        self.person = std::mem::take(&mut self.person).apply(edit);
    }

    pub fn edit_child(&mut self, edit: ChildEdit) {
        let previous_school = self.child.school.clone();
        self.child = std::mem::take(&mut self.child).apply(edit);

        if self.child.school != previous_school {
            self.on_school_changed();
        }
    }

    pub fn edit_notes(&mut self, edit: NotesEdit) {
        self.notes = std::mem::take(&mut self.notes).apply(edit);
    }

    pub fn edit_payment(&mut self, edit: PaymentEdit) {
        self.payment = std::mem::take(&mut self.payment).apply(edit);
    }

    fn on_school_changed(&mut self) {
        self.view = self.catalog.view_for(&self.child.school);

        if !self.child.class.is_empty() && !self.view.has_class(&self.child.class) {
            self.child = std::mem::take(&mut self.child).apply(ChildEdit::Text(ChildField::Class, String::new()));
        }

        let view = &self.view;
        let before = self.selections.len();
        self.selections
            .retain(|s| s.offering.is_empty() || view.offering(&s.offering).is_some());
        let removed = before - self.selections.len();

        // Same offering name at another school may run on other days
        for selection in &mut self.selections {
            selection.days.retain(|key| view.offers_day(&selection.offering, key));
        }

        self.selections.truncate(view.max_selections());
        if self.selections.is_empty() {
            self.selections.push(OfferingSelection::default());
        }

        debug!(
            school = %self.child.school,
            removed,
            rows = self.selections.len(),
            "School changed, selections re-derived"
        );
    }

    // =========================================================================
    // Offering selections
    // =========================================================================

    /// Whether another row may be added for the current school.
    pub fn can_add_selection(&self) -> bool {
        self.selections.len() < self.view.max_selections()
    }

    /// Append an empty row. Returns false when the cap is reached.
    pub fn add_selection(&mut self) -> bool {
        if !self.can_add_selection() {
            return false;
        }
        self.selections.push(OfferingSelection::default());
        true
    }

    /// Remove the row at `index`. Returns false when there is no such row.
    pub fn remove_selection(&mut self, index: usize) -> bool {
        if index >= self.selections.len() {
            return false;
        }
        self.selections.remove(index);
        true
    }

    /// Apply an edit to the row at `index`.
    ///
    /// Offerings the school does not provide and days the chosen offering
    /// does not provide are refused. Returns whether the edit was applied.
    pub fn edit_selection(&mut self, index: usize, edit: SelectionEdit) -> bool {
        let Some(current) = self.selections.get(index) else {
            return false;
        };

        let allowed = match &edit {
            SelectionEdit::Offering(name) => name.is_empty() || self.view.offering(name).is_some(),
            SelectionEdit::ToggleDay(key) => self.view.offers_day(&current.offering, key),
            SelectionEdit::Sibling(_) | SelectionEdit::SiblingName(_) => true,
        };
        if !allowed {
            debug!(index, ?edit, "Selection edit refused");
            return false;
        }

        let row = std::mem::take(&mut self.selections[index]);
        self.selections[index] = row.apply(edit);
        true
    }

    // =========================================================================
    // Validation and submission
    // =========================================================================

    /// Required-field check for a step, honouring the validation policy.
    pub fn step_complete(&self, step: Step) -> bool {
        if self.policy.test_mode {
            return true;
        }
        match step {
            Step::Person => validation::person_complete(&self.person),
            Step::Child => self.policy.skip_child_step || validation::child_complete(&self.child, &self.view),
            Step::Notes => validation::notes_complete(&self.notes),
            Step::Payment => validation::payment_complete(&self.payment),
            Step::Offerings => validation::offerings_complete(&self.selections, &self.view),
        }
    }

    /// First step whose check fails, if any.
    pub fn first_incomplete_step(&self) -> Option<Step> {
        Step::ALL.iter().copied().find(|step| !self.step_complete(*step))
    }

    /// Freeze the form for submission. Fails with the first incomplete step.
    pub fn snapshot(&self) -> Result<FormSnapshot, SubmissionError> {
        if let Some(step) = self.first_incomplete_step() {
            return Err(SubmissionError::Incomplete(step));
        }

        info!(offerings = self.selections.len(), "Form snapshot taken");
        Ok(FormSnapshot {
            person: self.person.clone(),
            child: self.child.clone(),
            notes: self.notes.clone(),
            payment: self.payment.clone(),
            selections: self.selections.clone(),
            created_at: Utc::now(),
        })
    }
}

impl StepGate for BookingForm {
    fn is_satisfied(&self, step: Step) -> bool {
        self.step_complete(step)
    }
}
