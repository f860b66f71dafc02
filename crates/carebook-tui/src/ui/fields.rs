//! The focusable fields of each step.
//!
//! The list depends on the form's current values: conditional note fields
//! only appear when their mode or flag asks for them, and the offering step
//! lists one block per selection row with that row's day options.

use carebook_core::models::{ChildField, Consent, DayKey, NotesField, PersonField};
use carebook_core::{BookingForm, Step};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormField {
    Salutation,
    PersonText(PersonField),
    ChildText(ChildField),
    Gender,
    School,
    Class,
    Departure,
    NotesText(NotesField),
    TakesMedication,
    HasIntolerances,
    Consent(Consent),
    AccountHolder,
    Iban,
    Offering(usize),
    Day(usize, DayKey),
    Sibling(usize),
    SiblingName(usize),
    AddRow,
}

/// How a field reacts to input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, edited with character keys and Backspace.
    Text,
    /// One of a fixed list, cycled with Left/Right.
    Choice,
    /// A checkbox, flipped with Space.
    Toggle,
    /// A button, triggered with Space.
    Action,
}

impl FormField {
    pub fn kind(&self) -> FieldKind {
        match self {
            FormField::PersonText(_)
            | FormField::ChildText(_)
            | FormField::NotesText(_)
            | FormField::AccountHolder
            | FormField::Iban
            | FormField::SiblingName(_) => FieldKind::Text,
            FormField::Salutation
            | FormField::Gender
            | FormField::School
            | FormField::Class
            | FormField::Departure
            | FormField::Offering(_) => FieldKind::Choice,
            FormField::TakesMedication
            | FormField::HasIntolerances
            | FormField::Consent(_)
            | FormField::Day(..)
            | FormField::Sibling(_) => FieldKind::Toggle,
            FormField::AddRow => FieldKind::Action,
        }
    }

    /// Whether the field must be filled for its step to pass.
    pub fn is_required(&self) -> bool {
        !matches!(
            self,
            FormField::TakesMedication
                | FormField::HasIntolerances
                | FormField::Day(..)
                | FormField::Sibling(_)
                | FormField::AddRow
        )
    }

    /// The selection row the field belongs to, on the offering step.
    pub fn row(&self) -> Option<usize> {
        match self {
            FormField::Offering(row)
            | FormField::Day(row, _)
            | FormField::Sibling(row)
            | FormField::SiblingName(row) => Some(*row),
            _ => None,
        }
    }

    pub fn label_key(&self) -> &'static str {
        match self {
            FormField::Salutation => "person.salutation",
            FormField::PersonText(field) => field.label_key(),
            FormField::ChildText(field) => field.label_key(),
            FormField::Gender => "child.gender",
            FormField::School => "child.school",
            FormField::Class => "child.class",
            FormField::Departure => "notes.departure",
            FormField::NotesText(field) => field.label_key(),
            FormField::TakesMedication => "notes.takesMedication",
            FormField::HasIntolerances => "notes.hasIntolerances",
            FormField::Consent(consent) => consent.label_key(),
            FormField::AccountHolder => "sepa.accountHolder",
            FormField::Iban => "sepa.iban",
            FormField::Offering(_) => "offer.offering",
            FormField::Day(_, key) => key.weekday().label_key(),
            FormField::Sibling(_) => "offer.sibling",
            FormField::SiblingName(_) => "offer.siblingName",
            FormField::AddRow => "offer.addRow",
        }
    }
}

/// Fields shown for `step`, in focus order.
pub fn fields_for(step: Step, form: &BookingForm) -> Vec<FormField> {
    match step {
        Step::Person => std::iter::once(FormField::Salutation)
            .chain(PersonField::ALL.into_iter().map(FormField::PersonText))
            .collect(),
        Step::Child => vec![
            FormField::ChildText(ChildField::FirstName),
            FormField::ChildText(ChildField::LastName),
            FormField::ChildText(ChildField::BirthDate),
            FormField::Gender,
            FormField::School,
            FormField::Class,
        ],
        Step::Notes => {
            let notes = form.notes();
            let mut fields = vec![FormField::Departure];
            for field in [NotesField::PickupName, NotesField::BusLine] {
                if notes.is_relevant(field) {
                    fields.push(FormField::NotesText(field));
                }
            }
            fields.push(FormField::TakesMedication);
            if notes.is_relevant(NotesField::Medication) {
                fields.push(FormField::NotesText(NotesField::Medication));
            }
            fields.push(FormField::HasIntolerances);
            if notes.is_relevant(NotesField::Intolerances) {
                fields.push(FormField::NotesText(NotesField::Intolerances));
            }
            fields
        }
        Step::Payment => Consent::ALL
            .into_iter()
            .map(FormField::Consent)
            .chain([FormField::AccountHolder, FormField::Iban])
            .collect(),
        Step::Offerings => {
            let mut fields = Vec::new();
            for (row, selection) in form.selections().iter().enumerate() {
                fields.push(FormField::Offering(row));
                for option in form.view().day_options(&selection.offering) {
                    for variant in option.variants {
                        fields.push(FormField::Day(row, variant.key));
                    }
                }
                fields.push(FormField::Sibling(row));
                if selection.sibling {
                    fields.push(FormField::SiblingName(row));
                }
            }
            if form.can_add_selection() {
                fields.push(FormField::AddRow);
            }
            fields
        }
    }
}
