//! Application state management for the booking wizard.
//!
//! This module contains the `App` struct that owns the booking form, the step
//! controller and the UI state, and coordinates background bank lookups.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use carebook_core::api::{BankInfo, BankLookupClient};
use carebook_core::enrichment::{LookupSequence, LookupTicket};
use carebook_core::iban;
use carebook_core::models::{
    ChildEdit, ChildField, DepartureMode, Gender, NotesEdit, PaymentEdit, PersonEdit, Salutation,
    SelectionEdit,
};
use carebook_core::{
    BookingConfirmation, BookingForm, BookingSink, Catalog, Config, JsonExportSink, Step, StepController,
    Translations, Translator,
};

use crate::ui::fields::{fields_for, FieldKind, FormField};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// Lookups are issued one per IBAN edit, so a small buffer is plenty.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for a text field.
const MAX_FIELD_LENGTH: usize = 100;

/// Export directory used when no data directory can be determined.
const FALLBACK_EXPORT_DIR: &str = "./bookings";

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Editing,
    ShowingHelp,
    ConfirmingQuit,
    Submitted,
    Quitting,
}

/// State of the bank line under the IBAN field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BankLine {
    Empty,
    Pending,
    Found(BankInfo),
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Results sent from background tasks back to the event loop.
enum BackgroundResult {
    /// Outcome of a bank lookup; `None` when the lookup failed.
    Bank(LookupTicket, Option<BankInfo>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

pub struct App {
    // Core services
    pub config: Config,
    pub translations: Translations,
    bank: BankLookupClient,
    sink: Box<dyn BookingSink + Send>,

    // Form state
    pub form: BookingForm,
    pub steps: StepController,

    // UI State
    pub state: AppState,
    pub focus: usize,
    pub status_message: Option<String>,
    pub bank_line: BankLine,
    pub confirmation: Option<BookingConfirmation>,

    // Background task channel
    lookups: LookupSequence,
    background_rx: mpsc::Receiver<BackgroundResult>,
    background_tx: mpsc::Sender<BackgroundResult>,
}

impl App {
    /// Create a new application instance
    pub fn new(config: Config) -> Result<Self> {
        let catalog = Catalog::load(config.catalog_path.as_deref()).context("Failed to load offering catalog")?;
        debug!(schools = catalog.schools().len(), "Catalog loaded");

        let bank = BankLookupClient::new(config.bank_lookup_url(), config.request_timeout())?;

        let export_dir = config.export_dir().unwrap_or_else(|e| {
            warn!(error = %e, "No data directory, exporting to working directory");
            PathBuf::from(FALLBACK_EXPORT_DIR)
        });
        debug!(?export_dir, "Export directory configured");

        Ok(Self::with_parts(config, catalog, bank, Box::new(JsonExportSink::new(export_dir))))
    }

    fn with_parts(
        config: Config,
        catalog: Catalog,
        bank: BankLookupClient,
        sink: Box<dyn BookingSink + Send>,
    ) -> Self {
        let (background_tx, background_rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);
        let policy = config.validation_policy();
        if policy.test_mode {
            warn!("Test mode enabled, step checks are disabled");
        }

        Self {
            translations: Translations::new(config.language),
            form: BookingForm::new(Arc::new(catalog), policy),
            config,
            bank,
            sink,
            steps: StepController::new(),
            state: AppState::Editing,
            focus: 0,
            status_message: None,
            bank_line: BankLine::Empty,
            confirmation: None,
            lookups: LookupSequence::new(),
            background_rx,
            background_tx,
        }
    }

    /// Translated text for `key`.
    pub fn t<'a>(&'a self, key: &'a str) -> &'a str {
        self.translations.t(key)
    }

    fn set_status(&mut self, key: &str) {
        self.status_message = Some(self.translations.t(key).to_string());
    }

    // ========================================================================
    // Focus
    // ========================================================================

    /// Fields of the current step, in focus order.
    pub fn fields(&self) -> Vec<FormField> {
        fields_for(self.steps.current(), &self.form)
    }

    pub fn focused_field(&self) -> Option<FormField> {
        self.fields().get(self.focus).cloned()
    }

    pub fn focus_next(&mut self) {
        let count = self.fields().len();
        if count > 0 {
            self.focus = (self.focus + 1) % count;
        }
    }

    pub fn focus_prev(&mut self) {
        let count = self.fields().len();
        if count > 0 {
            self.focus = (self.focus + count - 1) % count;
        }
    }

    /// Keep focus on an existing field after the field list changed.
    fn clamp_focus(&mut self) {
        let count = self.fields().len();
        self.focus = self.focus.min(count.saturating_sub(1));
    }

    fn focus_field(&mut self, field: &FormField) {
        if let Some(index) = self.fields().iter().position(|f| f == field) {
            self.focus = index;
        }
    }

    // ========================================================================
    // Editing
    // ========================================================================

    /// Current text of a text field.
    pub fn text_of(&self, field: &FormField) -> Option<&str> {
        match field {
            FormField::PersonText(f) => Some(self.form.person().text(*f)),
            FormField::ChildText(f) => Some(self.form.child().text(*f)),
            FormField::NotesText(f) => Some(self.form.notes().text(*f)),
            FormField::AccountHolder => Some(&self.form.payment().account_holder),
            FormField::Iban => Some(&self.form.payment().iban),
            FormField::SiblingName(row) => self.form.selections().get(*row).map(|s| s.sibling_name.as_str()),
            _ => None,
        }
    }

    fn set_text(&mut self, field: &FormField, value: String) {
        match field {
            FormField::PersonText(f) => self.form.edit_person(PersonEdit::Text(*f, value)),
            FormField::ChildText(f) => self.form.edit_child(ChildEdit::Text(*f, value)),
            FormField::NotesText(f) => self.form.edit_notes(NotesEdit::Text(*f, value)),
            FormField::AccountHolder => self.form.edit_payment(PaymentEdit::AccountHolder(value)),
            FormField::Iban => {
                self.form.edit_payment(PaymentEdit::Iban(value));
                self.on_iban_changed();
            }
            FormField::SiblingName(row) => {
                self.form.edit_selection(*row, SelectionEdit::SiblingName(value));
            }
            _ => {}
        }
    }

    pub fn input_char(&mut self, c: char) {
        let Some(field) = self.focused_field() else { return };
        let Some(mut text) = self.text_of(&field).map(str::to_string) else {
            return;
        };
        if !can_add_char(text.chars().count(), c) {
            return;
        }
        text.push(c);
        self.set_text(&field, text);
    }

    pub fn backspace(&mut self) {
        let Some(field) = self.focused_field() else { return };
        let Some(mut text) = self.text_of(&field).map(str::to_string) else {
            return;
        };
        if text.pop().is_none() {
            return;
        }
        // The IBAN is stored grouped; drop the separator along with the character.
        if field == FormField::Iban {
            text = text.trim_end().to_string();
        }
        self.set_text(&field, text);
    }

    /// Move a choice field to its next or previous option.
    pub fn cycle_choice(&mut self, forward: bool) {
        let Some(field) = self.focused_field() else { return };

        match field {
            FormField::Salutation => {
                let next = cycle(&Salutation::ALL, &self.form.person().salutation, forward);
                self.form.edit_person(PersonEdit::Salutation(next));
            }
            FormField::Gender => {
                let next = cycle(&Gender::ALL, &self.form.child().gender, forward);
                self.form.edit_child(ChildEdit::Gender(next));
            }
            FormField::School => {
                let names: Vec<String> = self.form.catalog().schools().iter().map(|s| s.name.clone()).collect();
                let current = non_empty(&self.form.child().school);
                let next = cycle(&names, &current, forward).unwrap_or_default();
                self.form.edit_child(ChildEdit::Text(ChildField::School, next));
            }
            FormField::Class => {
                let classes = self.form.view().classes().to_vec();
                let current = non_empty(&self.form.child().class);
                let next = cycle(&classes, &current, forward).unwrap_or_default();
                self.form.edit_child(ChildEdit::Text(ChildField::Class, next));
            }
            FormField::Departure => {
                let next = cycle(&DepartureMode::ALL, &self.form.notes().departure, forward);
                self.form.edit_notes(NotesEdit::Departure(next));
            }
            FormField::Offering(row) => {
                let names: Vec<String> = self.form.view().offerings().iter().map(|o| o.name.clone()).collect();
                let current = self.form.selections().get(row).and_then(|s| non_empty(&s.offering));
                let next = cycle(&names, &current, forward).unwrap_or_default();
                self.form.edit_selection(row, SelectionEdit::Offering(next));
            }
            _ => return,
        }
        self.clamp_focus();
    }

    /// Space on the focused field: flip a checkbox, trigger a button, or
    /// advance a choice.
    pub fn toggle(&mut self) {
        let Some(field) = self.focused_field() else { return };

        match &field {
            FormField::TakesMedication => {
                let flag = !self.form.notes().takes_medication;
                self.form.edit_notes(NotesEdit::TakesMedication(flag));
            }
            FormField::HasIntolerances => {
                let flag = !self.form.notes().has_intolerances;
                self.form.edit_notes(NotesEdit::HasIntolerances(flag));
            }
            FormField::Consent(consent) => {
                let given = !self.form.payment().consent(*consent);
                self.form.edit_payment(PaymentEdit::Consent(*consent, given));
            }
            FormField::Day(row, key) => {
                self.form.edit_selection(*row, SelectionEdit::ToggleDay(key.clone()));
            }
            FormField::Sibling(row) => {
                let flag = !self.form.selections().get(*row).map(|s| s.sibling).unwrap_or(false);
                self.form.edit_selection(*row, SelectionEdit::Sibling(flag));
            }
            FormField::AddRow => self.add_selection(),
            _ if field.kind() == FieldKind::Choice => return self.cycle_choice(true),
            _ => {}
        }
        self.clamp_focus();
    }

    pub fn add_selection(&mut self) {
        if self.steps.current() != Step::Offerings {
            return;
        }
        if self.form.add_selection() {
            let row = self.form.selections().len() - 1;
            self.focus_field(&FormField::Offering(row));
            self.set_status("status.rowAdded");
        } else {
            self.set_status("status.rowLimit");
        }
    }

    /// Remove the selection row the focus is in.
    pub fn remove_focused_selection(&mut self) {
        let Some(row) = self.focused_field().and_then(|f| f.row()) else {
            return;
        };
        if self.form.remove_selection(row) {
            self.set_status("status.rowRemoved");
            self.clamp_focus();
        }
    }

    // ========================================================================
    // Steps
    // ========================================================================

    /// Enter: next step, or submit on the last one.
    pub fn next_step(&mut self) {
        if self.steps.current().is_last() {
            self.submit();
            return;
        }
        if self.steps.advance(&self.form) {
            self.focus = 0;
            self.status_message = None;
        } else {
            self.set_status("status.nextBlocked");
        }
    }

    pub fn prev_step(&mut self) {
        if self.steps.retreat() {
            self.focus = 0;
            self.status_message = None;
        }
    }

    pub fn submit(&mut self) {
        if !self.steps.ready_to_submit(&self.form) {
            self.set_status("status.nextBlocked");
            return;
        }

        let result = self
            .form
            .snapshot()
            .and_then(|snapshot| self.sink.submit(&snapshot));
        match result {
            Ok(confirmation) => {
                info!(reference = %confirmation.reference, "Booking submitted");
                self.confirmation = Some(confirmation);
                self.state = AppState::Submitted;
            }
            Err(e) => {
                warn!(error = %e, "Submission failed");
                self.status_message = Some(format!("{}: {}", self.t("status.submitFailed"), e));
            }
        }
    }

    // ========================================================================
    // Language
    // ========================================================================

    /// Switch to the next bundled language and remember the choice.
    pub fn cycle_language(&mut self) {
        let language = self.translations.language().next();
        self.translations.set_language(language);
        self.config.language = language;
        if let Err(e) = Config::save_language(language) {
            warn!(error = %e, "Failed to save language choice");
        }
        self.status_message = Some(format!("{}: {}", self.t("status.languageChanged"), language.label()));
    }

    // ========================================================================
    // Bank lookup
    // ========================================================================

    /// Start a lookup for the current IBAN, superseding any running one.
    fn on_iban_changed(&mut self) {
        let current = self.form.payment().iban.clone();
        if iban::validate(&current).is_err() {
            self.lookups.cancel();
            self.bank_line = BankLine::Empty;
            return;
        }

        let ticket = self.lookups.issue();
        self.bank_line = BankLine::Pending;
        let bank = self.bank.clone();
        let tx = self.background_tx.clone();

        tokio::spawn(async move {
            let info = bank.enrich(&current).await;
            if tx.send(BackgroundResult::Bank(ticket, info)).await.is_err() {
                debug!("Event loop gone, dropping bank lookup result");
            }
        });
    }

    /// Apply results of finished background tasks.
    pub fn check_background_tasks(&mut self) {
        let mut results = Vec::new();
        while let Ok(result) = self.background_rx.try_recv() {
            results.push(result);
        }

        for result in results {
            self.process_background_result(result);
        }
    }

    fn process_background_result(&mut self, result: BackgroundResult) {
        match result {
            BackgroundResult::Bank(ticket, info) => {
                if !self.lookups.is_current(ticket) {
                    debug!(?ticket, "Discarding stale bank lookup");
                    return;
                }
                self.bank_line = match info {
                    Some(info) => BankLine::Found(info),
                    None => BankLine::Empty,
                };
            }
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Check if a character should be accepted into a text field
pub fn can_add_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && !c.is_control()
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

/// Step through `options` with an unset state between the last and the
/// first option. An unknown current value restarts from the unset state.
fn cycle<T: Clone + PartialEq>(options: &[T], current: &Option<T>, forward: bool) -> Option<T> {
    let position = current.as_ref().and_then(|c| options.iter().position(|o| o == c));
    let next = match (position, forward) {
        (None, true) => 0,
        (None, false) => options.len().checked_sub(1)?,
        (Some(i), true) => i + 1,
        (Some(0), false) => return None,
        (Some(i), false) => i - 1,
    };
    options.get(next).cloned()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use carebook_core::models::{DayKey, PersonField, Weekday};
    use carebook_core::{FormSnapshot, SubmissionError};

    struct RecordingSink;

    impl BookingSink for RecordingSink {
        fn submit(&self, snapshot: &FormSnapshot) -> Result<BookingConfirmation, SubmissionError> {
            Ok(BookingConfirmation {
                reference: format!("TEST-{}", snapshot.selections.len()),
                location: None,
            })
        }
    }

    fn app_with(config: Config) -> App {
        let bank = BankLookupClient::new("http://127.0.0.1:9", Duration::from_secs(1)).unwrap();
        App::with_parts(config, Catalog::bundled().unwrap(), bank, Box::new(RecordingSink))
    }

    fn app() -> App {
        app_with(Config::default())
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.input_char(c);
        }
    }

    // -------------------------------------------------------------------------
    // Helpers
    // -------------------------------------------------------------------------

    #[test]
    fn test_cycle_options() {
        let options = ["a", "b"];
        assert_eq!(cycle(&options, &None, true), Some("a"));
        assert_eq!(cycle(&options, &Some("a"), true), Some("b"));
        assert_eq!(cycle(&options, &Some("b"), true), None);
        assert_eq!(cycle(&options, &None, false), Some("b"));
        assert_eq!(cycle(&options, &Some("a"), false), None);
        assert_eq!(cycle(&options, &Some("x"), true), Some("a"));
        assert_eq!(cycle::<&str>(&[], &None, false), None);
    }

    #[test]
    fn test_can_add_char() {
        assert!(can_add_char(0, 'a'));
        assert!(can_add_char(MAX_FIELD_LENGTH - 1, 'ß'));
        assert!(!can_add_char(MAX_FIELD_LENGTH, 'a'));
        assert!(!can_add_char(0, '\n'));
    }

    // -------------------------------------------------------------------------
    // Editing
    // -------------------------------------------------------------------------

    #[test]
    fn test_typing_into_focused_field() {
        let mut app = app();
        app.focus_next();
        assert_eq!(app.focused_field(), Some(FormField::PersonText(PersonField::FirstName)));

        type_text(&mut app, "Anna");
        app.backspace();
        assert_eq!(app.form.person().first_name, "Ann");
    }

    #[test]
    fn test_typing_into_choice_is_ignored() {
        let mut app = app();
        type_text(&mut app, "Herr");
        assert_eq!(app.form.person().salutation, None);

        app.cycle_choice(true);
        assert_eq!(app.form.person().salutation, Some(Salutation::Mr));
    }

    #[test]
    fn test_focus_wraps() {
        let mut app = app();
        app.focus_prev();
        assert_eq!(app.focused_field(), Some(FormField::PersonText(PersonField::Email)));
        app.focus_next();
        assert_eq!(app.focus, 0);
    }

    #[test]
    fn test_next_blocked_on_incomplete_step() {
        let mut app = app();
        app.next_step();
        assert_eq!(app.steps.current(), Step::Person);
        assert!(app.status_message.is_some());
    }

    #[test]
    fn test_school_and_class_choices() {
        let mut app = app_with(Config {
            test_mode: true,
            ..Config::default()
        });
        app.next_step();
        assert_eq!(app.steps.current(), Step::Child);

        app.focus_field(&FormField::School);
        app.cycle_choice(true);
        assert_eq!(app.form.child().school, "Grundschule Am Stadtsee");

        app.focus_field(&FormField::Class);
        app.cycle_choice(false);
        assert_eq!(app.form.child().class, "4b");

        app.focus_field(&FormField::School);
        app.cycle_choice(true);
        assert_eq!(app.form.child().school, "Grundschule Reute");
        assert_eq!(app.form.child().class, "");
    }

    #[test]
    fn test_offering_step_rows() {
        let mut app = app_with(Config {
            test_mode: true,
            ..Config::default()
        });
        app.form.edit_child(ChildEdit::Text(ChildField::School, "Grundschule Reute".to_string()));
        for _ in 0..4 {
            app.next_step();
        }
        assert_eq!(app.steps.current(), Step::Offerings);

        app.cycle_choice(true);
        assert_eq!(app.form.selections()[0].offering, "Kernzeitbetreuung");

        app.focus_field(&FormField::Day(0, DayKey::Day(Weekday::Tuesday)));
        app.toggle();
        assert_eq!(app.form.selections()[0].days, vec![DayKey::Day(Weekday::Tuesday)]);

        app.add_selection();
        assert_eq!(app.form.selections().len(), 2);
        assert_eq!(app.focused_field(), Some(FormField::Offering(1)));

        app.add_selection();
        assert_eq!(app.form.selections().len(), 2);

        app.remove_focused_selection();
        assert_eq!(app.form.selections().len(), 1);
    }

    #[test]
    fn test_submit_from_last_step() {
        let mut app = app_with(Config {
            test_mode: true,
            ..Config::default()
        });
        for _ in 0..4 {
            app.next_step();
        }
        app.next_step();
        assert_eq!(app.state, AppState::Submitted);
        assert_eq!(app.confirmation.as_ref().map(|c| c.reference.as_str()), Some("TEST-1"));
    }

    // -------------------------------------------------------------------------
    // Bank lookup
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_iban_edit_starts_lookup() {
        let mut app = app();
        app.set_text(&FormField::Iban, "de89 3704 0044 0532 0130 0".to_string());
        assert_eq!(app.bank_line, BankLine::Empty);

        app.set_text(&FormField::Iban, "de89 3704 0044 0532 0130 00".to_string());
        assert_eq!(app.form.payment().iban, "DE89 3704 0044 0532 0130 00");
        assert_eq!(app.bank_line, BankLine::Pending);

        app.set_text(&FormField::Iban, String::new());
        assert_eq!(app.bank_line, BankLine::Empty);
    }

    #[tokio::test]
    async fn test_stale_lookup_result_is_discarded() {
        let mut app = app();
        let stale = app.lookups.issue();
        let current = app.lookups.issue();
        app.bank_line = BankLine::Pending;

        let info = BankInfo {
            name: Some("Alte Bank".to_string()),
            bic: None,
        };
        app.process_background_result(BackgroundResult::Bank(stale, Some(info)));
        assert_eq!(app.bank_line, BankLine::Pending);

        let info = BankInfo {
            name: Some("Commerzbank".to_string()),
            bic: Some("COBADEFFXXX".to_string()),
        };
        app.process_background_result(BackgroundResult::Bank(current, Some(info.clone())));
        assert_eq!(app.bank_line, BankLine::Found(info));
    }

    #[tokio::test]
    async fn test_results_arrive_through_channel() {
        let mut app = app();
        let ticket = app.lookups.issue();
        app.background_tx
            .send(BackgroundResult::Bank(ticket, None))
            .await
            .unwrap();
        app.bank_line = BankLine::Pending;

        app.check_background_tasks();
        assert_eq!(app.bank_line, BankLine::Empty);
    }
}
