//! SEPA direct-debit mandate and the consents required with it.

use serde::{Deserialize, Serialize};

use crate::iban::{self, IbanError};

/// Consent checkboxes on the payment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Consent {
    TermsOfUse,
    PrivacyNotice,
    SepaMandate,
}

impl Consent {
    pub const ALL: [Consent; 3] = [Consent::TermsOfUse, Consent::PrivacyNotice, Consent::SepaMandate];

    pub fn label_key(&self) -> &'static str {
        match self {
            Consent::TermsOfUse => "sepa.terms",
            Consent::PrivacyNotice => "sepa.privacy",
            Consent::SepaMandate => "sepa.mandate",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEdit {
    Consent(Consent, bool),
    AccountHolder(String),
    /// Raw IBAN input; stored normalized.
    Iban(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Payment {
    pub accepts_terms: bool,
    pub accepts_privacy: bool,
    pub authorizes_mandate: bool,
    pub account_holder: String,
    /// Normalized IBAN (upper case, grouped by four).
    pub iban: String,
}

impl Payment {
    pub fn apply(mut self, edit: PaymentEdit) -> Self {
        match edit {
            PaymentEdit::Consent(consent, value) => *self.consent_mut(consent) = value,
            PaymentEdit::AccountHolder(value) => self.account_holder = value,
            PaymentEdit::Iban(raw) => self.iban = iban::normalize(&raw),
        }
        self
    }

    pub fn consent(&self, consent: Consent) -> bool {
        match consent {
            Consent::TermsOfUse => self.accepts_terms,
            Consent::PrivacyNotice => self.accepts_privacy,
            Consent::SepaMandate => self.authorizes_mandate,
        }
    }

    fn consent_mut(&mut self, consent: Consent) -> &mut bool {
        match consent {
            Consent::TermsOfUse => &mut self.accepts_terms,
            Consent::PrivacyNotice => &mut self.accepts_privacy,
            Consent::SepaMandate => &mut self.authorizes_mandate,
        }
    }

    pub fn all_consents_given(&self) -> bool {
        Consent::ALL.iter().all(|c| self.consent(*c))
    }

    /// Structural error for the entered IBAN, if any. An empty field has no
    /// error to show; it is only reported as missing.
    pub fn iban_error(&self) -> Option<IbanError> {
        if self.iban.is_empty() {
            return None;
        }
        iban::validate(&self.iban).err()
    }
}
