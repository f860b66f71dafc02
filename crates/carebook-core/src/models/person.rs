//! The registering person and the child being enrolled.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Wire format for the birth date field.
const BIRTH_DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Person
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum Salutation {
    #[serde(rename = "Herr")]
    Mr,
    #[serde(rename = "Frau")]
    Mrs,
    #[serde(rename = "Divers")]
    Diverse,
}

impl Salutation {
    pub const ALL: [Salutation; 3] = [Salutation::Mr, Salutation::Mrs, Salutation::Diverse];

    pub fn label_key(&self) -> &'static str {
        match self {
            Salutation::Mr => "person.salutationMr",
            Salutation::Mrs => "person.salutationMrs",
            Salutation::Diverse => "person.salutationDiverse",
        }
    }
}

/// Free-text fields of [`Person`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersonField {
    FirstName,
    LastName,
    PostalCode,
    City,
    Street,
    Phone,
    Email,
}

impl PersonField {
    pub const ALL: [PersonField; 7] = [
        PersonField::FirstName,
        PersonField::LastName,
        PersonField::PostalCode,
        PersonField::City,
        PersonField::Street,
        PersonField::Phone,
        PersonField::Email,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            PersonField::FirstName => "person.firstName",
            PersonField::LastName => "person.lastName",
            PersonField::PostalCode => "person.postalCode",
            PersonField::City => "person.city",
            PersonField::Street => "person.street",
            PersonField::Phone => "person.phone",
            PersonField::Email => "person.email",
        }
    }
}

/// A single edit of the person record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonEdit {
    Salutation(Option<Salutation>),
    Text(PersonField, String),
}

/// The person registering the child (parent or guardian).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Person {
    pub salutation: Option<Salutation>,
    pub first_name: String,
    pub last_name: String,
    pub postal_code: String,
    pub city: String,
    pub street: String,
    pub phone: String,
    pub email: String,
}

impl Person {
    /// Apply an edit, returning the updated record.
    pub fn apply(mut self, edit: PersonEdit) -> Self {
        match edit {
            PersonEdit::Salutation(salutation) => self.salutation = salutation,
            PersonEdit::Text(field, value) => *self.text_mut(field) = value,
        }
        self
    }

    pub fn text(&self, field: PersonField) -> &str {
        match field {
            PersonField::FirstName => &self.first_name,
            PersonField::LastName => &self.last_name,
            PersonField::PostalCode => &self.postal_code,
            PersonField::City => &self.city,
            PersonField::Street => &self.street,
            PersonField::Phone => &self.phone,
            PersonField::Email => &self.email,
        }
    }

    fn text_mut(&mut self, field: PersonField) -> &mut String {
        match field {
            PersonField::FirstName => &mut self.first_name,
            PersonField::LastName => &mut self.last_name,
            PersonField::PostalCode => &mut self.postal_code,
            PersonField::City => &mut self.city,
            PersonField::Street => &mut self.street,
            PersonField::Phone => &mut self.phone,
            PersonField::Email => &mut self.email,
        }
    }

    /// Full name for display, e.g. in the summary line.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name.trim(), self.last_name.trim())
            .trim()
            .to_string()
    }
}

// ============================================================================
// Child
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub enum Gender {
    #[serde(rename = "männlich")]
    Male,
    #[serde(rename = "weiblich")]
    Female,
    #[serde(rename = "divers")]
    Diverse,
    #[serde(rename = "ohne Angabe")]
    Unspecified,
}

impl Gender {
    pub const ALL: [Gender; 4] = [Gender::Male, Gender::Female, Gender::Diverse, Gender::Unspecified];

    pub fn label_key(&self) -> &'static str {
        match self {
            Gender::Male => "child.genderMale",
            Gender::Female => "child.genderFemale",
            Gender::Diverse => "child.genderDiverse",
            Gender::Unspecified => "child.genderUnspecified",
        }
    }
}

/// Free-text fields of [`Child`]. School and class are text as well; the
/// catalog decides which values are acceptable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildField {
    FirstName,
    LastName,
    BirthDate,
    School,
    Class,
}

impl ChildField {
    pub const ALL: [ChildField; 5] = [
        ChildField::FirstName,
        ChildField::LastName,
        ChildField::BirthDate,
        ChildField::School,
        ChildField::Class,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            ChildField::FirstName => "child.firstName",
            ChildField::LastName => "child.lastName",
            ChildField::BirthDate => "child.birthDate",
            ChildField::School => "child.school",
            ChildField::Class => "child.class",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChildEdit {
    Gender(Option<Gender>),
    Text(ChildField, String),
}

/// The child being enrolled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
pub struct Child {
    pub first_name: String,
    pub last_name: String,
    /// ISO calendar date (`YYYY-MM-DD`) as entered, or empty.
    pub birth_date: String,
    pub gender: Option<Gender>,
    pub school: String,
    pub class: String,
}

impl Child {
    pub fn apply(mut self, edit: ChildEdit) -> Self {
        match edit {
            ChildEdit::Gender(gender) => self.gender = gender,
            ChildEdit::Text(field, value) => *self.text_mut(field) = value,
        }
        self
    }

    pub fn text(&self, field: ChildField) -> &str {
        match field {
            ChildField::FirstName => &self.first_name,
            ChildField::LastName => &self.last_name,
            ChildField::BirthDate => &self.birth_date,
            ChildField::School => &self.school,
            ChildField::Class => &self.class,
        }
    }

    fn text_mut(&mut self, field: ChildField) -> &mut String {
        match field {
            ChildField::FirstName => &mut self.first_name,
            ChildField::LastName => &mut self.last_name,
            ChildField::BirthDate => &mut self.birth_date,
            ChildField::School => &mut self.school,
            ChildField::Class => &mut self.class,
        }
    }

    /// Parsed birth date, if the entered text is a valid ISO date.
    pub fn birth_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.birth_date.trim(), BIRTH_DATE_FORMAT).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_apply_text() {
        let person = Person::default()
            .apply(PersonEdit::Text(PersonField::FirstName, "Anna".to_string()))
            .apply(PersonEdit::Text(PersonField::City, "Bad Waldsee".to_string()));
        assert_eq!(person.first_name, "Anna");
        assert_eq!(person.text(PersonField::City), "Bad Waldsee");
        assert_eq!(person.last_name, "");
    }

    #[test]
    fn test_person_apply_salutation() {
        let person = Person::default().apply(PersonEdit::Salutation(Some(Salutation::Mrs)));
        assert_eq!(person.salutation, Some(Salutation::Mrs));
        let person = person.apply(PersonEdit::Salutation(None));
        assert_eq!(person.salutation, None);
    }

    #[test]
    fn test_person_full_name() {
        let person = Person {
            first_name: " Anna ".to_string(),
            last_name: "Maier".to_string(),
            ..Default::default()
        };
        assert_eq!(person.full_name(), "Anna Maier");
        assert_eq!(Person::default().full_name(), "");
    }

    #[test]
    fn test_salutation_wire_values() {
        assert_eq!(serde_json::to_string(&Salutation::Mr).unwrap(), "\"Herr\"");
        assert_eq!(serde_json::to_string(&Salutation::Diverse).unwrap(), "\"Divers\"");
    }

    #[test]
    fn test_child_birth_date_parsing() {
        let mut child = Child::default();
        assert_eq!(child.birth_date(), None);

        child = child.apply(ChildEdit::Text(ChildField::BirthDate, "2017-04-23".to_string()));
        assert_eq!(child.birth_date(), NaiveDate::from_ymd_opt(2017, 4, 23));

        child = child.apply(ChildEdit::Text(ChildField::BirthDate, "23.04.2017".to_string()));
        assert_eq!(child.birth_date(), None);
    }

    #[test]
    fn test_gender_wire_values() {
        assert_eq!(serde_json::to_string(&Gender::Unspecified).unwrap(), "\"ohne Angabe\"");
        let parsed: Gender = serde_json::from_str("\"weiblich\"").unwrap();
        assert_eq!(parsed, Gender::Female);
    }
}
