use std::collections::BTreeMap;

use chrono::NaiveDate;
use thiserror::Error;
use validator::{ValidateEmail, ValidateLength};

/// Raw form values keyed by field name, as typed by the user.
pub type FormData = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("this field is required")]
    Required,

    #[error("must have at least {0} characters")]
    TooShort(usize),

    #[error("must have at most {0} characters")]
    TooLong(usize),

    #[error("must be a valid e-mail address")]
    Email,

    #[error("must be a date in YYYY-MM-DD format")]
    Date,

    #[error("must have exactly {0} digits")]
    Digits(usize),

    #[error("must be one of: {}", .0.join(", "))]
    OneOf(Vec<&'static str>),
}

/// Field-level validation failures, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: BTreeMap<String, FieldError>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, field: &str) -> Option<&FieldError> {
        self.fields.get(field)
    }

    pub fn insert(&mut self, field: impl Into<String>, error: FieldError) {
        self.fields.entry(field.into()).or_insert(error);
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn messages(&self) -> Vec<String> {
        self.fields
            .iter()
            .map(|(field, error)| format!("{field}: {error}"))
            .collect()
    }
}

/// Validates the named subset of a form.
pub trait Schema {
    fn validate(&self, fields: &[&str], values: &FormData) -> ValidationErrors;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Required,
    MinLength(usize),
    MaxLength(usize),
    Email,
    Date,
    Digits(usize),
    OneOf(&'static [&'static str]),
}

impl Rule {
    /// Checks a present, non-empty value. Emptiness is handled by `Required`.
    fn check(&self, value: &str) -> Result<(), FieldError> {
        match self {
            Rule::Required => Ok(()),
            Rule::MinLength(min) => {
                if value.validate_length(Some(*min as u64), None, None) {
                    Ok(())
                } else {
                    Err(FieldError::TooShort(*min))
                }
            }
            Rule::MaxLength(max) => {
                if value.validate_length(None, Some(*max as u64), None) {
                    Ok(())
                } else {
                    Err(FieldError::TooLong(*max))
                }
            }
            Rule::Email => {
                if value.validate_email() {
                    Ok(())
                } else {
                    Err(FieldError::Email)
                }
            }
            Rule::Date => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map(|_| ())
                .map_err(|_| FieldError::Date),
            Rule::Digits(len) => {
                let digits: String = value.chars().filter(char::is_ascii_digit).collect();
                let only_punctuation = value
                    .chars()
                    .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '/' | ' ' | '(' | ')'));
                if digits.len() == *len && only_punctuation {
                    Ok(())
                } else {
                    Err(FieldError::Digits(*len))
                }
            }
            Rule::OneOf(options) => {
                if options.iter().any(|option| *option == value) {
                    Ok(())
                } else {
                    Err(FieldError::OneOf(options.to_vec()))
                }
            }
        }
    }
}

/// A declarative schema: each field maps to the rules it must satisfy.
///
/// Fields without rules always pass. Optional fields (no `Required` rule)
/// are only checked when a non-blank value is present.
#[derive(Debug, Clone, Default)]
pub struct FieldSchema {
    rules: BTreeMap<String, Vec<Rule>>,
}

impl FieldSchema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, name: &str, rules: Vec<Rule>) -> Self {
        self.rules.insert(name.to_string(), rules);
        self
    }
}

impl Schema for FieldSchema {
    fn validate(&self, fields: &[&str], values: &FormData) -> ValidationErrors {
        let mut errors = ValidationErrors::default();

        for field in fields {
            let Some(rules) = self.rules.get(*field) else {
                continue;
            };
            let value = values.get(*field).map(|v| v.trim()).unwrap_or("");

            if value.is_empty() {
                if rules.contains(&Rule::Required) {
                    errors.insert(*field, FieldError::Required);
                }
                continue;
            }

            if let Some(error) = rules.iter().find_map(|rule| rule.check(value).err()) {
                errors.insert(*field, error);
            }
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(pairs: &[(&str, &str)]) -> FormData {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn schema() -> FieldSchema {
        FieldSchema::new()
            .field("name", vec![Rule::Required, Rule::MinLength(3)])
            .field("email", vec![Rule::Email])
            .field("birth_date", vec![Rule::Required, Rule::Date])
            .field("cpf", vec![Rule::Required, Rule::Digits(11)])
            .field("gender", vec![Rule::OneOf(&["Feminino", "Masculino", "Outro"])])
    }

    #[test]
    fn required_fields_must_be_present() {
        let errors = schema().validate(&["name", "birth_date"], &form(&[("name", "   ")]));
        assert_eq!(errors.get("name"), Some(&FieldError::Required));
        assert_eq!(errors.get("birth_date"), Some(&FieldError::Required));
    }

    #[test]
    fn optional_fields_pass_when_blank() {
        let errors = schema().validate(&["email", "gender"], &form(&[]));
        assert!(errors.is_empty());
    }

    #[test]
    fn only_requested_fields_are_checked() {
        let errors = schema().validate(&["name"], &form(&[("name", "Ana"), ("email", "bad")]));
        assert!(errors.is_empty());
    }

    #[test]
    fn reports_first_failing_rule() {
        let values = form(&[
            ("name", "Al"),
            ("email", "ana@"),
            ("birth_date", "15/06/2000"),
            ("cpf", "123.456.789-0"),
            ("gender", "x"),
        ]);
        let errors = schema().validate(&["name", "email", "birth_date", "cpf", "gender"], &values);
        assert_eq!(errors.len(), 5);
        assert_eq!(errors.get("name"), Some(&FieldError::TooShort(3)));
        assert_eq!(errors.get("email"), Some(&FieldError::Email));
        assert_eq!(errors.get("birth_date"), Some(&FieldError::Date));
        assert_eq!(errors.get("cpf"), Some(&FieldError::Digits(11)));
        assert_eq!(
            errors.messages().last().map(String::as_str),
            Some("name: must have at least 3 characters")
        );
    }

    #[test]
    fn accepts_well_formed_values() {
        let values = form(&[
            ("name", "Ana Souza"),
            ("email", "ana@example.org"),
            ("birth_date", "2000-06-15"),
            ("cpf", "123.456.789-09"),
            ("gender", "Feminino"),
        ]);
        let errors = schema().validate(&["name", "email", "birth_date", "cpf", "gender"], &values);
        assert!(errors.is_empty(), "{:?}", errors.messages());
    }

    #[test]
    fn rejects_malformed_email_domains() {
        for email in ["ana@exemplo..org", "ana souza@exemplo.org", "@exemplo.org"] {
            let errors = schema().validate(&["email"], &form(&[("email", email)]));
            assert_eq!(errors.get("email"), Some(&FieldError::Email), "{email}");
        }
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let schema = FieldSchema::new().field("name", vec![Rule::MinLength(3), Rule::MaxLength(4)]);
        assert!(schema.validate(&["name"], &form(&[("name", "Zoé")])).is_empty());
        assert_eq!(
            schema.validate(&["name"], &form(&[("name", "Joãozinho")])).get("name"),
            Some(&FieldError::TooLong(4))
        );
    }

    #[test]
    fn one_of_message_lists_options() {
        let error = FieldError::OneOf(vec!["a", "b"]);
        assert_eq!(error.to_string(), "must be one of: a, b");
    }
}
