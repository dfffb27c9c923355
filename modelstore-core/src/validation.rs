//! Field validation for models.
//!
//! Constraint checking is delegated to the `validator` crate; this module turns
//! its errors into flat [`FieldError`]s and, optionally, localizes them with a
//! [`MessageCatalog`].
//!
//! ```ignore
//! use validator::Validate;
//!
//! #[derive(Validate)]
//! struct Signup {
//!     #[validate(length(min = 3))]
//!     name: String,
//! }
//!
//! let errors = modelstore::validation::validate(&Signup { name: "x".into() });
//! assert_eq!(errors[0].field, "name");
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use validator::{Validate, ValidationError, ValidationErrors};

/// A single field constraint violation.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field: field.into(), message: message.into() }
    }
}

/// Localized validation messages for one language.
///
/// Entries are keyed either by a validation code (`length`, `email`, ...),
/// whose value is a message template, or by a field name, whose value is the
/// field's display name. Templates use `%s` placeholders: the first receives
/// the display name, the second the rule's parameter (`min`, `max`, ...).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MessageCatalog {
    messages: HashMap<String, String>,
}

impl MessageCatalog {
    const PLACEHOLDER: &'static str = "%s";

    pub fn new(messages: HashMap<String, String>) -> Self {
        Self { messages }
    }

    /// Picks `language`'s table out of a per-language translation map.
    ///
    /// An unknown language yields an empty catalog.
    pub fn for_language(translations: &HashMap<String, HashMap<String, String>>, language: &str) -> Self {
        Self::new(translations.get(language).cloned().unwrap_or_default())
    }

    /// Display name for `field`, the field name itself when untranslated.
    pub fn field_name<'a>(&'a self, field: &'a str) -> &'a str {
        match self.messages.get(field) {
            Some(name) if !name.is_empty() => name.as_str(),
            _ => field,
        }
    }

    /// Renders the message for `code` on `field`.
    ///
    /// Returns `None` when no template exists for `code`, or when the template
    /// asks for more placeholders than there are arguments.
    pub fn render(&self, code: &str, field: &str, param: &str) -> Option<String> {
        let template = self.messages.get(code).filter(|t| !t.is_empty())?;

        let args = [self.field_name(field), param];
        let mut pieces = template.split(Self::PLACEHOLDER);
        let mut rendered = pieces.next().unwrap_or_default().to_string();

        for (index, piece) in pieces.enumerate() {
            rendered.push_str(args.get(index)?);
            rendered.push_str(piece);
        }

        Some(rendered)
    }
}

/// Validates `value`, returning one [`FieldError`] per violation.
pub fn validate<V: Validate>(value: &V) -> Vec<FieldError> {
    match value.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => field_errors(&errors, None),
    }
}

/// Validates `value`, localizing messages through `catalog`.
pub fn validate_with<V: Validate>(value: &V, catalog: &MessageCatalog) -> Vec<FieldError> {
    match value.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => field_errors(&errors, Some(catalog)),
    }
}

/// Flattens `validator` errors, sorted by field name.
pub fn field_errors(errors: &ValidationErrors, catalog: Option<&MessageCatalog>) -> Vec<FieldError> {
    let mut result = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        let field = field.to_string();

        for error in field_errors.iter() {
            let message = catalog
                .and_then(|catalog| catalog.render(&error.code, &field, &rule_param(error)))
                .unwrap_or_else(|| default_message(&field, error));

            result.push(FieldError::new(field.clone(), message));
        }
    }

    result.sort_by(|a, b| a.field.cmp(&b.field));
    result
}

fn default_message(field: &str, error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("Validation failed for field '{field}'"))
}

/// The bound a rule was checked against, as text.
fn rule_param(error: &ValidationError) -> String {
    ["min", "max", "equal", "other"]
        .iter()
        .find_map(|key| error.params.get(*key))
        .map(|value| match value {
            serde_json::Value::String(text) => text.clone(),
            other => other.to_string(),
        })
        .unwrap_or_default()
}
