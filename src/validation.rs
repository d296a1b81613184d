use std::collections::BTreeMap;

use reqwest::Url;
use serde::Serialize;

use crate::error::AppError;

/// ValidationErrors
///
/// Accumulates per-field messages for a request payload. Serializes as a plain
/// `{field: [message, ...]}` map.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<&'static str, Vec<String>>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn messages(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.entry(field).or_default().push(message.into());
    }

    /// Required text: non-blank and at most `max` characters (when bounded).
    pub fn text(&mut self, field: &'static str, value: &str, max: Option<usize>) {
        if value.trim().is_empty() {
            self.add(field, "This field may not be blank.");
            return;
        }
        if let Some(max) = max {
            self.max_len(field, value, max);
        }
    }

    /// Patch variant of [`ValidationErrors::text`]: only checks supplied values.
    pub fn text_opt(&mut self, field: &'static str, value: Option<&str>, max: Option<usize>) {
        if let Some(value) = value {
            self.text(field, value, max);
        }
    }

    pub fn max_len(&mut self, field: &'static str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.add(
                field,
                format!("Ensure this field has no more than {max} characters."),
            );
        }
    }

    /// Optional URL: empty strings are accepted, anything else must be absolute http(s).
    pub fn url(&mut self, field: &'static str, value: Option<&str>) {
        let Some(value) = value.filter(|v| !v.is_empty()) else {
            return;
        };
        let valid = Url::parse(value)
            .map(|url| matches!(url.scheme(), "http" | "https") && url.host().is_some())
            .unwrap_or(false);
        if !valid {
            self.add(field, "Enter a valid URL.");
        }
    }

    pub fn email(&mut self, field: &'static str, value: &str) {
        let valid = match value.rsplit_once('@') {
            Some((local, domain)) => {
                !local.is_empty()
                    && !local.contains(char::is_whitespace)
                    && domain.contains('.')
                    && !domain.starts_with('.')
                    && !domain.ends_with('.')
                    && !domain.contains(char::is_whitespace)
            }
            None => false,
        };
        if !valid {
            self.add(field, "Enter a valid email address.");
        } else {
            self.max_len(field, value, 254);
        }
    }

    pub fn into_result(self) -> Result<(), AppError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(AppError::Validation(self))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected_before_length() {
        let mut errors = ValidationErrors::new();
        errors.text("title", "   ", Some(3));
        assert_eq!(
            errors.messages("title").unwrap(),
            ["This field may not be blank.".to_string()]
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let mut errors = ValidationErrors::new();
        errors.text("label", "héllo", Some(5));
        assert!(errors.is_empty());
        errors.text("label", "héllo!", Some(5));
        assert!(errors.messages("label").is_some());
    }

    #[test]
    fn url_accepts_empty_and_rejects_relative() {
        let mut errors = ValidationErrors::new();
        errors.url("link", Some(""));
        errors.url("link", None);
        errors.url("link", Some("https://example.com/a"));
        assert!(errors.is_empty());

        errors.url("link", Some("/placeholder.svg"));
        assert_eq!(errors.messages("link").unwrap().len(), 1);
    }

    #[test]
    fn email_shape() {
        let mut errors = ValidationErrors::new();
        errors.email("email", "hello@yourteam.com");
        assert!(errors.is_empty());
        errors.email("email", "not-an-email");
        errors.email("email", "a@b");
        assert_eq!(errors.messages("email").unwrap().len(), 2);
    }

    #[test]
    fn serializes_as_field_map() {
        let mut errors = ValidationErrors::new();
        errors.add("title", "This field may not be blank.");
        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(json["title"][0], "This field may not be blank.");
    }
}
