//! User-facing messages for failed checks.
//!
//! Templates are keyed by stable identifiers and use `:attribute` as the
//! placeholder for the field name. [`MessageCatalog::english`] ships the
//! default wording; callers can override or translate any key.

use std::collections::HashMap;

use crate::policy::ErrorCode;

pub const DEFAULT: &str = "usercheck";
pub const DISPOSABLE: &str = "usercheck_disposable";
pub const NO_MX: &str = "usercheck_no_mx";
pub const PUBLIC_DOMAIN: &str = "usercheck_public_domain";
pub const BLOCKLISTED: &str = "usercheck_blocklisted";
pub const RELAY_DOMAIN: &str = "usercheck_relay_domain";
pub const SPAM: &str = "usercheck_spam";
pub const VALIDATION_FAILED: &str = "validation_failed";

const PLACEHOLDER: &str = ":attribute";

const ENGLISH: [(&str, &str); 7] = [
    (DEFAULT, "The :attribute is invalid."),
    (
        DISPOSABLE,
        "The :attribute is invalid because it is a disposable email address.",
    ),
    (
        NO_MX,
        "The :attribute is invalid because it has no MX records.",
    ),
    (
        PUBLIC_DOMAIN,
        "The :attribute is invalid because it is from a public email domain.",
    ),
    (VALIDATION_FAILED, "Unable to validate the :attribute"),
    (
        BLOCKLISTED,
        "The :attribute is invalid because it is from a blocklisted domain.",
    ),
    (
        RELAY_DOMAIN,
        "The :attribute is invalid because it is from an email forwarding service.",
    ),
];

/// Template key used for an error code.
pub fn key_for(code: ErrorCode) -> &'static str {
    match code {
        ErrorCode::Malformed => DEFAULT,
        ErrorCode::Disposable => DISPOSABLE,
        ErrorCode::NoMx => NO_MX,
        ErrorCode::PublicDomain => PUBLIC_DOMAIN,
        ErrorCode::Blocklisted => BLOCKLISTED,
        ErrorCode::RelayDomain => RELAY_DOMAIN,
        ErrorCode::Spam => SPAM,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageCatalog {
    templates: HashMap<String, String>,
}

impl MessageCatalog {
    /// Catalogue vide : toute clé rend le texte "validation_failed" intégré.
    pub fn empty() -> Self {
        Self {
            templates: HashMap::new(),
        }
    }

    pub fn english() -> Self {
        ENGLISH
            .into_iter()
            .fold(Self::empty(), |catalog, (key, template)| {
                catalog.with_template(key, template)
            })
    }

    pub fn with_template(mut self, key: impl Into<String>, template: impl Into<String>) -> Self {
        self.templates.insert(key.into(), template.into());
        self
    }

    pub fn template(&self, key: &str) -> Option<&str> {
        self.templates.get(key).map(String::as_str)
    }

    /// Renders `key` for `attribute`. Keys without a template (`usercheck_spam`
    /// in the English catalog) fall back to the `validation_failed` template.
    pub fn render(&self, key: &str, attribute: &str) -> String {
        let template = self
            .template(key)
            .or_else(|| self.template(VALIDATION_FAILED))
            .unwrap_or("Unable to validate the :attribute");
        template.replace(PLACEHOLDER, attribute)
    }

    pub fn for_error_code(&self, code: ErrorCode, attribute: &str) -> String {
        self.render(key_for(code), attribute)
    }
}

impl Default for MessageCatalog {
    fn default() -> Self {
        Self::english()
    }
}
