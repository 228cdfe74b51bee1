//! Validation-rule glue: rule parameters in, field message out.
//!
//! A rule is written the way form validators usually spell it,
//! `usercheck:block_disposable,block_no_mx,domain_only`, or as the bare
//! parameter list.

use std::convert::Infallible;
use std::str::FromStr;

use serde_json::Value;

use crate::client::{ClientError, Transport, UserCheckClient};
use crate::messages::{self, MessageCatalog};
use crate::policy::BlockOptions;

pub const RULE_NAME: &str = "usercheck";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserCheckRule {
    options: BlockOptions,
}

impl UserCheckRule {
    pub fn new(options: BlockOptions) -> Self {
        Self { options }
    }

    /// Builds the rule from its parameters. Unknown parameters are ignored.
    pub fn from_params<I, S>(params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut options = BlockOptions::default();
        for param in params {
            let param = param.as_ref().trim();
            if param.is_empty() {
                continue;
            }
            if !options.enable(param) {
                #[cfg(feature = "with-tracing")]
                tracing::warn!(parameter = param, "ignoring unknown usercheck rule parameter");
            }
        }
        Self { options }
    }

    pub fn options(&self) -> &BlockOptions {
        &self.options
    }

    /// Runs the check for `attribute`.
    ///
    /// `Ok(None)` means the value passes, `Ok(Some(message))` carries the
    /// rendered failure message. API and transport failures are returned as
    /// errors and must not be shown as a field message.
    pub fn validate<T: Transport>(
        &self,
        client: &UserCheckClient<T>,
        catalog: &MessageCatalog,
        attribute: &str,
        value: &str,
    ) -> Result<Option<String>, ClientError> {
        let outcome = client.validate(value, &self.options)?;
        Ok(outcome
            .error_code()
            .map(|code| catalog.for_error_code(code, attribute)))
    }

    /// Same as [`validate`](Self::validate) for an untyped form value. Anything
    /// but a string fails with the generic message without calling the API.
    pub fn validate_value<T: Transport>(
        &self,
        client: &UserCheckClient<T>,
        catalog: &MessageCatalog,
        attribute: &str,
        value: &Value,
    ) -> Result<Option<String>, ClientError> {
        match value {
            Value::String(s) => self.validate(client, catalog, attribute, s),
            _ => Ok(Some(catalog.render(messages::DEFAULT, attribute))),
        }
    }
}

impl FromStr for UserCheckRule {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let params = match s.split_once(':') {
            Some((name, params)) if name.trim() == RULE_NAME => params,
            _ if s == RULE_NAME => "",
            _ => s,
        };
        Ok(Self::from_params(params.split(',')))
    }
}
