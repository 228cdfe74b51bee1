use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Risk categories the caller wants to reject, plus the `domain_only` mode.
///
/// Tout est désactivé par défaut : sans option, toute valeur bien formée
/// pour l'API est acceptée.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockOptions {
    pub block_disposable: bool,
    pub block_no_mx: bool,
    pub block_public_domain: bool,
    pub block_blocklisted: bool,
    pub block_relay_domain: bool,
    pub block_spam: bool,
    pub domain_only: bool,
}

impl BlockOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// toutes les options block_* actives, `domain_only` inchangé (false)
    pub fn all() -> Self {
        Self {
            block_disposable: true,
            block_no_mx: true,
            block_public_domain: true,
            block_blocklisted: true,
            block_relay_domain: true,
            block_spam: true,
            domain_only: false,
        }
    }

    pub fn block_disposable(mut self, value: bool) -> Self {
        self.block_disposable = value;
        self
    }

    pub fn block_no_mx(mut self, value: bool) -> Self {
        self.block_no_mx = value;
        self
    }

    pub fn block_public_domain(mut self, value: bool) -> Self {
        self.block_public_domain = value;
        self
    }

    pub fn block_blocklisted(mut self, value: bool) -> Self {
        self.block_blocklisted = value;
        self
    }

    pub fn block_relay_domain(mut self, value: bool) -> Self {
        self.block_relay_domain = value;
        self
    }

    pub fn block_spam(mut self, value: bool) -> Self {
        self.block_spam = value;
        self
    }

    pub fn domain_only(mut self, value: bool) -> Self {
        self.domain_only = value;
        self
    }

    /// Enables the option named by a rule parameter (`block_disposable`,
    /// `domain_only`, ...). Returns `false` when the name is not recognised.
    pub fn enable(&mut self, name: &str) -> bool {
        let slot = match name {
            "block_disposable" => &mut self.block_disposable,
            "block_no_mx" => &mut self.block_no_mx,
            "block_public_domain" => &mut self.block_public_domain,
            "block_blocklisted" => &mut self.block_blocklisted,
            "block_relay_domain" => &mut self.block_relay_domain,
            "block_spam" => &mut self.block_spam,
            "domain_only" => &mut self.domain_only,
            _ => return false,
        };
        *slot = true;
        true
    }
}

/// Flags reported by the verification API for one email address or domain.
///
/// A flag missing from the response is `false`, except `mx` which is assumed
/// present (`true`) unless the API says otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RemoteFlags {
    pub disposable: bool,
    pub public_domain: bool,
    pub mx: bool,
    pub blocklisted: bool,
    pub relay_domain: bool,
    pub spam: bool,
}

impl Default for RemoteFlags {
    fn default() -> Self {
        Self {
            disposable: false,
            public_domain: false,
            mx: true,
            blocklisted: false,
            relay_domain: false,
            spam: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The API answered `400`: not a syntactically valid email/domain.
    Malformed,
    Disposable,
    NoMx,
    PublicDomain,
    Blocklisted,
    RelayDomain,
    Spam,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 7] = [
        Self::Malformed,
        Self::Disposable,
        Self::NoMx,
        Self::PublicDomain,
        Self::Blocklisted,
        Self::RelayDomain,
        Self::Spam,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::Disposable => "disposable",
            Self::NoMx => "no_mx",
            Self::PublicDomain => "public_domain",
            Self::Blocklisted => "blocklisted",
            Self::RelayDomain => "relay_domain",
            Self::Spam => "spam",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error code '{0}'")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

/// Verdict for one value. `error_code` is set exactly when the value is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct VerificationOutcome {
    is_valid: bool,
    error_code: Option<ErrorCode>,
}

impl VerificationOutcome {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            error_code: None,
        }
    }

    pub fn invalid(code: ErrorCode) -> Self {
        Self {
            is_valid: false,
            error_code: Some(code),
        }
    }

    pub fn malformed() -> Self {
        Self::invalid(ErrorCode::Malformed)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        self.error_code
    }
}
