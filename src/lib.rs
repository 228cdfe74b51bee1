#![forbid(unsafe_code)]
//! usercheck_lib — vérification e-mail / domaine via l'API UserCheck
//! (jetable, sans MX, public, blocklist, relais, spam).

pub mod client;
pub mod messages;
pub mod policy;
pub mod rule;

pub use client::{
    CheckResponse, ClientConfig, ClientError, Endpoint, RawResponse, Transport, UserCheckClient,
};
pub use messages::MessageCatalog;
pub use policy::{BlockOptions, ErrorCode, RemoteFlags, VerificationOutcome, decide};
pub use rule::UserCheckRule;
