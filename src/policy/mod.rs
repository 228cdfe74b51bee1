//! Block policy: turns the flags reported by the API into a verdict.
//!
//! [`decide`] is a pure function of its two inputs. Triggers are evaluated in a
//! fixed order and the first enabled one that fires wins, so a blocklisted
//! domain is always reported as [`ErrorCode::Blocklisted`] whatever else the
//! API flagged.

mod flags;
mod types;

pub use flags::InvalidFlags;
pub use types::{
    BlockOptions, ErrorCode, RemoteFlags, UnknownErrorCode, VerificationOutcome,
};

/// Evaluates `flags` against the enabled `options`.
pub fn decide(flags: &RemoteFlags, options: &BlockOptions) -> VerificationOutcome {
    let triggers = [
        (
            options.block_blocklisted && flags.blocklisted,
            ErrorCode::Blocklisted,
        ),
        (
            options.block_disposable && flags.disposable,
            ErrorCode::Disposable,
        ),
        (
            options.block_public_domain && flags.public_domain,
            ErrorCode::PublicDomain,
        ),
        (
            options.block_relay_domain && flags.relay_domain,
            ErrorCode::RelayDomain,
        ),
        (options.block_spam && flags.spam, ErrorCode::Spam),
        (options.block_no_mx && !flags.mx, ErrorCode::NoMx),
    ];

    triggers
        .into_iter()
        .find_map(|(fired, code)| fired.then_some(code))
        .map_or_else(VerificationOutcome::valid, VerificationOutcome::invalid)
}
