//! Property-based tests for the session controller.
//!
//! - Submit with a non-blank topic always lands in Planning and sends once
//! - Submit with a blank topic changes nothing and sends nothing
//! - Out-of-range status updates never touch the registry
//! - Any event sequence keeps statuses monotonic between plans
