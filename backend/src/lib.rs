//! Authentication backend for the Parley chat product.
//!
//! Registers users into a relational credential store, authenticates
//! email/password submissions, and issues signed expiring bearer tokens that
//! every subsequent request must present. The crate is organised
//! hexagonally: `domain` holds transport-agnostic types and use-cases,
//! `inbound` adapts HTTP onto them, and `outbound` implements the
//! persistence ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

pub use doc::ApiDoc;
pub use middleware::Trace;
