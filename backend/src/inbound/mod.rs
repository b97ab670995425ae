//! Inbound (driving) adapters translating transport requests into domain
//! calls.

pub mod http;
