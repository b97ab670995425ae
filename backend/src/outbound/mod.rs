//! Outbound (driven) adapters implementing domain ports.

pub mod persistence;
