//! Persistence adapters for the credential store port.
//!
//! The PostgreSQL adapter uses Diesel with async support through
//! `diesel-async` and `bb8` connection pooling. The persistence layer
//! follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types; unique-index violations become
//!   `DuplicateEmail`.
//!
//! [`InMemoryUserStore`] backs processes started without a database and
//! keeps tests free of I/O.

mod diesel_user_store;
mod memory_user_store;
mod models;
mod pool;
mod schema;

pub use diesel_user_store::DieselUserStore;
pub use memory_user_store::InMemoryUserStore;
pub use pool::{DbPool, PoolConfig, PoolError};
