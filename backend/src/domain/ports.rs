//! Domain ports defining the edges of the hexagon.
//!
//! Ports describe how the domain expects to interact with driven adapters
//! (databases, stores) and how inbound adapters drive the domain. Each trait
//! exposes strongly typed errors so adapters map their failures into
//! predictable variants instead of returning `anyhow::Result`.

mod authenticator;
mod user_store;

pub use authenticator::Authenticator;
pub use user_store::{NewUser, ProfileChanges, UserStore, UserStoreError};
