//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are
//! used by Diesel for compile-time query validation and type-safe SQL
//! generation. Schema evolution itself is managed by an external migration
//! tool.

diesel::table! {
    /// User accounts table.
    ///
    /// Stores registered users with their hashed credentials and audit
    /// timestamps. The `id` column is the primary key (UUID v4); `email`
    /// carries a unique index that arbitrates concurrent registrations.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique, lower-cased email address.
        email -> Varchar,
        /// Full name as supplied at registration.
        full_name -> Varchar,
        /// Optional messaging handle from the profile.
        contact_handle -> Nullable<Varchar>,
        /// Salted one-way password hash in PHC string format.
        password_hash -> Varchar,
        /// Record creation timestamp.
        created_at -> Timestamptz,
        /// Last modification timestamp.
        updated_at -> Timestamptz,
    }
}
