//! Diesel table definitions for the PostgreSQL schema.
//!
//! The table is provisioned outside the application:
//!
//! ```sql
//! CREATE TABLE posts (id SERIAL PRIMARY KEY, body TEXT NOT NULL);
//! ```

diesel::table! {
    /// Posts table. `id` is issued by the `SERIAL` sequence.
    posts (id) {
        /// Primary key drawn from the table sequence.
        id -> Int4,
        /// Free-form body text.
        body -> Text,
    }
}
