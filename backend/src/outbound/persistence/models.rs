//! Internal Diesel row structs for the posts table.
//!
//! These types never leave the persistence layer.

use diesel::prelude::*;

use super::schema::posts;

/// Row struct for reading from the posts table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = posts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PostRow {
    pub id: i32,
    pub body: String,
}

/// Insertable struct for creating posts; the id comes from the sequence.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = posts)]
pub(crate) struct NewPostRow<'a> {
    pub body: &'a str,
}
