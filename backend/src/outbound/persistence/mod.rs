//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of domain repository ports backed by PostgreSQL
//! via Diesel with async support through `diesel-async` and `bb8` pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never reach the domain layer.
//! - **Parameterised statements**: every value is bound, never interpolated.
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselPostRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://postgres@localhost/postgres")).await?;
//! let repo = DieselPostRepository::new(pool);
//! ```

mod diesel_post_repository;
mod models;
mod pool;
mod schema;

pub use diesel_post_repository::DieselPostRepository;
pub use pool::{DbPool, PoolConfig, PoolError};
