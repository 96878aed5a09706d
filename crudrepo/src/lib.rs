//! Generic CRUD repositories over Sea-ORM entities.
//!
//! A [`Repository`] binds one entity to a domain type, a create-input type
//! and a patch-input type, checks once that their attribute names line up,
//! and then offers `create`, `create_many`, `get_one`, `get_many`,
//! `get_all`, `get_page`, `update`, `patch`, `remove`, `remove_many` and
//! `count` against any Sea-ORM connection or transaction.

pub mod config;
pub mod core;
pub mod errors;
pub mod filtering;

pub use config::RepositoryConfig;
pub use crate::core::{
    BindingSlot, Bindings, ColumnOf, CrudRepository, EntityOf, Fields, ModelOf, OnMissing,
    Repository, RepositoryBuilder, TypeBinding,
};
pub use errors::{RepoError, RepoResult};
pub use filtering::{FilterValue, Filters, OrderBy};

#[cfg(feature = "derive")]
pub use crudrepo_derive::{Fields, Patch, ToActiveModel}; // Export the proc macros
