//! Column-named predicates and ordering, resolved against an entity's columns.
//!
//! Callers name columns with the strings the entity declares
//! (`IdenStatic::as_str`); an unknown name is rejected with
//! [`RepoError::UnknownColumn`] before any query runs.

pub mod conditions;
pub mod sort;

pub use conditions::{FilterValue, Filters};
pub use sort::OrderBy;

use sea_orm::ColumnTrait;

use crate::errors::{RepoError, RepoResult};

pub(crate) fn resolve_column<C: ColumnTrait>(resource: &str, name: &str) -> RepoResult<C> {
    C::iter()
        .find(|column| column.as_str() == name)
        .ok_or_else(|| RepoError::UnknownColumn {
            resource: resource.to_string(),
            column: name.to_string(),
        })
}

/// Column names the entity declares, in declaration order.
pub(crate) fn column_names<C: ColumnTrait>() -> Vec<String> {
    C::iter().map(|column| column.as_str().to_string()).collect()
}
