use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, TransactionTrait, Value};

use super::repository::OnMissing;
use crate::errors::RepoResult;
use crate::filtering::{FilterValue, Filters, OrderBy};

/// Attribute names a domain, create or patch type declares.
///
/// Usually derived with `#[derive(Fields)]`; a manual implementation is a
/// single constant:
///
/// ```rust
/// struct Tag {
///     id: i32,
///     label: String,
/// }
///
/// impl crudrepo::Fields for Tag {
///     const FIELDS: &'static [&'static str] = &["id", "label"];
/// }
/// ```
pub trait Fields {
    const FIELDS: &'static [&'static str];
}

/// Entity behind an active model.
pub type EntityOf<A> = <A as ActiveModelTrait>::Entity;
/// Model (row) type behind an active model.
pub type ModelOf<A> = <EntityOf<A> as EntityTrait>::Model;
/// Column enum behind an active model.
pub type ColumnOf<A> = <EntityOf<A> as EntityTrait>::Column;

/// The repository operation set, for code that abstracts over or stubs out
/// a repository.
///
/// [`Repository`](crate::Repository) implements it by delegating to its
/// inherent methods, which take `impl Into<_>` arguments where this trait
/// takes the converted values.
#[async_trait]
pub trait CrudRepository: Send + Sync {
    type Domain: Send;
    type Create: Send;
    type Patch: Send;

    async fn create<Db>(&self, db: &Db, input: Self::Create) -> RepoResult<Self::Domain>
    where
        Db: ConnectionTrait;

    async fn create_many<Db>(
        &self,
        db: &Db,
        inputs: Vec<Self::Create>,
    ) -> RepoResult<Vec<Self::Domain>>
    where
        Db: ConnectionTrait + TransactionTrait;

    async fn get_one<Db>(
        &self,
        db: &Db,
        id: Value,
        column: Option<&str>,
    ) -> RepoResult<Self::Domain>
    where
        Db: ConnectionTrait;

    async fn get_many<Db>(
        &self,
        db: &Db,
        values: FilterValue,
        column: Option<&str>,
        order_by: Option<OrderBy>,
    ) -> RepoResult<Vec<Self::Domain>>
    where
        Db: ConnectionTrait;

    async fn get_all<Db>(
        &self,
        db: &Db,
        offset: u64,
        limit: u64,
        order_by: Option<OrderBy>,
    ) -> RepoResult<(Vec<Self::Domain>, u64)>
    where
        Db: ConnectionTrait;

    async fn get_page<Db>(
        &self,
        db: &Db,
        filters: &Filters,
        offset: u64,
        limit: u64,
        order_by: Option<OrderBy>,
    ) -> RepoResult<(Vec<Self::Domain>, u64)>
    where
        Db: ConnectionTrait;

    async fn update<Db>(&self, db: &Db, value: Self::Domain) -> RepoResult<Self::Domain>
    where
        Db: ConnectionTrait;

    async fn patch<Db>(&self, db: &Db, input: Self::Patch, id: Value) -> RepoResult<Self::Domain>
    where
        Db: ConnectionTrait;

    async fn remove<Db>(
        &self,
        db: &Db,
        id: Value,
        column: Option<&str>,
        on_missing: OnMissing,
    ) -> RepoResult<()>
    where
        Db: ConnectionTrait;

    async fn remove_many<Db>(
        &self,
        db: &Db,
        ids: FilterValue,
        column: Option<&str>,
    ) -> RepoResult<u64>
    where
        Db: ConnectionTrait;

    async fn count<Db>(&self, db: &Db, filters: Option<&Filters>) -> RepoResult<u64>
    where
        Db: ConnectionTrait;
}
