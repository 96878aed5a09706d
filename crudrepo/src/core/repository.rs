//! # Generic repository
//!
//! A [`Repository`] binds a Sea-ORM entity (named by its active model `A`) to
//! a domain type `D`, a create-input type `C` and a patch-input type `P`, and
//! provides the CRUD and count operations for that combination.
//!
//! ```rust,ignore
//! type UserRepo = Repository<user::ActiveModel, User, NewUser, UserPatch>;
//!
//! let users = UserRepo::builder().max_page_size(100).build()?;
//!
//! let txn = db.begin().await?;
//! let alice = users.create(&txn, NewUser { name: "alice".into() }).await?;
//! let (page, total) = users.get_all(&txn, 0, 20, Some(OrderBy::asc("name"))).await?;
//! txn.commit().await?;
//! ```
//!
//! The repository never opens or closes sessions: every operation takes a
//! `&impl ConnectionTrait` (a `DatabaseConnection` or a `DatabaseTransaction`)
//! and the caller owns commit, rollback and concurrency. The only transaction
//! it begins is the nested one that makes [`Repository::create_many`]
//! all-or-nothing.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DbErr,
    EntityName, EntityTrait, IdenStatic, IntoActiveModel, Iterable, PaginatorTrait,
    PrimaryKeyToColumn, QueryFilter, QueryOrder, QuerySelect, TransactionTrait, Value,
};
use validator::Validate;

use super::bindings::{Bindings, TypeBinding, check_same_shape, check_subset};
use super::traits::{ColumnOf, CrudRepository, EntityOf, Fields, ModelOf};
use crate::config::RepositoryConfig;
use crate::errors::{RepoError, RepoResult};
use crate::filtering::conditions::display_value;
use crate::filtering::{FilterValue, Filters, OrderBy, column_names, resolve_column};

/// What [`Repository::remove`] does when nothing matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OnMissing {
    /// Fail with [`RepoError::NotFound`].
    #[default]
    Error,
    /// Return `Ok(())`.
    Ignore,
}

/// Builds a [`Repository`], checking the bound types once.
pub struct RepositoryBuilder<A, D, C = D, P = D> {
    resource_name: Option<String>,
    max_page_size: Option<u64>,
    _types: PhantomData<fn() -> (A, D, C, P)>,
}

impl<A, D, C, P> RepositoryBuilder<A, D, C, P>
where
    A: ActiveModelTrait,
    D: Fields,
    C: Fields,
    P: Fields,
{
    fn new() -> Self {
        Self {
            resource_name: None,
            max_page_size: None,
            _types: PhantomData,
        }
    }

    /// Name used in errors and logs instead of the table name.
    #[must_use]
    pub fn resource_name(mut self, name: impl Into<String>) -> Self {
        self.resource_name = Some(name.into());
        self
    }

    /// Caps the `limit` of paged reads.
    #[must_use]
    pub fn max_page_size(mut self, max: u64) -> Self {
        self.max_page_size = Some(max);
        self
    }

    /// Applies the values present in `config`.
    #[must_use]
    pub fn config(mut self, config: RepositoryConfig) -> Self {
        if let Some(name) = config.resource_name {
            self.resource_name = Some(name);
        }
        if let Some(max) = config.max_page_size {
            self.max_page_size = Some(max);
        }
        self
    }

    /// Checks the bindings and seals them.
    ///
    /// # Errors
    ///
    /// - [`RepoError::AttributeMismatch`] when the entity's columns and `D`'s
    ///   fields differ, or when `C` or `P` name a field the entity lacks
    /// - [`RepoError::UnsupportedPrimaryKey`] when the primary key is not a
    ///   single column
    pub fn build(self) -> RepoResult<Repository<A, D, C, P>> {
        let resource = self.resource_name.unwrap_or_else(|| {
            <EntityOf<A> as Default>::default()
                .table_name()
                .to_string()
        });

        let entity = TypeBinding::new(
            std::any::type_name::<EntityOf<A>>(),
            column_names::<ColumnOf<A>>(),
        );
        let domain = TypeBinding::of::<D>(D::FIELDS);
        let create = TypeBinding::of::<C>(C::FIELDS);
        let patch = TypeBinding::of::<P>(P::FIELDS);

        check_same_shape(&entity, &domain)?;
        check_subset(&entity, &create)?;
        check_subset(&entity, &patch)?;

        let keys: Vec<String> = <<EntityOf<A> as EntityTrait>::PrimaryKey as Iterable>::iter()
            .map(|key| key.into_column().as_str().to_string())
            .collect();
        let primary_key = match <[String; 1]>::try_from(keys) {
            Ok([key]) => key,
            Err(keys) => {
                return Err(RepoError::UnsupportedPrimaryKey {
                    resource,
                    columns: keys.len(),
                });
            }
        };

        tracing::debug!(
            resource = %resource,
            entity = entity.type_name(),
            domain = domain.type_name(),
            create = create.type_name(),
            patch = patch.type_name(),
            primary_key = %primary_key,
            "repository built"
        );

        let bindings = Bindings::seal(
            resource,
            [entity, domain, create, patch],
            primary_key,
            self.max_page_size,
        );
        Ok(Repository {
            bindings: Arc::new(bindings),
            _types: PhantomData,
        })
    }
}

/// CRUD operations over one entity and its bound value types.
///
/// Cheap to clone; clones share the same sealed [`Bindings`].
pub struct Repository<A, D, C = D, P = D> {
    bindings: Arc<Bindings>,
    _types: PhantomData<fn() -> (A, D, C, P)>,
}

impl<A, D, C, P> Clone for Repository<A, D, C, P> {
    fn clone(&self) -> Self {
        Self {
            bindings: Arc::clone(&self.bindings),
            _types: PhantomData,
        }
    }
}

impl<A, D, C, P> fmt::Debug for Repository<A, D, C, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Repository")
            .field("bindings", &self.bindings)
            .finish()
    }
}

impl<A, D, C, P> Repository<A, D, C, P>
where
    A: ActiveModelTrait,
    D: Fields,
    C: Fields,
    P: Fields,
{
    #[must_use]
    pub fn builder() -> RepositoryBuilder<A, D, C, P> {
        RepositoryBuilder::new()
    }

    /// Builds with default options; see [`RepositoryBuilder::build`].
    ///
    /// # Errors
    ///
    /// Same as [`RepositoryBuilder::build`].
    pub fn new() -> RepoResult<Self> {
        Self::builder().build()
    }
}

impl<A, D, C, P> Repository<A, D, C, P>
where
    A: ActiveModelTrait,
{
    #[must_use]
    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    #[must_use]
    pub fn resource(&self) -> &str {
        self.bindings.resource()
    }

    fn column(&self, name: &str) -> RepoResult<ColumnOf<A>> {
        resolve_column::<ColumnOf<A>>(self.resource(), name)
    }

    /// Resolves an optional lookup column, defaulting to the primary key.
    fn lookup<'a>(&'a self, column: Option<&'a str>) -> RepoResult<(&'a str, ColumnOf<A>)> {
        let name = column.unwrap_or_else(|| self.bindings.primary_key());
        Ok((name, self.column(name)?))
    }

    fn db_error(&self, err: DbErr) -> RepoError {
        RepoError::from_db(self.resource(), err)
    }

    fn page_limit(&self, limit: u64) -> u64 {
        self.bindings
            .max_page_size()
            .map_or(limit, |max| limit.min(max))
    }
}

impl<A, D, C, P> Repository<A, D, C, P>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + Sync + 'static,
    ModelOf<A>: IntoActiveModel<A> + Sync,
    D: Fields + From<ModelOf<A>> + IntoActiveModel<A> + Validate + Send,
    C: Fields + IntoActiveModel<A> + Validate + Send,
    P: Fields + IntoActiveModel<A> + Validate + Send,
{
    /// Inserts one record and returns it as stored, generated identity included.
    ///
    /// # Errors
    ///
    /// [`RepoError::Validation`], [`RepoError::IntegrityConflict`], or
    /// [`RepoError::Database`].
    pub async fn create<Db>(&self, db: &Db, input: C) -> RepoResult<D>
    where
        Db: ConnectionTrait,
    {
        input.validate()?;
        let model = input
            .into_active_model()
            .insert(db)
            .await
            .map_err(|err| self.db_error(err))?;
        tracing::debug!(resource = self.resource(), "created record");
        Ok(D::from(model))
    }

    /// Inserts every input or none of them.
    ///
    /// All inputs are validated before the first insert. The inserts run in a
    /// transaction begun on `db`; when `db` is already a transaction this is a
    /// savepoint inside it.
    ///
    /// # Errors
    ///
    /// As [`Repository::create`]; on error nothing from the batch is kept.
    pub async fn create_many<Db>(&self, db: &Db, inputs: Vec<C>) -> RepoResult<Vec<D>>
    where
        Db: ConnectionTrait + TransactionTrait,
    {
        for input in &inputs {
            input.validate()?;
        }
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let txn = db.begin().await.map_err(|err| self.db_error(err))?;
        let mut created = Vec::with_capacity(inputs.len());
        for input in inputs {
            let model = input
                .into_active_model()
                .insert(&txn)
                .await
                .map_err(|err| self.db_error(err))?;
            created.push(D::from(model));
        }
        txn.commit().await.map_err(|err| self.db_error(err))?;

        tracing::debug!(
            resource = self.resource(),
            count = created.len(),
            "created records"
        );
        Ok(created)
    }

    /// Fetches the record whose `column` (default: primary key) equals `id`.
    ///
    /// # Errors
    ///
    /// [`RepoError::NotFound`] when no row matches, [`RepoError::UnknownColumn`]
    /// for a column the entity lacks.
    pub async fn get_one<Db>(
        &self,
        db: &Db,
        id: impl Into<Value>,
        column: Option<&str>,
    ) -> RepoResult<D>
    where
        Db: ConnectionTrait,
    {
        let (name, lookup) = self.lookup(column)?;
        let id = id.into();
        let model = <EntityOf<A> as EntityTrait>::find()
            .filter(lookup.eq(id.clone()))
            .one(db)
            .await
            .map_err(|err| self.db_error(err))?
            .ok_or_else(|| RepoError::not_found(self.resource(), name, display_value(&id)))?;
        Ok(D::from(model))
    }

    /// Fetches every record whose `column` (default: primary key) matches
    /// `values`. An empty result is not an error.
    ///
    /// # Errors
    ///
    /// [`RepoError::UnknownColumn`] for an unknown lookup or ordering column.
    pub async fn get_many<Db>(
        &self,
        db: &Db,
        values: impl Into<FilterValue>,
        column: Option<&str>,
        order_by: Option<OrderBy>,
    ) -> RepoResult<Vec<D>>
    where
        Db: ConnectionTrait,
    {
        let (_, lookup) = self.lookup(column)?;
        let values = values.into();
        let mut query = <EntityOf<A> as EntityTrait>::find().filter(values.to_expr(lookup));
        if let Some(order_by) = order_by {
            let (order_column, direction) = order_by.resolve::<ColumnOf<A>>(self.resource())?;
            query = query.order_by(order_column, direction);
        }
        if values.is_empty_set() {
            return Ok(Vec::new());
        }

        let models = query.all(db).await.map_err(|err| self.db_error(err))?;
        Ok(models.into_iter().map(D::from).collect())
    }

    /// One page of all records plus the total number of records.
    ///
    /// Ordering is applied before `offset` / `limit`. Without `order_by` the
    /// order of rows is unspecified.
    ///
    /// # Errors
    ///
    /// [`RepoError::UnknownColumn`] for an unknown ordering column.
    pub async fn get_all<Db>(
        &self,
        db: &Db,
        offset: u64,
        limit: u64,
        order_by: Option<OrderBy>,
    ) -> RepoResult<(Vec<D>, u64)>
    where
        Db: ConnectionTrait,
    {
        self.get_page(db, &Filters::new(), offset, limit, order_by)
            .await
    }

    /// One page of the records matching `filters` plus how many match in total.
    ///
    /// # Errors
    ///
    /// [`RepoError::UnknownColumn`] for an unknown filter or ordering column.
    pub async fn get_page<Db>(
        &self,
        db: &Db,
        filters: &Filters,
        offset: u64,
        limit: u64,
        order_by: Option<OrderBy>,
    ) -> RepoResult<(Vec<D>, u64)>
    where
        Db: ConnectionTrait,
    {
        let condition = filters.to_condition::<ColumnOf<A>>(self.resource())?;
        let limit = self.page_limit(limit);

        let mut query = <EntityOf<A> as EntityTrait>::find().filter(condition.clone());
        if let Some(order_by) = order_by {
            let (order_column, direction) = order_by.resolve::<ColumnOf<A>>(self.resource())?;
            query = query.order_by(order_column, direction);
        }
        let models = query
            .offset(offset)
            .limit(limit)
            .all(db)
            .await
            .map_err(|err| self.db_error(err))?;

        let total = PaginatorTrait::count(
            <EntityOf<A> as EntityTrait>::find().filter(condition),
            db,
        )
        .await
        .map_err(|err| self.db_error(err))?;

        tracing::debug!(
            resource = self.resource(),
            offset,
            limit,
            returned = models.len(),
            total,
            "read page"
        );
        Ok((models.into_iter().map(D::from).collect(), total))
    }

    /// Replaces the stored record identified by `value`'s primary key.
    ///
    /// # Errors
    ///
    /// [`RepoError::Validation`], [`RepoError::NotFound`] when no record has
    /// that key, [`RepoError::IntegrityConflict`].
    pub async fn update<Db>(&self, db: &Db, value: D) -> RepoResult<D>
    where
        Db: ConnectionTrait,
    {
        value.validate()?;
        let (name, key) = self.lookup(None)?;
        let active = value.into_active_model();
        let id = match active.get(key) {
            ActiveValue::Set(id) | ActiveValue::Unchanged(id) => id,
            ActiveValue::NotSet => {
                return Err(RepoError::not_found(self.resource(), name, "<unset>"));
            }
        };

        let exists = PaginatorTrait::count(
            <EntityOf<A> as EntityTrait>::find().filter(key.eq(id.clone())),
            db,
        )
        .await
        .map_err(|err| self.db_error(err))?;
        if exists == 0 {
            return Err(RepoError::not_found(self.resource(), name, display_value(&id)));
        }

        let model = active.update(db).await.map_err(|err| self.db_error(err))?;
        tracing::debug!(resource = self.resource(), id = %display_value(&id), "updated record");
        Ok(D::from(model))
    }

    /// Applies the fields `input` sets to the record with primary key `id`.
    ///
    /// Columns `input` leaves unset keep their stored values; the primary key
    /// is never changed. A patch that sets nothing returns the stored record.
    ///
    /// # Errors
    ///
    /// [`RepoError::Validation`], [`RepoError::NotFound`],
    /// [`RepoError::IntegrityConflict`].
    pub async fn patch<Db>(&self, db: &Db, input: P, id: impl Into<Value>) -> RepoResult<D>
    where
        Db: ConnectionTrait,
    {
        input.validate()?;
        let (name, key) = self.lookup(None)?;
        let id = id.into();
        let existing = <EntityOf<A> as EntityTrait>::find()
            .filter(key.eq(id.clone()))
            .one(db)
            .await
            .map_err(|err| self.db_error(err))?
            .ok_or_else(|| RepoError::not_found(self.resource(), name, display_value(&id)))?;

        let changes = input.into_active_model();
        let mut active: A = existing.clone().into_active_model();
        let mut changed = Vec::new();
        for column in <ColumnOf<A> as Iterable>::iter() {
            if column.as_str() == name {
                continue;
            }
            if let ActiveValue::Set(value) = changes.get(column) {
                active.set(column, value);
                changed.push(column.as_str().to_owned());
            }
        }
        if changed.is_empty() {
            return Ok(D::from(existing));
        }

        tracing::debug!(
            resource = self.resource(),
            id = %display_value(&id),
            columns = ?changed,
            "patching record"
        );
        let model = active.update(db).await.map_err(|err| self.db_error(err))?;
        Ok(D::from(model))
    }

    /// Deletes the records whose `column` (default: primary key) equals `id`.
    ///
    /// # Errors
    ///
    /// [`RepoError::NotFound`] when nothing matched, unless `on_missing` is
    /// [`OnMissing::Ignore`].
    pub async fn remove<Db>(
        &self,
        db: &Db,
        id: impl Into<Value>,
        column: Option<&str>,
        on_missing: OnMissing,
    ) -> RepoResult<()>
    where
        Db: ConnectionTrait,
    {
        let (name, lookup) = self.lookup(column)?;
        let id = id.into();
        let result = <EntityOf<A> as EntityTrait>::delete_many()
            .filter(lookup.eq(id.clone()))
            .exec(db)
            .await
            .map_err(|err| self.db_error(err))?;

        if result.rows_affected == 0 {
            if on_missing == OnMissing::Error {
                return Err(RepoError::not_found(self.resource(), name, display_value(&id)));
            }
            tracing::debug!(resource = self.resource(), column = name, "nothing to remove");
        }
        Ok(())
    }

    /// Deletes the records whose `column` (default: primary key) matches
    /// `ids` and returns how many were removed. Ids that match nothing are
    /// skipped.
    ///
    /// # Errors
    ///
    /// [`RepoError::UnknownColumn`], [`RepoError::IntegrityConflict`] when a
    /// foreign key still references a row.
    pub async fn remove_many<Db>(
        &self,
        db: &Db,
        ids: impl Into<FilterValue>,
        column: Option<&str>,
    ) -> RepoResult<u64>
    where
        Db: ConnectionTrait,
    {
        let (_, lookup) = self.lookup(column)?;
        let ids = ids.into();
        if ids.is_empty_set() {
            return Ok(0);
        }

        let result = <EntityOf<A> as EntityTrait>::delete_many()
            .filter(ids.to_expr(lookup))
            .exec(db)
            .await
            .map_err(|err| self.db_error(err))?;
        tracing::debug!(
            resource = self.resource(),
            removed = result.rows_affected,
            "removed records"
        );
        Ok(result.rows_affected)
    }

    /// Number of records, optionally restricted by `filters`.
    ///
    /// # Errors
    ///
    /// [`RepoError::UnknownColumn`] for an unknown filter column.
    pub async fn count<Db>(&self, db: &Db, filters: Option<&Filters>) -> RepoResult<u64>
    where
        Db: ConnectionTrait,
    {
        let mut query = <EntityOf<A> as EntityTrait>::find();
        if let Some(filters) = filters {
            query = query.filter(filters.to_condition::<ColumnOf<A>>(self.resource())?);
        }
        PaginatorTrait::count(query, db)
            .await
            .map_err(|err| self.db_error(err))
    }
}

#[async_trait]
impl<A, D, C, P> CrudRepository for Repository<A, D, C, P>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send + Sync + 'static,
    ModelOf<A>: IntoActiveModel<A> + Sync,
    D: Fields + From<ModelOf<A>> + IntoActiveModel<A> + Validate + Send,
    C: Fields + IntoActiveModel<A> + Validate + Send,
    P: Fields + IntoActiveModel<A> + Validate + Send,
{
    type Domain = D;
    type Create = C;
    type Patch = P;

    async fn create<Db>(&self, db: &Db, input: C) -> RepoResult<D>
    where
        Db: ConnectionTrait,
    {
        Repository::create(self, db, input).await
    }

    async fn create_many<Db>(&self, db: &Db, inputs: Vec<C>) -> RepoResult<Vec<D>>
    where
        Db: ConnectionTrait + TransactionTrait,
    {
        Repository::create_many(self, db, inputs).await
    }

    async fn get_one<Db>(&self, db: &Db, id: Value, column: Option<&str>) -> RepoResult<D>
    where
        Db: ConnectionTrait,
    {
        Repository::get_one(self, db, id, column).await
    }

    async fn get_many<Db>(
        &self,
        db: &Db,
        values: FilterValue,
        column: Option<&str>,
        order_by: Option<OrderBy>,
    ) -> RepoResult<Vec<D>>
    where
        Db: ConnectionTrait,
    {
        Repository::get_many(self, db, values, column, order_by).await
    }

    async fn get_all<Db>(
        &self,
        db: &Db,
        offset: u64,
        limit: u64,
        order_by: Option<OrderBy>,
    ) -> RepoResult<(Vec<D>, u64)>
    where
        Db: ConnectionTrait,
    {
        Repository::get_all(self, db, offset, limit, order_by).await
    }

    async fn get_page<Db>(
        &self,
        db: &Db,
        filters: &Filters,
        offset: u64,
        limit: u64,
        order_by: Option<OrderBy>,
    ) -> RepoResult<(Vec<D>, u64)>
    where
        Db: ConnectionTrait,
    {
        Repository::get_page(self, db, filters, offset, limit, order_by).await
    }

    async fn update<Db>(&self, db: &Db, value: D) -> RepoResult<D>
    where
        Db: ConnectionTrait,
    {
        Repository::update(self, db, value).await
    }

    async fn patch<Db>(&self, db: &Db, input: P, id: Value) -> RepoResult<D>
    where
        Db: ConnectionTrait,
    {
        Repository::patch(self, db, input, id).await
    }

    async fn remove<Db>(
        &self,
        db: &Db,
        id: Value,
        column: Option<&str>,
        on_missing: OnMissing,
    ) -> RepoResult<()>
    where
        Db: ConnectionTrait,
    {
        Repository::remove(self, db, id, column, on_missing).await
    }

    async fn remove_many<Db>(
        &self,
        db: &Db,
        ids: FilterValue,
        column: Option<&str>,
    ) -> RepoResult<u64>
    where
        Db: ConnectionTrait,
    {
        Repository::remove_many(self, db, ids, column).await
    }

    async fn count<Db>(&self, db: &Db, filters: Option<&Filters>) -> RepoResult<u64>
    where
        Db: ConnectionTrait,
    {
        Repository::count(self, db, filters).await
    }
}
