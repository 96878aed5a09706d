#![allow(dead_code)]

use crudrepo::Repository;
use sea_orm::{Database, DatabaseConnection, DbErr};
use sea_orm_migration::prelude::*;
use tracing_subscriber::EnvFilter;

pub mod item_entity;
pub mod membership_entity;
pub mod user_entity;

pub type UserRepo = Repository<
    user_entity::ActiveModel,
    user_entity::User,
    user_entity::NewUser,
    user_entity::UserPatch,
>;

pub type ItemRepo = Repository<
    item_entity::ActiveModel,
    item_entity::Item,
    item_entity::NewItem,
    item_entity::ItemPatch,
>;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    init_tracing();
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;

    Ok(db)
}

/// Logs repository events when `RUST_LOG` is set, e.g. `RUST_LOG=crudrepo=debug`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateUserTable), Box::new(CreateItemTable)]
    }
}

pub struct CreateUserTable;

impl MigrationName for CreateUserTable {
    fn name(&self) -> &'static str {
        "m20250101_000001_create_user_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateUserTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(UserTable)
            .if_not_exists()
            .col(
                ColumnDef::new(UserColumn::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(UserColumn::Name).string().not_null())
            .col(
                ColumnDef::new(UserColumn::Email)
                    .string()
                    .not_null()
                    .unique_key(),
            )
            .col(ColumnDef::new(UserColumn::Bio).text().null())
            .col(
                ColumnDef::new(UserColumn::Age)
                    .integer()
                    .not_null()
                    .default(0),
            )
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(UserTable).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum UserColumn {
    Id,
    Name,
    Email,
    Bio,
    Age,
}

impl Iden for UserColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
                Self::Email => "email",
                Self::Bio => "bio",
                Self::Age => "age",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct UserTable;

impl Iden for UserTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "users").unwrap();
    }
}

pub struct CreateItemTable;

impl MigrationName for CreateItemTable {
    fn name(&self) -> &'static str {
        "m20250101_000002_create_item_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateItemTable {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let table = Table::create()
            .table(ItemTable)
            .if_not_exists()
            .col(
                ColumnDef::new(ItemColumn::Id)
                    .integer()
                    .not_null()
                    .auto_increment()
                    .primary_key(),
            )
            .col(ColumnDef::new(ItemColumn::Name).string().not_null())
            .col(ColumnDef::new(ItemColumn::Status).string().not_null())
            .to_owned();

        manager.create_table(table).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ItemTable).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum ItemColumn {
    Id,
    Name,
    Status,
}

impl Iden for ItemColumn {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(
            s,
            "{}",
            match self {
                Self::Id => "id",
                Self::Name => "name",
                Self::Status => "status",
            }
        )
        .unwrap();
    }
}

#[derive(Debug)]
pub struct ItemTable;

impl Iden for ItemTable {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "items").unwrap();
    }
}
