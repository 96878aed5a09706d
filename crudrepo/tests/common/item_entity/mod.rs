use crudrepo::{Fields, Patch, ToActiveModel};
use sea_orm::ActiveValue;
use sea_orm::entity::prelude::*;
use validator::Validate;

/// Items start out as drafts: `new()` sets `status`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub status: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {
    fn new() -> Self {
        Self {
            status: ActiveValue::Set("draft".to_string()),
            ..<Self as ActiveModelTrait>::default()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Fields, ToActiveModel, Validate)]
#[repo(active_model = "ActiveModel")]
pub struct Item {
    pub id: i32,
    pub name: String,
    pub status: String,
}

impl From<Model> for Item {
    fn from(model: Model) -> Self {
        Item {
            id: model.id,
            name: model.name,
            status: model.status,
        }
    }
}

#[derive(Clone, Debug, Fields, ToActiveModel, Validate)]
#[repo(active_model = "ActiveModel")]
pub struct NewItem {
    pub name: String,
}

#[derive(Clone, Debug, Default, Fields, Patch, Validate)]
#[repo(active_model = "ActiveModel")]
pub struct ItemPatch {
    pub name: Option<String>,
}
