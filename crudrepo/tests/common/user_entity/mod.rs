use crudrepo::{Fields, Patch, ToActiveModel};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Deserialize, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    #[sea_orm(unique)]
    pub email: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub age: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Fields, ToActiveModel, Validate)]
#[repo(active_model = "ActiveModel")]
pub struct User {
    pub id: i32,
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub bio: Option<String>,
    pub age: i32,
}

impl From<Model> for User {
    fn from(model: Model) -> Self {
        User {
            id: model.id,
            name: model.name,
            email: model.email,
            bio: model.bio,
            age: model.age,
        }
    }
}

#[derive(Clone, Debug, Deserialize, Fields, ToActiveModel, Validate)]
#[repo(active_model = "ActiveModel")]
pub struct NewUser {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    pub bio: Option<String>,
    pub age: i32,
}

impl NewUser {
    pub fn new(name: &str, email: &str, age: i32) -> Self {
        NewUser {
            name: name.to_string(),
            email: email.to_string(),
            bio: None,
            age,
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Fields, Patch, Validate)]
#[repo(active_model = "ActiveModel")]
pub struct UserPatch {
    #[validate(length(min = 1))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub bio: Option<Option<String>>,
    pub age: Option<i32>,
}

/// Domain type that leaves out most of the table's columns.
#[derive(Clone, Debug, Fields)]
pub struct UserSummary {
    pub id: i32,
    pub name: String,
}

/// Create input naming a column the table does not have.
#[derive(Clone, Debug, Fields)]
pub struct NewUserWithNickname {
    pub name: String,
    pub email: String,
    pub nickname: String,
}
