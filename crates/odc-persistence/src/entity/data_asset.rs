//! `SeaORM` Entity for data_asset table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "data_asset")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub dataset_title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub dataset_description: Option<String>,
    pub version: Option<String>,
    pub license_url: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub tags: Option<String>,
    pub organization_title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub organization_description: Option<String>,
    pub status: i32,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
