use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One row of the fixed card catalog, keyed by its compact code (`QC`, `TD`).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cards")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub code: String,
    pub suit: String,
    #[sea_orm(column_type = "SmallInteger")]
    pub power: i16,
    #[sea_orm(column_type = "SmallInteger")]
    pub points: i16,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
