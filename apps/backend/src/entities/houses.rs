use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum PermissionGroup {
    #[sea_orm(string_value = "ANYONE")]
    Anyone,
    #[sea_orm(string_value = "FRIENDS")]
    Friends,
    #[sea_orm(string_value = "NOBODY")]
    Nobody,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "houses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i64,
    #[sea_orm(column_name = "host_id")]
    pub host_id: i64,
    pub variant: String,
    #[sea_orm(column_name = "player_count", column_type = "SmallInteger")]
    pub player_count: i16,
    #[sea_orm(column_name = "nopick_legal")]
    pub nopick_legal: bool,
    #[sea_orm(column_name = "automatic_double")]
    pub automatic_double: bool,
    #[sea_orm(column_name = "blitz_legal")]
    pub blitz_legal: bool,
    #[sea_orm(column_name = "crack_legal")]
    pub crack_legal: bool,
    #[sea_orm(column_name = "chat_enabled")]
    pub chat_enabled: bool,
    #[sea_orm(column_name = "players_permitted")]
    pub players_permitted: PermissionGroup,
    #[sea_orm(column_name = "spectators_permitted")]
    pub spectators_permitted: PermissionGroup,
    #[sea_orm(column_name = "created_at")]
    pub created_at: OffsetDateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
