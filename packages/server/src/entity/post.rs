use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    /// Monotonic; feeds order by this descending.
    #[sea_orm(primary_key)]
    pub id: i32,

    /// 1-256 characters.
    #[sea_orm(column_type = "Text")]
    pub content: String,

    pub profile_id: i32,
    #[sea_orm(belongs_to, from = "profile_id", to = "id", on_delete = "Cascade")]
    pub profile: HasOne<super::profile::Entity>,

    /// Set on insert, never updated.
    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
