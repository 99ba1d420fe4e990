use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Profile photo. At most one row per profile; uploads upsert on
/// `profile_id`.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "photo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Public URL of the stored image.
    pub url: String,
    /// Object-store key, used to delete the object when replaced.
    pub object_key: String,

    #[sea_orm(unique)]
    pub profile_id: i32,
    #[sea_orm(belongs_to, from = "profile_id", to = "id", on_delete = "Cascade")]
    pub profile: HasOne<super::profile::Entity>,

    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
