use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "post")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub title: String,
    pub link: String,
    /// Tag list exactly as the creator typed it, e.g. "ruby, makers, beginner".
    /// The normalised form lives in `post_tag`.
    pub tags: String,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    #[sea_orm(has_many)]
    pub comments: HasMany<super::comment::Entity>,

    #[sea_orm(has_many)]
    pub likes: HasMany<super::post_like::Entity>,

    #[sea_orm(has_many)]
    pub post_tags: HasMany<super::post_tag::Entity>,

    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
