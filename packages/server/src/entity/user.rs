use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Numeric GitHub account id; the stable identity key for sign-in.
    #[sea_orm(unique)]
    pub github_id: i64,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,

    #[sea_orm(has_many)]
    pub posts: HasMany<super::post::Entity>,

    #[sea_orm(has_many)]
    pub comments: HasMany<super::comment::Entity>,

    #[sea_orm(has_many)]
    pub likes: HasMany<super::post_like::Entity>,

    #[sea_orm(has_many)]
    pub code_reviews: HasMany<super::code_review::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
