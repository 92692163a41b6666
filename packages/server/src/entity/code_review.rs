use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "code_review_request")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Unique across all requests; the service checks first and this
    /// constraint catches concurrent submissions.
    #[sea_orm(unique)]
    pub link: String,

    pub user_id: i32,
    #[sea_orm(belongs_to, from = "user_id", to = "id")]
    pub user: HasOne<super::user::Entity>,

    pub created_at: DateTimeUtc,
}

impl ActiveModelBehavior for ActiveModel {}
