use std::time::Duration;

use sea_orm::sea_query::{Index, IndexCreateStatement};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr};
use tracing::{info, warn};

use crate::entity::{comment, post, post_like, post_tag};

pub async fn init_db(db_url: &str) -> Result<DatabaseConnection, DbErr> {
    let mut opt = ConnectOptions::new(db_url.to_owned());

    // Set connection pool options
    opt.max_connections(100)
        .min_connections(5)
        .connect_timeout(Duration::from_secs(8))
        .acquire_timeout(Duration::from_secs(8))
        .idle_timeout(Duration::from_secs(8))
        .max_lifetime(Duration::from_secs(8))
        .sqlx_logging(true);

    let db = Database::connect(opt).await?;
    sync_schema(&db).await?;

    Ok(db)
}

/// Create or migrate every table registered under `server::entity`.
pub async fn sync_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    db.get_schema_registry("server::entity::*")
        .sync(db)
        .await
}

/// Ensure secondary indexes exist.
///
/// Schema-sync only creates primary keys and unique constraints, so lookup
/// indexes for the listing and detail queries are created here on startup.
/// Failures are logged and do not abort startup.
pub async fn ensure_indexes(db: &DatabaseConnection) -> Result<(), DbErr> {
    let indexes = [
        // GET /posts: ORDER BY created_at DESC
        (
            "idx_post_created",
            Index::create()
                .if_not_exists()
                .name("idx_post_created")
                .table(post::Entity)
                .col(post::Column::CreatedAt)
                .to_owned(),
        ),
        // Per-user counts on /me
        (
            "idx_post_user",
            Index::create()
                .if_not_exists()
                .name("idx_post_user")
                .table(post::Entity)
                .col(post::Column::UserId)
                .to_owned(),
        ),
        // GET /posts/{id}: comments in creation order
        (
            "idx_comment_post_created",
            Index::create()
                .if_not_exists()
                .name("idx_comment_post_created")
                .table(comment::Entity)
                .col(comment::Column::PostId)
                .col(comment::Column::CreatedAt)
                .to_owned(),
        ),
        // GET /posts?tag=...
        (
            "idx_post_tag_name",
            Index::create()
                .if_not_exists()
                .name("idx_post_tag_name")
                .table(post_tag::Entity)
                .col(post_tag::Column::Name)
                .to_owned(),
        ),
        // Like counts per post
        (
            "idx_post_like_post",
            Index::create()
                .if_not_exists()
                .name("idx_post_like_post")
                .table(post_like::Entity)
                .col(post_like::Column::PostId)
                .to_owned(),
        ),
    ];

    for (name, stmt) in indexes {
        create_index(db, name, stmt).await;
    }

    Ok(())
}

async fn create_index(db: &DatabaseConnection, name: &str, stmt: IndexCreateStatement) {
    let statement = db.get_database_backend().build(&stmt);

    match db.execute_raw(statement).await {
        Ok(_) => info!("Ensured index {} exists", name),
        Err(e) => warn!("Failed to create index {}: {}", name, e),
    }
}
