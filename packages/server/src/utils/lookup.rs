use std::collections::{HashMap, HashSet};

use sea_orm::prelude::Expr;
use sea_orm::sea_query::Func;
use sea_orm::*;

use crate::entity::{comment, post, post_like, user};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::post::{PostListItem, PostResponse};
use crate::models::shared::UserSummary;
use crate::utils::ownership::actions;

/// Look up a post by ID, returning 404 if not found.
pub async fn find_post<C: ConnectionTrait>(db: &C, id: i32) -> Result<post::Model, AppError> {
    post::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Post not found".into()))
}

/// Look up a comment under the given post, returning 404 if the comment
/// does not exist or belongs to another post.
pub async fn find_comment<C: ConnectionTrait>(
    db: &C,
    post_id: i32,
    comment_id: i32,
) -> Result<comment::Model, AppError> {
    comment::Entity::find_by_id(comment_id)
        .filter(comment::Column::PostId.eq(post_id))
        .one(db)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))
}

/// Load the given users keyed by ID.
pub async fn load_users<C: ConnectionTrait>(
    db: &C,
    ids: impl IntoIterator<Item = i32>,
) -> Result<HashMap<i32, user::Model>, DbErr> {
    let ids: HashSet<i32> = ids.into_iter().collect();
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    Ok(user::Entity::find()
        .filter(user::Column::Id.is_in(ids))
        .all(db)
        .await?
        .into_iter()
        .map(|u| (u.id, u))
        .collect())
}

pub fn summary(users: &HashMap<i32, user::Model>, id: i32) -> UserSummary {
    users
        .get(&id)
        .map(UserSummary::from)
        .unwrap_or_else(|| UserSummary::unknown(id))
}

/// Decorate posts with creator, counters and the viewer's actions, keeping
/// the input order. Counts are fetched with one grouped query each.
pub async fn post_list_items<C: ConnectionTrait>(
    db: &C,
    viewer: &AuthUser,
    posts: Vec<post::Model>,
) -> Result<Vec<PostListItem>, AppError> {
    if posts.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = posts.iter().map(|p| p.id).collect();

    let users = load_users(db, posts.iter().map(|p| p.user_id)).await?;

    let like_counts: HashMap<i32, i64> = post_like::Entity::find()
        .select_only()
        .column(post_like::Column::PostId)
        .column_as(
            Expr::expr(Func::count(Expr::col(post_like::Column::UserId))),
            "count",
        )
        .filter(post_like::Column::PostId.is_in(ids.clone()))
        .group_by(post_like::Column::PostId)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let comment_counts: HashMap<i32, i64> = comment::Entity::find()
        .select_only()
        .column(comment::Column::PostId)
        .column_as(
            Expr::expr(Func::count(Expr::col(comment::Column::Id))),
            "count",
        )
        .filter(comment::Column::PostId.is_in(ids.clone()))
        .group_by(comment::Column::PostId)
        .into_tuple::<(i32, i64)>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    let liked: HashSet<i32> = post_like::Entity::find()
        .select_only()
        .column(post_like::Column::PostId)
        .filter(post_like::Column::UserId.eq(viewer.user_id))
        .filter(post_like::Column::PostId.is_in(ids))
        .into_tuple::<i32>()
        .all(db)
        .await?
        .into_iter()
        .collect();

    Ok(posts
        .into_iter()
        .map(|p| {
            let id = p.id;
            let creator = summary(&users, p.user_id);
            let links = actions(viewer, &p);
            PostListItem {
                post: PostResponse::new(p, links),
                creator,
                like_count: like_counts.get(&id).copied().unwrap_or(0) as u64,
                comment_count: comment_counts.get(&id).copied().unwrap_or(0) as u64,
                liked: liked.contains(&id),
            }
        })
        .collect())
}
