//! Creator-only mutation rules shared by every user-owned entity.

use crate::entity::{code_review, comment, post};
use crate::error::AppError;
use crate::extractors::auth::AuthUser;
use crate::models::shared::Link;

/// How an entity presents mutations its viewer may not perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Non-creators never see the action.
    Hide,
    /// Everyone sees the action; non-creators are refused when they use it.
    Deny,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Edit,
    Delete,
}

impl Mutation {
    fn verb(self) -> &'static str {
        match self {
            Mutation::Edit => "edit",
            Mutation::Delete => "delete",
        }
    }
}

/// A resource with a creator who alone may mutate it.
pub trait Owned {
    /// Used in denial messages: "Cannot edit a {NOUN} you haven't created".
    const NOUN: &'static str;
    const VISIBILITY: Visibility;
    const MUTATIONS: &'static [Mutation] = &[Mutation::Edit, Mutation::Delete];

    fn creator_id(&self) -> i32;

    /// Canonical path of the resource; actions are derived from it.
    fn path(&self) -> String;

    fn label(mutation: Mutation) -> &'static str {
        match mutation {
            Mutation::Edit => "Edit",
            Mutation::Delete => "Delete",
        }
    }
}

pub fn is_creator<R: Owned>(user: &AuthUser, resource: &R) -> bool {
    resource.creator_id() == user.user_id
}

/// Refuse `mutation` unless `user` created `resource`.
pub fn authorize<R: Owned>(
    user: &AuthUser,
    resource: &R,
    mutation: Mutation,
) -> Result<(), AppError> {
    if is_creator(user, resource) {
        return Ok(());
    }
    tracing::info!(
        user_id = user.user_id,
        creator_id = resource.creator_id(),
        resource = R::NOUN,
        "Refused {} by non-creator",
        mutation.verb()
    );
    Err(AppError::Forbidden(format!(
        "Cannot {} a {} you haven't created",
        mutation.verb(),
        R::NOUN
    )))
}

/// Actions to render for `resource` when viewed by `user`.
pub fn actions<R: Owned>(user: &AuthUser, resource: &R) -> Vec<Link> {
    if R::VISIBILITY == Visibility::Hide && !is_creator(user, resource) {
        return Vec::new();
    }
    let path = resource.path();
    R::MUTATIONS
        .iter()
        .map(|&mutation| match mutation {
            Mutation::Edit => Link::get(R::label(mutation), format!("{path}/edit")),
            Mutation::Delete => Link::delete(R::label(mutation), path.clone()),
        })
        .collect()
}

impl Owned for post::Model {
    const NOUN: &'static str = "post";
    const VISIBILITY: Visibility = Visibility::Hide;

    fn creator_id(&self) -> i32 {
        self.user_id
    }

    fn path(&self) -> String {
        format!("/posts/{}", self.id)
    }
}

impl Owned for comment::Model {
    const NOUN: &'static str = "comment";
    const VISIBILITY: Visibility = Visibility::Deny;

    fn creator_id(&self) -> i32 {
        self.user_id
    }

    fn path(&self) -> String {
        format!("/posts/{}/comments/{}", self.post_id, self.id)
    }

    fn label(mutation: Mutation) -> &'static str {
        match mutation {
            Mutation::Edit => "Edit Comment",
            Mutation::Delete => "Delete Comment",
        }
    }
}

impl Owned for code_review::Model {
    const NOUN: &'static str = "code review request";
    const VISIBILITY: Visibility = Visibility::Hide;
    const MUTATIONS: &'static [Mutation] = &[Mutation::Delete];

    fn creator_id(&self) -> i32 {
        self.user_id
    }

    fn path(&self) -> String {
        format!("/codereviews/{}", self.id)
    }
}
