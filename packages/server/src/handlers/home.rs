use axum::Json;
use axum_extra::extract::CookieJar;
use tracing::instrument;

use crate::extractors::auth::MaybeAuthUser;
use crate::extractors::flash::take_flash;
use crate::models::home::HomeResponse;

#[utoipa::path(
    get,
    path = "/",
    tag = "Home",
    operation_id = "home",
    summary = "Landing page",
    description = "Anonymous visitors get a `Sign in with Github` link; signed-in users get `Resources`, `Code Reviews` and `Sign out`. Consumes any pending flash message.",
    responses(
        (status = 200, description = "Navigation for the current visitor", body = HomeResponse),
    ),
)]
#[instrument(skip_all)]
pub async fn home(
    MaybeAuthUser(viewer): MaybeAuthUser,
    jar: CookieJar,
) -> (CookieJar, Json<HomeResponse>) {
    let (jar, flash) = take_flash(jar);
    let body = match viewer {
        Some(user) => HomeResponse::signed_in(user.email, flash),
        None => HomeResponse::anonymous(flash),
    };
    (jar, Json(body))
}
