use axum::{debug_handler, extract::{Query, State}, response::{Html, IntoResponse, Redirect, Response}, Form};
use serde::Deserialize;
use sqlx::SqlitePool;
use tower_sessions::Session;

use crate::{include_res, session::USER_ID, AppResult};

#[derive(Deserialize)]
pub(crate) struct LoginQuery {
    pub(crate) return_url: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct LoginForm {
    name: Option<String>,
}

#[debug_handler]
pub(crate) async fn login_page(session: Session) -> AppResult<Response> {
    if session.get::<String>(USER_ID).await?.is_some() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(Html(include_res!(str, "/pages/login.html")).into_response())
}

#[debug_handler]
pub(crate) async fn login(
    Query(LoginQuery { return_url }): Query<LoginQuery>,
    State(db_pool): State<SqlitePool>,
    session: Session,

    Form(LoginForm { name }): Form<LoginForm>,
) -> AppResult<Redirect> {
    let user_id = super::create_user(&db_pool, name.as_deref().unwrap_or("")).await?;
    session.insert(USER_ID, &user_id).await?;

    Ok(Redirect::to(return_url.as_deref().unwrap_or("/")))
}
