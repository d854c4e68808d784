//! In-memory implementation of the blog backend contract, used as the
//! integration-test backend and runnable standalone.
//!
//! Mirrors the real API's surface: `{"data": ...}` envelopes on success,
//! `{"message": ...}` bodies on failure, bearer tokens issued at login, and
//! the own-vs-privileged endpoint split for post mutations. Passwords are
//! compared in plain text; this server exists to exercise clients, not to
//! protect anything.

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

/// Public view of a user account, as serialized on the wire.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
}

/// A stored account, including fields never serialized to clients.
#[derive(Clone, Debug)]
struct UserRecord {
    user: User,
    password: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub user_id: Uuid,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct RegisterUser {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginUser {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreatePost {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct UpdatePost {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Default)]
pub struct AppState {
    users: HashMap<Uuid, UserRecord>,
    tokens: HashMap<String, Uuid>,
    posts: HashMap<Uuid, Post>,
}

pub type Db = Arc<RwLock<AppState>>;

type ApiErr = (StatusCode, Json<serde_json::Value>);

fn err(status: StatusCode, message: &str) -> ApiErr {
    (status, Json(json!({ "message": message })))
}

fn wrap<T: Serialize>(data: T) -> Json<serde_json::Value> {
    Json(json!({ "data": data }))
}

pub fn db() -> Db {
    Arc::new(RwLock::new(AppState::default()))
}

pub fn app_with(db: Db) -> Router {
    Router::new()
        .route("/user/new", post(register))
        .route("/user/login", post(login))
        .route("/user/monprofil", get(profile))
        .route("/user/all", get(list_users))
        .route("/post/all", get(list_posts))
        .route("/post/{id}", get(get_post))
        .route("/post/new", post(create_post))
        .route("/post/update/{id}", put(update_post))
        .route("/post/updateOwnPost/{id}", put(update_own_post))
        .route("/post/delete/{id}", axum::routing::delete(delete_post))
        .route("/post/deleteOwnPost/{id}", axum::routing::delete(delete_own_post))
        .with_state(db)
}

pub fn app() -> Router {
    app_with(db())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serve over an existing `Db`, so callers can seed state first.
pub async fn run_with(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(db)).await
}

/// Create an account with admin rights, bypassing registration. Tests use
/// this to exercise privileged flows; the register endpoint never grants
/// admin.
pub async fn seed_admin(db: &Db, name: &str, email: &str, password: &str) -> Uuid {
    let record = UserRecord {
        user: User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            email: email.to_string(),
            is_admin: true,
            created_at: Utc::now(),
        },
        password: password.to_string(),
    };
    let id = record.user.id;
    db.write().await.users.insert(id, record);
    id
}

/// Resolve the bearer token in `headers` to the account it belongs to.
fn authenticate(state: &AppState, headers: &HeaderMap) -> Result<User, ApiErr> {
    let raw = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| err(StatusCode::UNAUTHORIZED, "missing token"))?;
    let token = raw
        .strip_prefix("Bearer ")
        .ok_or_else(|| err(StatusCode::UNAUTHORIZED, "malformed authorization header"))?;
    let user_id = state
        .tokens
        .get(token)
        .ok_or_else(|| err(StatusCode::UNAUTHORIZED, "invalid or expired token"))?;
    state
        .users
        .get(user_id)
        .map(|r| r.user.clone())
        .ok_or_else(|| err(StatusCode::UNAUTHORIZED, "invalid or expired token"))
}

fn require_admin(user: &User) -> Result<(), ApiErr> {
    if !user.is_admin {
        return Err(err(StatusCode::FORBIDDEN, "admin rights required"));
    }
    Ok(())
}

// -- user handlers ----------------------------------------------------------

async fn register(
    State(db): State<Db>,
    Json(input): Json<RegisterUser>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiErr> {
    if input.name.trim().is_empty() || input.email.trim().is_empty() || input.password.is_empty() {
        return Err(err(StatusCode::BAD_REQUEST, "invalid input"));
    }
    let mut state = db.write().await;
    if state.users.values().any(|r| r.user.email == input.email) {
        return Err(err(StatusCode::BAD_REQUEST, "email already taken"));
    }
    let record = UserRecord {
        user: User {
            id: Uuid::new_v4(),
            name: input.name,
            email: input.email,
            is_admin: false,
            created_at: Utc::now(),
        },
        password: input.password,
    };
    let user = record.user.clone();
    state.users.insert(user.id, record);
    log::debug!("registered {}", user.email);
    Ok((StatusCode::CREATED, wrap(user)))
}

async fn login(
    State(db): State<Db>,
    Json(input): Json<LoginUser>,
) -> Result<Json<serde_json::Value>, ApiErr> {
    let mut state = db.write().await;
    let user_id = state
        .users
        .values()
        .find(|r| r.user.email == input.email && r.password == input.password)
        .map(|r| r.user.id)
        .ok_or_else(|| err(StatusCode::UNAUTHORIZED, "invalid credentials"))?;
    let token = Uuid::new_v4().to_string();
    state.tokens.insert(token.clone(), user_id);
    Ok(Json(json!({ "token": token })))
}

async fn profile(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiErr> {
    let state = db.read().await;
    let user = authenticate(&state, &headers)?;
    Ok(wrap(user))
}

async fn list_users(
    State(db): State<Db>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiErr> {
    let state = db.read().await;
    let user = authenticate(&state, &headers)?;
    require_admin(&user)?;
    let users: Vec<User> = state.users.values().map(|r| r.user.clone()).collect();
    Ok(wrap(users))
}

// -- post handlers ----------------------------------------------------------

async fn list_posts(State(db): State<Db>) -> Json<serde_json::Value> {
    let state = db.read().await;
    let posts: Vec<Post> = state.posts.values().cloned().collect();
    wrap(posts)
}

async fn get_post(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiErr> {
    let state = db.read().await;
    state
        .posts
        .get(&id)
        .map(wrap)
        .ok_or_else(|| err(StatusCode::NOT_FOUND, "post not found"))
}

async fn create_post(
    State(db): State<Db>,
    headers: HeaderMap,
    Json(input): Json<CreatePost>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiErr> {
    let mut state = db.write().await;
    let user = authenticate(&state, &headers)?;
    let post = Post {
        id: Uuid::new_v4(),
        title: input.title,
        content: input.content,
        user_id: user.id,
        author: user.name,
        created_at: Utc::now(),
    };
    state.posts.insert(post.id, post.clone());
    Ok((StatusCode::CREATED, wrap(post)))
}

fn apply_update(post: &mut Post, input: UpdatePost) {
    if let Some(title) = input.title {
        post.title = title;
    }
    if let Some(content) = input.content {
        post.content = content;
    }
}

async fn update_post(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(input): Json<UpdatePost>,
) -> Result<Json<serde_json::Value>, ApiErr> {
    let mut state = db.write().await;
    let user = authenticate(&state, &headers)?;
    require_admin(&user)?;
    let post = state
        .posts
        .get_mut(&id)
        .ok_or_else(|| err(StatusCode::NOT_FOUND, "post not found"))?;
    apply_update(post, input);
    Ok(wrap(post.clone()))
}

async fn update_own_post(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
    Json(input): Json<UpdatePost>,
) -> Result<Json<serde_json::Value>, ApiErr> {
    let mut state = db.write().await;
    let user = authenticate(&state, &headers)?;
    let post = state
        .posts
        .get_mut(&id)
        .ok_or_else(|| err(StatusCode::NOT_FOUND, "post not found"))?;
    if post.user_id != user.id {
        return Err(err(StatusCode::FORBIDDEN, "not the owner"));
    }
    apply_update(post, input);
    Ok(wrap(post.clone()))
}

async fn delete_post(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiErr> {
    let mut state = db.write().await;
    let user = authenticate(&state, &headers)?;
    require_admin(&user)?;
    state
        .posts
        .remove(&id)
        .map(|_| StatusCode::NO_CONTENT)
        .ok_or_else(|| err(StatusCode::NOT_FOUND, "post not found"))
}

async fn delete_own_post(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiErr> {
    let mut state = db.write().await;
    let user = authenticate(&state, &headers)?;
    let post = state
        .posts
        .get(&id)
        .ok_or_else(|| err(StatusCode::NOT_FOUND, "post not found"))?;
    if post.user_id != user.id {
        return Err(err(StatusCode::FORBIDDEN, "not the owner"));
    }
    state.posts.remove(&id);
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_serializes_camel_case() {
        let user = User {
            id: Uuid::nil(),
            name: "Test".to_string(),
            email: "t@example.com".to_string(),
            is_admin: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["isAdmin"], true);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("is_admin").is_none());
    }

    #[test]
    fn post_serializes_camel_case() {
        let post = Post {
            id: Uuid::nil(),
            title: "T".to_string(),
            content: "C".to_string(),
            user_id: Uuid::nil(),
            author: "A".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["userId"], "00000000-0000-0000-0000-000000000000");
    }

    #[test]
    fn update_post_all_fields_optional() {
        let input: UpdatePost = serde_json::from_str("{}").unwrap();
        assert!(input.title.is_none());
        assert!(input.content.is_none());
    }

    #[test]
    fn register_rejects_missing_field() {
        let result: Result<RegisterUser, _> =
            serde_json::from_str(r#"{"name":"x","email":"y"}"#);
        assert!(result.is_err());
    }
}
