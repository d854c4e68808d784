use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::{app, app_with, db, seed_admin, Post, User};
use tower::ServiceExt;

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = body_bytes(response).await;
    serde_json::from_slice(&bytes).unwrap()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn authed_request(method: &str, uri: &str, token: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
        .body(body.to_string())
        .unwrap()
}

/// Register an account and log it in, returning its bearer token.
async fn register_and_login(app: &Router, email: &str) -> String {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/user/new",
            &format!(r#"{{"name":"u","email":"{email}","password":"pw"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    login(app, email, "pw").await
}

async fn login(app: &Router, email: &str, password: &str) -> String {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/user/login",
            &format!(r#"{{"email":"{email}","password":"{password}"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["token"].as_str().unwrap().to_string()
}

async fn create_post(app: &Router, token: &str, title: &str) -> Post {
    let resp = app
        .clone()
        .oneshot(authed_request(
            "POST",
            "/post/new",
            token,
            &format!(r#"{{"title":"{title}","content":"c"}}"#),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    serde_json::from_value(body_json(resp).await["data"].clone()).unwrap()
}

// --- register ---

#[tokio::test]
async fn register_returns_201_with_wrapped_user() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/user/new",
            r#"{"name":"Alice","email":"alice@example.com","password":"pw"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = body_json(resp).await;
    let user: User = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(user.email, "alice@example.com");
    assert!(!user.is_admin);
}

#[tokio::test]
async fn register_duplicate_email_returns_400_with_message() {
    let app = app();
    register_and_login(&app, "dup@example.com").await;

    let resp = app
        .oneshot(json_request(
            "POST",
            "/user/new",
            r#"{"name":"Other","email":"dup@example.com","password":"pw2"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["message"], "email already taken");
}

#[tokio::test]
async fn register_blank_name_returns_400() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/user/new",
            r#"{"name":"","email":"a@b.c","password":"pw"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn register_malformed_json_returns_422() {
    let app = app();
    let resp = app
        .oneshot(json_request("POST", "/user/new", r#"{"name":"x"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- login / profile ---

#[tokio::test]
async fn login_wrong_password_returns_401() {
    let app = app();
    register_and_login(&app, "a@example.com").await;

    let resp = app
        .oneshot(json_request(
            "POST",
            "/user/login",
            r#"{"email":"a@example.com","password":"wrong"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(resp).await["message"], "invalid credentials");
}

#[tokio::test]
async fn profile_returns_authenticated_user() {
    let app = app();
    let token = register_and_login(&app, "me@example.com").await;

    let resp = app
        .oneshot(authed_request("GET", "/user/monprofil", &token, ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["email"], "me@example.com");
}

#[tokio::test]
async fn profile_without_token_returns_401() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/user/monprofil")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_with_unknown_token_returns_401() {
    let app = app();
    let resp = app
        .oneshot(authed_request("GET", "/user/monprofil", "bogus", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- user listing ---

#[tokio::test]
async fn list_users_requires_admin() {
    let app = app();
    let token = register_and_login(&app, "pleb@example.com").await;

    let resp = app
        .oneshot(authed_request("GET", "/user/all", &token, ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(resp).await["message"], "admin rights required");
}

#[tokio::test]
async fn list_users_as_admin_returns_all_accounts() {
    let state = db();
    let app = app_with(state.clone());
    seed_admin(&state, "root", "root@example.com", "pw").await;
    register_and_login(&app, "user@example.com").await;
    let admin_token = login(&app, "root@example.com", "pw").await;

    let resp = app
        .oneshot(authed_request("GET", "/user/all", &admin_token, ""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let users = body_json(resp).await["data"].as_array().unwrap().len();
    assert_eq!(users, 2);
}

// --- posts ---

#[tokio::test]
async fn list_posts_empty() {
    let app = app();
    let resp = app
        .oneshot(Request::builder().uri("/post/all").body(String::new()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_json(resp).await["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_post_without_token_returns_401() {
    let app = app();
    let resp = app
        .oneshot(json_request(
            "POST",
            "/post/new",
            r#"{"title":"T","content":"C"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn created_post_is_attributed_to_author() {
    let app = app();
    let token = register_and_login(&app, "author@example.com").await;
    let post = create_post(&app, &token, "Hello").await;

    assert_eq!(post.title, "Hello");
    assert_eq!(post.author, "u");

    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!("/post/{}", post.id))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["title"], "Hello");
}

#[tokio::test]
async fn get_missing_post_returns_404() {
    let app = app();
    let resp = app
        .oneshot(
            Request::builder()
                .uri("/post/00000000-0000-0000-0000-000000000000")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn owner_can_update_own_post() {
    let app = app();
    let token = register_and_login(&app, "owner@example.com").await;
    let post = create_post(&app, &token, "Before").await;

    let resp = app
        .oneshot(authed_request(
            "PUT",
            &format!("/post/updateOwnPost/{}", post.id),
            &token,
            r#"{"title":"After"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["data"]["title"], "After");
    assert_eq!(body["data"]["content"], "c");
}

#[tokio::test]
async fn non_owner_update_own_post_returns_403() {
    let app = app();
    let owner_token = register_and_login(&app, "owner@example.com").await;
    let other_token = register_and_login(&app, "other@example.com").await;
    let post = create_post(&app, &owner_token, "Mine").await;

    let resp = app
        .oneshot(authed_request(
            "PUT",
            &format!("/post/updateOwnPost/{}", post.id),
            &other_token,
            r#"{"title":"Stolen"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(resp).await["message"], "not the owner");
}

#[tokio::test]
async fn privileged_update_requires_admin() {
    let app = app();
    let owner_token = register_and_login(&app, "owner@example.com").await;
    let other_token = register_and_login(&app, "other@example.com").await;
    let post = create_post(&app, &owner_token, "Mine").await;

    let resp = app
        .oneshot(authed_request(
            "PUT",
            &format!("/post/update/{}", post.id),
            &other_token,
            r#"{"title":"Nope"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_can_update_any_post() {
    let state = db();
    let app = app_with(state.clone());
    seed_admin(&state, "root", "root@example.com", "pw").await;
    let owner_token = register_and_login(&app, "owner@example.com").await;
    let admin_token = login(&app, "root@example.com", "pw").await;
    let post = create_post(&app, &owner_token, "Original").await;

    let resp = app
        .oneshot(authed_request(
            "PUT",
            &format!("/post/update/{}", post.id),
            &admin_token,
            r#"{"content":"moderated"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["data"]["content"], "moderated");
}

#[tokio::test]
async fn owner_can_delete_own_post() {
    let app = app();
    let token = register_and_login(&app, "owner@example.com").await;
    let post = create_post(&app, &token, "Doomed").await;

    let resp = app
        .clone()
        .oneshot(authed_request(
            "DELETE",
            &format!("/post/deleteOwnPost/{}", post.id),
            &token,
            "",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    let resp = app
        .oneshot(
            Request::builder()
                .uri(format!("/post/{}", post.id))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_owner_delete_own_post_returns_403() {
    let app = app();
    let owner_token = register_and_login(&app, "owner@example.com").await;
    let other_token = register_and_login(&app, "other@example.com").await;
    let post = create_post(&app, &owner_token, "Mine").await;

    let resp = app
        .oneshot(authed_request(
            "DELETE",
            &format!("/post/deleteOwnPost/{}", post.id),
            &other_token,
            "",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn admin_can_delete_any_post() {
    let state = db();
    let app = app_with(state.clone());
    seed_admin(&state, "root", "root@example.com", "pw").await;
    let owner_token = register_and_login(&app, "owner@example.com").await;
    let admin_token = login(&app, "root@example.com", "pw").await;
    let post = create_post(&app, &owner_token, "Flagged").await;

    let resp = app
        .oneshot(authed_request(
            "DELETE",
            &format!("/post/delete/{}", post.id),
            &admin_token,
            "",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
