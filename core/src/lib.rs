//! Client logic for a small blogging backend.
//!
//! # Overview
//! Two cooperating pieces: `SessionManager` owns authentication state
//! (token acquisition, persistence across restarts, propagation into
//! requests) and `PostClient` is a stateless CRUD surface for post
//! resources. Both build `HttpRequest` values and parse `HttpResponse`
//! values without touching the network (host-does-IO pattern); the
//! embedding host executes each round-trip, so the crate stays fully
//! deterministic and testable.
//!
//! # Design
//! - `SessionManager` is an explicit value with a defined lifecycle:
//!   `restore()` at startup, `logout()` as teardown. No ambient globals.
//! - Login is two round-trips (token, then profile) exposed as one atomic
//!   operation via `PendingLogin`; a failed second step discards the token.
//! - `WriteScope::for_actor` is the single place the own-vs-privileged
//!   endpoint choice is made.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//! - No retries, caching, or request cancellation anywhere; every
//!   operation is a single request/response exchange.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod session;
pub mod storage;
pub mod types;

pub use client::{PostClient, WriteScope};
pub use config::ApiConfig;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{check_password_confirmation, PendingLogin, SessionManager};
pub use storage::{FileStore, MemoryStore, SessionStore};
pub use types::{
    CreatePost, Envelope, LoginResponse, LoginUser, Post, RegisterUser, Session, UpdatePost, User,
};
