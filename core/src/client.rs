//! Stateless HTTP request builder and response parser for post resources.
//!
//! # Design
//! `PostClient` holds only a `base_url` and carries no mutable state between
//! calls. Each operation is split into a `build_*` method that produces an
//! `HttpRequest` and a `parse_*` method that consumes an `HttpResponse`; the
//! host executes the round-trip in between. Reads are anonymous; mutations
//! take the bearer token obtained from `SessionManager`.
//!
//! The backend exposes two endpoints per mutation — one for the post's
//! owner, one for privileged (admin) actors. `WriteScope` collapses that
//! split into a single operation: `WriteScope::for_actor` is the one place
//! the ownership decision is made, so no calling screen branches on it.

use uuid::Uuid;

use crate::error::{check_status, ApiError};
use crate::http::{json_request, parse_body, HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreatePost, Envelope, Post, UpdatePost, User};

/// Which mutation endpoint a write goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteScope {
    /// The actor owns the post; routes through the `OwnPost` endpoints.
    Own,
    /// The actor is editing someone else's post; routes through the
    /// privileged endpoints, which the backend restricts to admins.
    Any,
}

impl WriteScope {
    /// Select the endpoint for `actor` mutating a post owned by `owner_id`.
    ///
    /// The single ownership check in the codebase. A non-admin actor who
    /// does not own the post is routed through the privileged endpoint and
    /// rejected by the backend with 403.
    pub fn for_actor(actor: &User, owner_id: Uuid) -> WriteScope {
        if actor.id == owner_id {
            WriteScope::Own
        } else {
            WriteScope::Any
        }
    }
}

/// Stateless client for post CRUD, parameterized by an optional bearer
/// token per call.
#[derive(Debug, Clone)]
pub struct PostClient {
    base_url: String,
}

impl PostClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Anonymous read of every post, in backend order.
    pub fn build_list_posts(&self) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/post/all", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_get_post(&self, id: Uuid) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/post/{id}", self.base_url),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn build_create_post(
        &self,
        input: &CreatePost,
        token: &str,
    ) -> Result<HttpRequest, ApiError> {
        if input.title.trim().is_empty() {
            return Err(ApiError::Validation("title is required".to_string()));
        }
        let req = json_request(
            HttpMethod::Post,
            format!("{}/post/new", self.base_url),
            input,
        )?;
        Ok(req.with_bearer(token))
    }

    pub fn build_update_post(
        &self,
        id: Uuid,
        input: &UpdatePost,
        token: &str,
        scope: WriteScope,
    ) -> Result<HttpRequest, ApiError> {
        let path = match scope {
            WriteScope::Own => format!("{}/post/updateOwnPost/{id}", self.base_url),
            WriteScope::Any => format!("{}/post/update/{id}", self.base_url),
        };
        let req = json_request(HttpMethod::Put, path, input)?;
        Ok(req.with_bearer(token))
    }

    pub fn build_delete_post(&self, id: Uuid, token: &str, scope: WriteScope) -> HttpRequest {
        let path = match scope {
            WriteScope::Own => format!("{}/post/deleteOwnPost/{id}", self.base_url),
            WriteScope::Any => format!("{}/post/delete/{id}", self.base_url),
        };
        HttpRequest {
            method: HttpMethod::Delete,
            path,
            headers: Vec::new(),
            body: None,
        }
        .with_bearer(token)
    }

    pub fn parse_list_posts(&self, response: HttpResponse) -> Result<Vec<Post>, ApiError> {
        check_status(&response, 200)?;
        parse_body::<Envelope<Vec<Post>>>(&response.body).map(Envelope::into_inner)
    }

    pub fn parse_get_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_status(&response, 200)?;
        parse_body::<Envelope<Post>>(&response.body).map(Envelope::into_inner)
    }

    pub fn parse_create_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_status(&response, 201)?;
        parse_body::<Envelope<Post>>(&response.body).map(Envelope::into_inner)
    }

    pub fn parse_update_post(&self, response: HttpResponse) -> Result<Post, ApiError> {
        check_status(&response, 200)?;
        parse_body::<Envelope<Post>>(&response.body).map(Envelope::into_inner)
    }

    pub fn parse_delete_post(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response, 204)?;
        Ok(())
    }
}
