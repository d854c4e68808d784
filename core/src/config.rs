//! Backend endpoint configuration.
//!
//! The base URL is environment-dependent and not part of the API contract;
//! hosts pick it up from `BLOG_API_URL` or fall back to the local default.

/// Where the backend lives.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

impl ApiConfig {
    pub const DEFAULT_BASE_URL: &'static str = "http://127.0.0.1:3000";

    /// Read the base URL from `BLOG_API_URL`, defaulting to localhost.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("BLOG_API_URL").unwrap_or_else(|_| Self::DEFAULT_BASE_URL.to_string());
        Self { base_url }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
        }
    }
}
