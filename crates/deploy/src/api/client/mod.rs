#[allow(clippy::module_inception)]
mod client;
mod error;

pub use client::PagesClient;
pub use error::ApiError;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

/// A typed request against the account's Pages projects collection.
///
/// `projects_url` is `<api>/accounts/<account>/pages/projects`.
pub trait ApiRequest {
    type Response: DeserializeOwned;

    fn build_request(self, projects_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError>;
}

/// Append path segments to `base`, percent-encoding each one.
pub fn endpoint(base: &Url, segments: &[&str]) -> Result<Url, ApiError> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| ApiError::InvalidBaseUrl(base.clone()))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
