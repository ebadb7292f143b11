use std::error::Error;

use url::Url;

#[derive(Debug, Clone)]
pub struct OpContext {
    /// Platform API root every client of this run talks to
    pub api_url: Url,
}

impl OpContext {
    pub fn new(api_url: Url) -> Self {
        Self { api_url }
    }
}

#[async_trait::async_trait]
pub trait Op: Send + Sync {
    type Error: Error + Send + Sync + 'static;
    type Output;

    async fn execute(&self, ctx: &OpContext) -> Result<Self::Output, Self::Error>;
}
