pub mod cors;

use anyhow::{Context, Result};
use poem::{http::HeaderValue, Endpoint, Middleware};

/// Answers CORS pre-flight requests and stamps the CORS headers on every
/// response. Only GET and POST reach the wrapped endpoint.
#[derive(Debug, Clone)]
pub struct CorsPreflight {
    origin: HeaderValue,
}

impl CorsPreflight {
    pub fn new(origin: &str) -> Result<Self> {
        let origin = HeaderValue::from_str(origin)
            .with_context(|| format!("invalid CORS origin {origin:?}"))?;
        Ok(Self { origin })
    }
}

impl<E: Endpoint> Middleware<E> for CorsPreflight {
    type Output = cors::CorsEndpoint<E>;

    fn transform(&self, ep: E) -> Self::Output {
        cors::CorsEndpoint {
            inner: ep,
            origin: self.origin.clone(),
        }
    }
}
