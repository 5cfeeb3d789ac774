use poem::{
    http::{
        header::{
            ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
            ACCESS_CONTROL_ALLOW_ORIGIN,
        },
        HeaderValue, Method, StatusCode,
    },
    Endpoint, IntoResponse, Request, Response, Result,
};
use tracing::debug;

pub const ALLOWED_METHODS: &str = "POST, OPTIONS, GET";

pub struct CorsEndpoint<E> {
    pub(crate) inner: E,
    pub(crate) origin: HeaderValue,
}

impl<E: Endpoint> Endpoint for CorsEndpoint<E> {
    type Output = Response;

    async fn call(&self, req: Request) -> Result<Self::Output> {
        let method = req.method().clone();
        let mut resp = match method {
            Method::GET | Method::POST => match self.inner.call(req).await {
                Ok(resp) => resp.into_response(),
                Err(err) => err.into_response(),
            },
            Method::OPTIONS => Response::builder().status(StatusCode::OK).finish(),
            _ => {
                debug!("cors: rejecting {}", method);
                Response::builder()
                    .status(StatusCode::METHOD_NOT_ALLOWED)
                    .finish()
            }
        };

        let headers = resp.headers_mut();
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, self.origin.clone());
        headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static(ALLOWED_METHODS),
        );

        Ok(resp)
    }
}
