use std::sync::Arc;

use anyhow::Result;
use poem::{
    endpoint::BoxEndpoint,
    listener::{Acceptor, Listener, TcpListener},
    middleware::CatchPanic,
    post, EndpointExt, Route, Server,
};
use tokio::sync::{Notify, Semaphore};
use tracing::info;

use crate::{
    api::{compress::compress_image, convert::png_to_jpg, resize::resize_image},
    config::Settings,
    core::ImageProcessor,
    middleware::CorsPreflight,
};

/// Immutable state shared by every request.
pub struct AppState {
    pub processor: Arc<dyn ImageProcessor>,
    pub jobs: Arc<Semaphore>,
    pub max_dimension: u32,
    pub legacy_error_status: bool,
}

/// Stops a running [`ImageService`] from another task.
#[derive(Clone)]
pub struct ShutdownHandle(Arc<Notify>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.0.notify_one();
    }
}

pub struct ImageService {
    settings: Settings,
    state: Arc<AppState>,
    cors: Option<CorsPreflight>,
    shutdown: Arc<Notify>,
}

impl ImageService {
    pub fn new(settings: Settings, processor: Arc<dyn ImageProcessor>) -> Result<Self> {
        let cors = settings
            .cors_origin
            .as_deref()
            .map(CorsPreflight::new)
            .transpose()?;

        let state = Arc::new(AppState {
            processor,
            jobs: Arc::new(Semaphore::new(settings.max_concurrent_jobs)),
            max_dimension: settings.max_dimension,
            legacy_error_status: settings.legacy_error_status,
        });

        Ok(Self {
            settings,
            state,
            cors,
            shutdown: Arc::new(Notify::new()),
        })
    }

    pub fn routes(&self) -> BoxEndpoint<'static> {
        let app = Route::new()
            .at("/PngToJpg", post(png_to_jpg))
            .at("/ResizeImage", post(resize_image))
            .at("/CompressImage", post(compress_image));

        let app = match &self.cors {
            Some(cors) => app.with(cors.clone()).boxed(),
            None => app.boxed(),
        };

        app.data(self.state.clone()).with(CatchPanic::new()).boxed()
    }

    /// Binds `addr` and serves until [`ImageService::shutdown`] is called.
    pub async fn start(&self, addr: &str) -> Result<()> {
        let acceptor = TcpListener::bind(addr).into_acceptor().await?;
        let addrs: Vec<String> = acceptor
            .local_addr()
            .iter()
            .map(|local| local.0.to_string())
            .collect();
        info!("listening on {}", addrs.join(", "));
        if let Some(origin) = &self.settings.cors_origin {
            info!("cors enabled for origin {}", origin);
        }

        let shutdown = self.shutdown.clone();
        Server::new_with_acceptor(acceptor)
            .run_with_graceful_shutdown(
                self.routes(),
                async move { shutdown.notified().await },
                Some(self.settings.shutdown_timeout),
            )
            .await?;

        info!("server stopped");
        Ok(())
    }

    /// Stops accepting connections and lets in-flight requests drain.
    /// Takes effect even when called before `start` begins waiting.
    pub fn shutdown(&self) {
        self.shutdown.notify_one();
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(self.shutdown.clone())
    }
}
