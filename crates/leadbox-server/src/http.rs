use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::Service;
use hyper_util::rt::TokioIo;
use leadbox_http::{Handler, Middleware, MiddlewareChain, Request, Response};
use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tokio::task::JoinSet;

use crate::shutdown::{ShutdownCoordinator, wait_for_shutdown};

/// Errors that stop the server.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	#[error("failed to bind {addr}: {source}")]
	Bind {
		addr: SocketAddr,
		source: std::io::Error,
	},
	#[error("failed to accept connection: {0}")]
	Accept(std::io::Error),
}

/// HTTP/1.1 server that dispatches every request to one [`Handler`].
pub struct HttpServer {
	pub handler: Arc<dyn Handler>,
	pub(crate) middlewares: Vec<Arc<dyn Middleware>>,
}

impl HttpServer {
	pub fn new(handler: Arc<dyn Handler>) -> Self {
		Self {
			handler,
			middlewares: Vec::new(),
		}
	}

	pub fn with_middleware(mut self, middleware: Arc<dyn Middleware>) -> Self {
		self.middlewares.push(middleware);
		self
	}

	fn build_handler(&self) -> Arc<dyn Handler> {
		if self.middlewares.is_empty() {
			return self.handler.clone();
		}

		let mut chain = MiddlewareChain::new(self.handler.clone());
		for middleware in &self.middlewares {
			chain.add_middleware(middleware.clone());
		}

		Arc::new(chain)
	}

	/// Bind `addr` and serve until `coordinator` signals shutdown.
	pub async fn listen_with_shutdown(
		self,
		addr: SocketAddr,
		coordinator: ShutdownCoordinator,
	) -> Result<(), ServerError> {
		let listener = TcpListener::bind(addr)
			.await
			.map_err(|source| ServerError::Bind { addr, source })?;
		self.serve(listener, coordinator).await
	}

	/// Serve connections from an already bound listener.
	///
	/// After shutdown is signalled no new connections are accepted; open
	/// connections finish their current request and close, bounded by the
	/// coordinator's drain timeout.
	pub async fn serve(
		self,
		listener: TcpListener,
		coordinator: ShutdownCoordinator,
	) -> Result<(), ServerError> {
		if let Ok(local) = listener.local_addr() {
			tracing::info!("Server listening on http://{}", local);
		}

		let handler = self.build_handler();
		let mut shutdown_rx = coordinator.subscribe();
		let mut connections = JoinSet::new();

		loop {
			tokio::select! {
				result = listener.accept() => {
					let (stream, socket_addr) = result.map_err(ServerError::Accept)?;
					let handler = handler.clone();
					let conn_shutdown = coordinator.subscribe();

					connections.spawn(async move {
						if let Err(err) = Self::handle_connection(stream, socket_addr, handler, conn_shutdown).await {
							tracing::debug!(remote = %socket_addr, error = %err, "Error handling connection");
						}
					});
				}
				Some(_) = connections.join_next(), if !connections.is_empty() => {}
				_ = wait_for_shutdown(&mut shutdown_rx) => {
					tracing::info!("Shutdown signal received, stopping server...");
					break;
				}
			}
		}

		drop(listener);
		let drain = async { while connections.join_next().await.is_some() {} };
		if tokio::time::timeout(coordinator.drain_timeout(), drain).await.is_err() {
			tracing::warn!("Drain timeout elapsed, aborting open connections");
			connections.abort_all();
		}

		Ok(())
	}

	async fn handle_connection(
		stream: TcpStream,
		socket_addr: SocketAddr,
		handler: Arc<dyn Handler>,
		mut shutdown: watch::Receiver<bool>,
	) -> Result<(), hyper::Error> {
		let io = TokioIo::new(stream);
		let service = RequestService {
			handler,
			remote_addr: socket_addr,
		};

		let conn = http1::Builder::new().serve_connection(io, service);
		tokio::pin!(conn);

		tokio::select! {
			result = conn.as_mut() => result,
			_ = wait_for_shutdown(&mut shutdown) => {
				conn.as_mut().graceful_shutdown();
				conn.await
			}
		}
	}
}

struct RequestService {
	handler: Arc<dyn Handler>,
	remote_addr: SocketAddr,
}

impl Service<hyper::Request<Incoming>> for RequestService {
	type Response = hyper::Response<Full<Bytes>>;
	type Error = Box<dyn std::error::Error + Send + Sync>;
	type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send + 'static>>;

	fn call(&self, req: hyper::Request<Incoming>) -> Self::Future {
		let handler = self.handler.clone();
		let remote_addr = self.remote_addr;

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let body_bytes = body.collect().await?.to_bytes();

			let mut request = Request::new(
				parts.method,
				parts.uri,
				parts.version,
				parts.headers,
				body_bytes,
			);
			request.remote_addr = Some(remote_addr);

			let response = handler.handle(request).await.unwrap_or_else(Response::from);

			let mut hyper_response = hyper::Response::builder().status(response.status);
			for (key, value) in response.headers.iter() {
				hyper_response = hyper_response.header(key, value);
			}

			Ok(hyper_response.body(Full::new(response.body))?)
		})
	}
}

/// Serve `handler` on `addr` until `coordinator` signals shutdown.
pub async fn serve_with_shutdown(
	addr: SocketAddr,
	handler: Arc<dyn Handler>,
	coordinator: ShutdownCoordinator,
) -> Result<(), ServerError> {
	HttpServer::new(handler)
		.listen_with_shutdown(addr, coordinator)
		.await
}
