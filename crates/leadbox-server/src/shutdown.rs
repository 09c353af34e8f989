//! Graceful shutdown coordination

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

/// Publishes a single shutdown notification to the accept loop and every
/// open connection. The flag is sticky: receivers created after
/// [`ShutdownCoordinator::shutdown`] still observe it.
#[derive(Debug, Clone)]
pub struct ShutdownCoordinator {
	sender: Arc<watch::Sender<bool>>,
	drain_timeout: Duration,
}

impl ShutdownCoordinator {
	/// `drain_timeout` bounds how long in-flight connections may take to finish.
	pub fn new(drain_timeout: Duration) -> Self {
		let (sender, _) = watch::channel(false);
		Self {
			sender: Arc::new(sender),
			drain_timeout,
		}
	}

	pub fn subscribe(&self) -> watch::Receiver<bool> {
		self.sender.subscribe()
	}

	/// Ask the server to stop accepting connections.
	pub fn shutdown(&self) {
		self.sender.send_replace(true);
	}

	pub fn is_shutdown(&self) -> bool {
		*self.sender.borrow()
	}

	/// Resolves once shutdown has been requested.
	pub async fn wait(&self) {
		wait_for_shutdown(&mut self.subscribe()).await;
	}

	pub fn drain_timeout(&self) -> Duration {
		self.drain_timeout
	}
}

pub(crate) async fn wait_for_shutdown(receiver: &mut watch::Receiver<bool>) {
	// The sender lives as long as any coordinator clone, so an error means
	// nobody can signal anymore and waiting further is pointless.
	let _ = receiver.wait_for(|stopped| *stopped).await;
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
	let ctrl_c = async {
		if let Err(e) = tokio::signal::ctrl_c().await {
			tracing::error!(error = %e, "Failed to listen for Ctrl-C");
			std::future::pending::<()>().await;
		}
	};

	#[cfg(unix)]
	let terminate = async {
		match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
			Ok(mut signal) => {
				signal.recv().await;
			}
			Err(e) => {
				tracing::error!(error = %e, "Failed to listen for SIGTERM");
				std::future::pending::<()>().await;
			}
		}
	};

	#[cfg(not(unix))]
	let terminate = std::future::pending::<()>();

	tokio::select! {
		_ = ctrl_c => {},
		_ = terminate => {},
	}

	tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_subscribers_receive_shutdown() {
		let coordinator = ShutdownCoordinator::new(Duration::from_secs(1));
		let mut first = coordinator.subscribe();
		let mut second = coordinator.clone().subscribe();

		coordinator.shutdown();

		wait_for_shutdown(&mut first).await;
		wait_for_shutdown(&mut second).await;
		assert!(coordinator.is_shutdown());
	}

	#[tokio::test]
	async fn test_late_subscribers_still_see_shutdown() {
		let coordinator = ShutdownCoordinator::new(Duration::from_secs(1));
		coordinator.shutdown();

		coordinator.wait().await;

		assert_eq!(coordinator.drain_timeout(), Duration::from_secs(1));
	}
}
