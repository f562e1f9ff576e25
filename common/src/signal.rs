use std::io;

use tokio::signal::unix::{signal, Signal, SignalKind};
use tokio::sync::mpsc;

/// Fans a set of unix signals into a single receiver.
pub struct SignalHandler {
	sender: mpsc::Sender<SignalKind>,
	receiver: mpsc::Receiver<SignalKind>,
	received: usize,
}

impl Default for SignalHandler {
	fn default() -> Self {
		let (sender, receiver) = mpsc::channel(1);
		Self {
			sender,
			receiver,
			received: 0,
		}
	}
}

impl SignalHandler {
	pub fn new() -> Self {
		Self::default()
	}

	/// Listens for SIGINT and SIGTERM.
	pub fn shutdown() -> io::Result<Self> {
		Self::new()
			.with_signal(SignalKind::interrupt())?
			.with_signal(SignalKind::terminate())
	}

	pub fn with_signal(self, kind: SignalKind) -> io::Result<Self> {
		let stream = signal(kind)?;
		tokio::spawn(forward(stream, kind, self.sender.clone()));
		Ok(self)
	}

	/// Waits for the next signal. The handler holds a sender itself, so the
	/// channel never closes while it is alive.
	pub async fn recv(&mut self) -> SignalKind {
		let kind = match self.receiver.recv().await {
			Some(kind) => kind,
			None => std::future::pending().await,
		};

		self.received += 1;
		tracing::info!(signal = ?kind, received = self.received, "received signal");

		kind
	}

	/// Signals returned by [`SignalHandler::recv`] so far.
	pub fn received(&self) -> usize {
		self.received
	}
}

async fn forward(mut stream: Signal, kind: SignalKind, sender: mpsc::Sender<SignalKind>) {
	while stream.recv().await.is_some() {
		if sender.send(kind).await.is_err() {
			break;
		}
	}
}
