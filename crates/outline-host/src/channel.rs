//! Serialized message channel into a page context.
//!
//! Requests travel as JSON strings over an mpsc queue; each carries a
//! oneshot sender for its JSON reply. Only plain data crosses the channel.

use std::sync::Arc;
use std::time::Duration;

use outline_analyzer::PageAnalyzer;
use outline_protocols::{AnalyzerRequest, AnalyzerResponse, HostError, PageId};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, trace, warn};

const QUEUE_DEPTH: usize = 32;

/// One request waiting for its reply.
pub(crate) struct Envelope {
    pub payload: String,
    pub reply: oneshot::Sender<String>,
}

/// Sending half of an analyzer listener.
#[derive(Clone)]
pub(crate) struct AnalyzerChannel {
    page: PageId,
    sender: mpsc::Sender<Envelope>,
}

impl AnalyzerChannel {
    /// Spawn a listener answering requests with `analyzer`. Each request is
    /// handled on its own task, so a ping is answered while an analysis runs.
    pub(crate) fn spawn(page: PageId, analyzer: Arc<PageAnalyzer>) -> Self {
        let (sender, mut receiver) = mpsc::channel::<Envelope>(QUEUE_DEPTH);

        tokio::spawn(async move {
            while let Some(envelope) = receiver.recv().await {
                let analyzer = Arc::clone(&analyzer);
                tokio::spawn(async move {
                    match analyzer.handle_json(&envelope.payload).await {
                        Ok(reply) => {
                            trace!("Analyzer reply: {}", reply);
                            let _ = envelope.reply.send(reply);
                        }
                        Err(e) => warn!("Failed to encode analyzer reply: {}", e),
                    }
                });
            }
            debug!("Analyzer listener for {} stopped", page);
        });

        Self { page, sender }
    }

    /// Whether the listener is still running.
    pub(crate) fn is_open(&self) -> bool {
        !self.sender.is_closed()
    }

    /// Send a request and wait for the reply.
    pub(crate) async fn request(
        &self,
        request: &AnalyzerRequest,
        timeout: Duration,
    ) -> Result<AnalyzerResponse, HostError> {
        let payload = serde_json::to_string(request)?;
        trace!("Sending to {}: {}", self.page, payload);

        let (reply, rx) = oneshot::channel();
        self.sender
            .send(Envelope { payload, reply })
            .await
            .map_err(|_| HostError::NoReceiver(self.page))?;

        match tokio::time::timeout(timeout, rx).await {
            Ok(Ok(raw)) => Ok(serde_json::from_str(&raw)?),
            Ok(Err(_)) => Err(HostError::ChannelClosed),
            Err(_) => Err(HostError::Timeout(format!(
                "{} to {} after {:?}",
                request.action(),
                self.page,
                timeout
            ))),
        }
    }
}
