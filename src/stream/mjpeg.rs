// SPDX-License-Identifier: GPL-3.0-or-later
use bytes::Bytes;
use futures::stream::StreamExt;
use hyper::Body;
use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;

use std::sync::Arc;

use super::client_count::ClientCounter;
use super::multipart::Framer;

/// Fan-out point for framed MJPEG parts.
///
/// A single writer (the render task) publishes each completed part; every
/// connected client reads through its own handle on the watch channel. The
/// channel is a single slot, so a slow client skips straight to the newest
/// part instead of accumulating a backlog.
#[derive(Clone, Debug)]
pub(crate) struct MjpegStream {
    framer: Framer,
    clients: ClientCounter,
    tx_handle: Arc<watch::Sender<Bytes>>,
    rx_handle: watch::Receiver<Bytes>,
}

impl MjpegStream {
    pub(crate) fn new(clients: &ClientCounter) -> Self {
        let (tx, rx) = watch::channel(Bytes::new());
        Self {
            framer: Framer::new(),
            clients: clients.clone(),
            tx_handle: Arc::new(tx),
            rx_handle: rx,
        }
    }

    pub(crate) fn content_type(&self) -> String {
        self.framer.content_type()
    }

    /// Build the streaming response body for one client connection.
    ///
    /// The body owns a client token, so the live-client count drops as soon
    /// as hyper tears the body down, whether by a clean disconnect or a
    /// transport error. That teardown is the only cancellation mechanism a
    /// connection has.
    pub(crate) fn body(&self) -> Body {
        let token = self.clients.token();
        let parts = WatchStream::new(self.rx_handle.clone())
            // Skip the placeholder the channel is created with.
            .filter(|part| futures::future::ready(!part.is_empty()))
            .map(move |part| {
                let _held = &token;
                Result::<Bytes, hyper::http::Error>::Ok(part)
            });
        Body::wrap_stream(parts)
    }

    /// A bare handle on the part channel, for observing publishes in tests.
    #[cfg(test)]
    pub(crate) fn rx_probe(&self) -> watch::Receiver<Bytes> {
        self.rx_handle.clone()
    }

    /// Frame a JPEG image and publish it to every connected client.
    pub(crate) fn send_frame(&self, jpeg: &[u8]) {
        let part = self.framer.frame(jpeg);
        // Send failures just mean no clients are connected right now.
        let _ = self.tx_handle.send(part);
    }
}
