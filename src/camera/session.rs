// SPDX-License-Identifier: GPL-3.0-or-later
use anyhow::Context as _;
use bytes::BytesMut;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use super::protocol::{split_messages, Command, Message, StreamArgs};
use crate::frame::RadiometricFrame;

/// A readable handle on the most recently acquired frame.
///
/// The slot starts out empty and holds the latest complete frame afterwards.
/// Readers get atomic snapshots and never block the camera read task; a slow
/// reader simply skips to whatever is newest.
pub(crate) type FrameSource = watch::Receiver<Option<Arc<RadiometricFrame>>>;

const READ_CAPACITY: usize = 64 * 1024;

/// An open command session with a tCam device.
///
/// The session owns a background read task that splits the camera's framed
/// JSON messages out of the TCP stream, publishing frames into the single-slot
/// frame source and everything else into a response channel.
#[derive(Debug)]
pub(crate) struct Session {
    writer: OwnedWriteHalf,
    frames: FrameSource,
    responses: mpsc::Receiver<serde_json::Value>,
    read_task: JoinHandle<anyhow::Result<()>>,
}

impl Session {
    const RESPONSE_TIMEOUT: Duration = Duration::from_secs(10);

    pub(crate) async fn connect(address: SocketAddr) -> anyhow::Result<Self> {
        info!(%address, "connecting to camera");
        let stream = TcpStream::connect(address)
            .await
            .context("Error connecting to the camera")?;
        let (reader, writer) = stream.into_split();
        let (frame_tx, frame_rx) = watch::channel(None);
        let (response_tx, response_rx) = mpsc::channel(8);
        let read_task = tokio::spawn(read_loop(reader, frame_tx, response_tx));
        Ok(Self {
            writer,
            frames: frame_rx,
            responses: response_rx,
            read_task,
        })
    }

    /// A new handle on the latest-frame slot.
    pub(crate) fn frame_source(&self) -> FrameSource {
        self.frames.clone()
    }

    async fn send_command(&mut self, command: Command) -> anyhow::Result<()> {
        let encoded = command.encode()?;
        self.writer
            .write_all(&encoded)
            .await
            .context("Error sending command to the camera")
    }

    /// Wait for the next non-frame response from the camera.
    async fn next_response(&mut self) -> anyhow::Result<serde_json::Value> {
        tokio::time::timeout(Self::RESPONSE_TIMEOUT, self.responses.recv())
            .await
            .context("Timed out waiting for a camera response")?
            .ok_or_else(|| anyhow::anyhow!("Camera connection closed"))
    }

    /// Request a single frame and wait for it to land in the frame source.
    ///
    /// Run once at startup so the server never goes live before a displayable
    /// frame exists.
    pub(crate) async fn prime(&mut self) -> anyhow::Result<()> {
        self.send_command(Command::GetImage).await?;
        let mut frames = self.frames.clone();
        let first_frame = async {
            while frames.borrow_and_update().is_none() {
                frames.changed().await?;
            }
            anyhow::Result::<()>::Ok(())
        };
        tokio::time::timeout(Self::RESPONSE_TIMEOUT, first_frame)
            .await
            .context("Timed out waiting for the first frame")??;
        debug!("first frame primed");
        Ok(())
    }

    /// Put the camera into continuous streaming mode.
    pub(crate) async fn start_stream(&mut self) -> anyhow::Result<()> {
        self.send_command(Command::StreamOn {
            args: StreamArgs::default(),
        })
        .await?;
        let response = self
            .next_response()
            .await
            .context("Error starting the camera stream")?;
        debug!(?response, "camera acknowledged stream start");
        Ok(())
    }

    /// Stop streaming and tear the connection down.
    pub(crate) async fn shutdown(mut self) -> anyhow::Result<()> {
        // Best effort; the camera may already be gone.
        if let Err(error) = self.send_command(Command::StreamOff).await {
            warn!(?error, "unable to stop the camera stream cleanly");
        }
        self.read_task.abort();
        self.writer
            .shutdown()
            .await
            .context("Error closing the camera connection")?;
        info!("camera session closed");
        Ok(())
    }
}

/// Continuously read the camera connection, routing messages by kind.
///
/// Frame messages replace the current value of the frame slot; responses go
/// to the (small, non-blocking) response channel. Malformed frames are
/// dropped here so they can never reach a client; the previous frame stays in
/// the slot until a good one replaces it.
async fn read_loop<R>(
    mut reader: R,
    frames: watch::Sender<Option<Arc<RadiometricFrame>>>,
    responses: mpsc::Sender<serde_json::Value>,
) -> anyhow::Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut scratch = BytesMut::with_capacity(READ_CAPACITY);
    loop {
        let read = reader
            .read_buf(&mut scratch)
            .await
            .context("Error reading from the camera")?;
        if read == 0 {
            anyhow::bail!("Camera closed the connection");
        }
        for raw in split_messages(&mut scratch) {
            match Message::parse(&raw) {
                Ok(Message::Frame(frame_message)) => match frame_message.decode() {
                    Ok(frame) => {
                        trace!("received radiometric frame");
                        // Send errors just mean there are no frame readers yet.
                        let _ = frames.send(Some(Arc::new(frame)));
                    }
                    Err(error) => warn!(?error, "discarding malformed frame"),
                },
                Ok(Message::Status(value)) => {
                    debug!(response = ?value, "camera response");
                    // try_send so an unread response can never stall frame
                    // delivery. The channel is only drained during startup.
                    match responses.try_send(value) {
                        Ok(()) => (),
                        Err(mpsc::error::TrySendError::Full(value)) => {
                            warn!(response = ?value, "dropping unread camera response");
                        }
                        // The session handle is gone, so stop reading.
                        Err(mpsc::error::TrySendError::Closed(_)) => return Ok(()),
                    }
                }
                Err(error) => warn!(?error, "discarding unparseable camera message"),
            }
        }
    }
}
