// SPDX-License-Identifier: GPL-3.0-or-later
use anyhow::Context as _;
use futures::future::{Future, FutureExt};
use futures::ready;
use futures::stream::{FuturesUnordered, Stream};
use http::Response;
use pin_project::pin_project;
use tokio::task::spawn_blocking;
use tracing::{debug, info, info_span, trace, warn};
use tracing_futures::Instrument;
use warp::Filter;

use std::convert::TryFrom;
use std::pin::Pin;
use std::task::{Context, Poll};

use crate::camera::{FrameSource, Session};
use crate::render::Colorizer;
use crate::settings::Settings;
use crate::stream::{encode_jpeg, ClientCounter, MjpegStream, StreamSettings};

type InnerTask = Pin<Box<dyn Future<Output = anyhow::Result<()>>>>;
type TaskList = FuturesUnordered<InnerTask>;

/// The full frame path, from camera session to HTTP clients.
#[pin_project]
pub(crate) struct Pipeline {
    session: Option<Session>,
    #[pin]
    tasks: TaskList,
}

impl Pipeline {
    pub(crate) async fn new(settings: Settings) -> anyhow::Result<Self> {
        let mut session = Session::connect(settings.camera.socket_addr())
            .await
            .context("Error connecting to the camera")?;
        // Serving before a frame exists would hand clients an empty stream,
        // so block startup on the first frame.
        session
            .prime()
            .await
            .context("Error acquiring the first frame")?;
        session
            .start_stream()
            .await
            .context("Error starting the camera stream")?;

        let colorizer =
            Colorizer::try_from(&settings.render).context("Invalid render settings")?;
        let frame_source = session.frame_source();
        let mut pipeline = Self {
            session: Some(session),
            tasks: TaskList::new(),
        };
        if settings.streams.mjpeg.enabled {
            let clients = ClientCounter::default();
            let mjpeg = MjpegStream::new(&clients);
            pipeline.tasks.push(
                render_loop(frame_source, colorizer, clients, mjpeg.clone())
                    .instrument(info_span!("render_stream"))
                    .boxed(),
            );
            pipeline.create_server(&settings.streams, mjpeg);
        } else {
            info!("video streams disabled, skipping streams setup");
        }
        Ok(pipeline)
    }

    fn create_server(&mut self, settings: &StreamSettings, mjpeg: MjpegStream) {
        let bind_address: std::net::SocketAddr = settings.into();
        // Any GET path serves the stream, matching the reference server.
        let route = warp::get().map(move || {
            debug!("client connected to MJPEG stream");
            Response::builder()
                .status(200)
                .header(
                    "Cache-Control",
                    "no-store, no-cache, must-revalidate, pre-check=0, post-check=0, max-age=0",
                )
                .header("Pragma", "no-cache")
                .header("Expires", "Mon, 3 Jan 2000 12:34:56 GMT")
                .header("Connection", "close")
                .header("Content-Type", mjpeg.content_type())
                .body(mjpeg.body())
        });
        debug!(address = ?bind_address, "creating warp server");
        let server = warp::serve(route).bind(bind_address);
        self.tasks
            .push(server.instrument(info_span!("warp_server")).map(Ok).boxed());
    }

    /// Orderly teardown: stop the camera stream and close the session.
    ///
    /// Dropping the pipeline cancels the render and server tasks, ending
    /// every client's stream.
    pub(crate) async fn shutdown(mut self) {
        if let Some(session) = self.session.take() {
            if let Err(error) = session.shutdown().await {
                warn!(?error, "error closing the camera session");
            }
        }
    }
}

impl Future for Pipeline {
    type Output = anyhow::Result<()>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut this = self.project();
        Poll::Ready(loop {
            match ready!(this.tasks.as_mut().poll_next(cx)) {
                Some(result) => {
                    debug!(?result, "pipeline task finished");
                    break result;
                }
                None => break Ok(()),
            }
        })
    }
}

/// Colorize, encode, and publish the latest frame while clients are watching.
///
/// The loop parks whenever the client count hits zero; rendering frames
/// nobody sees is wasted work. When clients are connected it paces itself on
/// the frame source, so it never spins faster than frames arrive.
async fn render_loop(
    mut frames: FrameSource,
    colorizer: Colorizer,
    clients: ClientCounter,
    sink: MjpegStream,
) -> anyhow::Result<()> {
    loop {
        let watching = clients.wait_for_clients().await;
        let latest = frames.borrow_and_update().clone();
        if let Some(frame) = latest {
            trace!(clients = watching, "rendering frame");
            let colorizer = colorizer.clone();
            let jpeg = spawn_blocking(move || {
                let image = colorizer.colorize(&frame);
                encode_jpeg(&image)
            })
            .await
            .context("JPEG encoding thread failed")?;
            sink.send_frame(&jpeg);
        }
        frames
            .changed()
            .await
            .context("Camera frame source closed")?;
    }
}

#[cfg(test)]
mod test {
    use super::render_loop;
    use crate::frame::{RadiometricFrame, HEIGHT, WIDTH};
    use crate::render::{Colorizer, RenderSettings};
    use crate::stream::{ClientCounter, MjpegStream};
    use futures::stream::StreamExt;
    use std::convert::TryFrom;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::watch;

    fn test_frame() -> Arc<RadiometricFrame> {
        let payload = vec![0x55u8; HEIGHT * WIDTH * 2];
        Arc::new(RadiometricFrame::decode(&payload).unwrap())
    }

    #[tokio::test]
    async fn frames_flow_to_clients() {
        let (frame_tx, frame_rx) = watch::channel(Some(test_frame()));
        let colorizer = Colorizer::try_from(&RenderSettings::default()).unwrap();
        let clients = ClientCounter::default();
        let mjpeg = MjpegStream::new(&clients);
        let mut body = mjpeg.body();
        tokio::spawn(render_loop(frame_rx, colorizer, clients, mjpeg));

        let part = body.next().await.unwrap().unwrap();
        assert!(part.starts_with(b"--boundarydonotcross\r\n"));
        // Keep the writer alive until the part has been observed.
        drop(frame_tx);
    }

    #[tokio::test]
    async fn rendering_parks_without_clients() {
        let (frame_tx, frame_rx) = watch::channel(Some(test_frame()));
        let colorizer = Colorizer::try_from(&RenderSettings::default()).unwrap();
        let clients = ClientCounter::default();
        let mjpeg = MjpegStream::new(&clients);
        let mut probe = mjpeg.rx_probe();
        tokio::spawn(render_loop(frame_rx, colorizer, clients, mjpeg));

        // No clients are connected, so nothing should be published even
        // though a frame is available.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!probe.has_changed().unwrap());
        drop(frame_tx);
    }

    #[tokio::test]
    async fn closed_frame_source_ends_the_loop() {
        let (frame_tx, frame_rx) = watch::channel(None);
        let colorizer = Colorizer::try_from(&RenderSettings::default()).unwrap();
        let clients = ClientCounter::default();
        let mjpeg = MjpegStream::new(&clients);
        let _token = clients.token();
        let task = tokio::spawn(render_loop(frame_rx, colorizer, clients, mjpeg));

        drop(frame_tx);
        let result = task.await.unwrap();
        assert!(result.is_err());
    }
}
