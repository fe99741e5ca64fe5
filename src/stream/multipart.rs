// SPDX-License-Identifier: GPL-3.0-or-later
use bytes::{Bytes, BytesMut};

use std::time::{SystemTime, UNIX_EPOCH};

/// The boundary token separating parts of the stream.
const BOUNDARY: &str = "boundarydonotcross";

/// Assembles complete `multipart/x-mixed-replace` parts.
///
/// Every part is fully assembled (boundary line, part headers, body) before
/// it is handed to the transport, so a client can never observe a part with
/// its headers and body interleaved with another part's.
#[derive(Clone, Debug)]
pub(crate) struct Framer {
    boundary: String,
}

impl Framer {
    pub(crate) fn new() -> Self {
        Self {
            boundary: BOUNDARY.to_string(),
        }
    }

    /// The value for the stream-level `Content-Type` header.
    pub(crate) fn content_type(&self) -> String {
        format!("multipart/x-mixed-replace; boundary={}", self.boundary)
    }

    /// Frame one encoded JPEG image as a complete part.
    pub(crate) fn frame(&self, jpeg: &[u8]) -> Bytes {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_secs_f64())
            .unwrap_or_default();
        self.frame_at(jpeg, timestamp)
    }

    fn frame_at(&self, jpeg: &[u8], timestamp: f64) -> Bytes {
        let header = format!(
            "--{}\r\nX-Timestamp: {:.6}\r\nContent-Length: {}\r\nContent-Type: image/jpeg\r\n\r\n",
            self.boundary,
            timestamp,
            jpeg.len()
        );
        let mut part = BytesMut::with_capacity(header.len() + jpeg.len() + 2);
        part.extend_from_slice(header.as_bytes());
        part.extend_from_slice(jpeg);
        part.extend_from_slice(b"\r\n");
        part.freeze()
    }
}
