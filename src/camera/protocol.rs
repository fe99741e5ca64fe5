// SPDX-License-Identifier: GPL-3.0-or-later
use anyhow::Context as _;
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};

use crate::frame::RadiometricFrame;

/// Start-of-message marker byte.
const STX: u8 = 0x02;
/// End-of-message marker byte.
const ETX: u8 = 0x03;

/// Commands sent to the camera.
///
/// The camera speaks JSON objects wrapped in STX/ETX control bytes. Only the
/// commands the streamer needs are implemented; the full command set (FFC,
/// spotmeter, wifi configuration and so on) is much larger.
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub(crate) enum Command {
    /// Request a single frame.
    GetImage,
    /// Start continuous streaming.
    StreamOn { args: StreamArgs },
    /// Stop continuous streaming.
    StreamOff,
}

#[derive(Clone, Copy, Debug, Default, Serialize)]
pub(crate) struct StreamArgs {
    /// Delay between frames in milliseconds. Zero streams at the sensor rate.
    pub(crate) delay_msec: u32,
    /// Number of frames to send before stopping. Zero streams forever.
    pub(crate) num_frames: u32,
}

impl Command {
    /// Serialize the command and wrap it in the STX/ETX framing bytes.
    pub(crate) fn encode(&self) -> serde_json::Result<Bytes> {
        let json = serde_json::to_vec(self)?;
        let mut buf = BytesMut::with_capacity(json.len() + 2);
        buf.put_u8(STX);
        buf.extend_from_slice(&json);
        buf.put_u8(ETX);
        Ok(buf.freeze())
    }
}

/// A frame message from the camera.
///
/// Frame messages also carry metadata objects alongside the image data, but
/// the streamer only needs the radiometric payload.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct FrameMessage {
    /// Base64-encoded little-endian radiometric samples.
    radiometric: String,
}

impl FrameMessage {
    pub(crate) fn decode(&self) -> anyhow::Result<RadiometricFrame> {
        let payload = base64::decode(&self.radiometric)
            .context("Invalid base64 in radiometric payload")?;
        Ok(RadiometricFrame::decode(&payload)?)
    }
}

/// A single message from the camera, routed by content.
///
/// Anything with a `radiometric` key is a frame; everything else is a
/// response to a command.
#[derive(Debug)]
pub(crate) enum Message {
    Frame(FrameMessage),
    Status(serde_json::Value),
}

impl Message {
    pub(crate) fn parse(raw: &[u8]) -> serde_json::Result<Self> {
        let trimmed = raw.strip_prefix(&[STX]).unwrap_or(raw);
        let trimmed = trimmed.strip_suffix(&[ETX]).unwrap_or(trimmed);
        let value: serde_json::Value = serde_json::from_slice(trimmed)?;
        if value.get("radiometric").is_some() {
            serde_json::from_value(value).map(Message::Frame)
        } else {
            Ok(Message::Status(value))
        }
    }
}

/// Split complete ETX-terminated messages off the front of `buf`.
///
/// A partial trailing message stays in the buffer to be completed by the next
/// read, and a single read may yield several messages when the camera is
/// streaming faster than the socket is drained.
pub(crate) fn split_messages(buf: &mut BytesMut) -> Vec<Bytes> {
    let mut messages = Vec::new();
    while let Some(end) = buf.iter().position(|&byte| byte == ETX) {
        messages.push(buf.split_to(end + 1).freeze());
    }
    messages
}

#[cfg(test)]
mod test {
    use super::{split_messages, Command, Message, StreamArgs};
    use bytes::BytesMut;

    #[test]
    fn get_image_encoding() {
        let encoded = Command::GetImage.encode().unwrap();
        assert_eq!(&encoded[..], b"\x02{\"cmd\":\"get_image\"}\x03");
    }

    #[test]
    fn stream_on_encoding() {
        let encoded = Command::StreamOn {
            args: StreamArgs::default(),
        }
        .encode()
        .unwrap();
        assert_eq!(encoded[0], 0x02);
        assert_eq!(encoded[encoded.len() - 1], 0x03);
        let parsed: serde_json::Value = serde_json::from_slice(&encoded[1..encoded.len() - 1]).unwrap();
        assert_eq!(parsed["cmd"], "stream_on");
        assert_eq!(parsed["args"]["delay_msec"], 0);
        assert_eq!(parsed["args"]["num_frames"], 0);
    }

    #[test]
    fn splits_multiple_messages() {
        let mut buf = BytesMut::from(&b"\x02{\"a\":1}\x03\x02{\"b\":2}\x03"[..]);
        let messages = split_messages(&mut buf);
        assert_eq!(messages.len(), 2);
        assert_eq!(&messages[0][..], b"\x02{\"a\":1}\x03");
        assert_eq!(&messages[1][..], b"\x02{\"b\":2}\x03");
        assert!(buf.is_empty());
    }

    #[test]
    fn partial_message_stays_buffered() {
        let mut buf = BytesMut::from(&b"\x02{\"a\":1}\x03\x02{\"b\""[..]);
        let messages = split_messages(&mut buf);
        assert_eq!(messages.len(), 1);
        assert_eq!(&buf[..], b"\x02{\"b\"");
        // The rest of the message arrives on a later read.
        buf.extend_from_slice(b":2}\x03");
        let messages = split_messages(&mut buf);
        assert_eq!(messages.len(), 1);
        assert_eq!(&messages[0][..], b"\x02{\"b\":2}\x03");
    }

    #[test]
    fn frame_messages_are_routed_by_key() {
        let frame = Message::parse(b"\x02{\"radiometric\":\"AAAA\"}\x03").unwrap();
        assert!(matches!(frame, Message::Frame(_)));
        let status = Message::parse(b"\x02{\"status\":\"connected\"}\x03").unwrap();
        assert!(matches!(status, Message::Status(_)));
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(Message::parse(b"\x02not json\x03").is_err());
    }

    #[test]
    fn frame_payload_length_checked() {
        // A valid base64 string that is far too short to be a frame.
        let message = Message::parse(b"{\"radiometric\":\"AAAA\"}").unwrap();
        let frame_message = match message {
            Message::Frame(inner) => inner,
            _ => panic!("Expected a frame message"),
        };
        assert!(frame_message.decode().is_err());
    }
}
