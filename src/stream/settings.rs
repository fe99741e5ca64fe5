// SPDX-License-Identifier: GPL-3.0-or-later
use serde::Deserialize;

use std::net;

#[derive(Debug, Deserialize, PartialEq)]
pub(crate) struct StreamSettings {
    /// The address to bind the server to. Defaults to all interfaces.
    #[serde(default = "StreamSettings::default_address")]
    pub(crate) address: net::IpAddr,

    /// The port to bind the server to. Defaults to `8001`.
    #[serde(default = "StreamSettings::default_port")]
    pub(crate) port: u16,

    /// MJPEG-specific settings.
    #[serde(default)]
    pub(crate) mjpeg: MjpegSettings,
}

impl StreamSettings {
    fn default_address() -> net::IpAddr {
        net::IpAddr::from([0u8, 0u8, 0u8, 0u8])
    }

    fn default_port() -> u16 {
        8001u16
    }
}

impl From<&StreamSettings> for net::SocketAddr {
    fn from(settings: &StreamSettings) -> Self {
        net::SocketAddr::new(settings.address, settings.port)
    }
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            port: Self::default_port(),
            mjpeg: MjpegSettings::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub(crate) struct MjpegSettings {
    /// Whether or not the MJPEG video stream should be enabled.
    #[serde(default = "MjpegSettings::default_enabled")]
    pub(crate) enabled: bool,
}

impl MjpegSettings {
    fn default_enabled() -> bool {
        true
    }
}

impl Default for MjpegSettings {
    fn default() -> Self {
        Self {
            enabled: Self::default_enabled(),
        }
    }
}

#[cfg(test)]
mod stream_test {
    use super::{MjpegSettings, StreamSettings};
    use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

    #[test]
    fn default_settings() {
        let parsed: Result<StreamSettings, _> = toml::from_str("");
        assert!(parsed.is_ok(), "Failed to parse empty TOML");
        let parsed = parsed.unwrap();
        let expected = StreamSettings::default();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn ipv4_address() {
        // Using an IP address from TEST-NET-1 (see RFC 5737)
        let parsed: Result<StreamSettings, _> = toml::from_str("address = \"192.0.2.20\"");
        assert!(parsed.is_ok(), "Failed to parse IPv4 address");
        let parsed = parsed.unwrap();
        let expected = StreamSettings {
            address: IpAddr::from(Ipv4Addr::new(192, 0, 2, 20)),
            ..StreamSettings::default()
        };
        assert_eq!(parsed, expected);
    }

    #[test]
    fn ipv6_address() {
        // Using a documentation IP address (see RFC 3849)
        let parsed: Result<StreamSettings, _> =
            toml::from_str("address = \"2001:db8:dead:beef::1\"");
        assert!(parsed.is_ok(), "Failed to parse IPv6 address");
        let parsed = parsed.unwrap();
        let expected = StreamSettings {
            address: IpAddr::from(Ipv6Addr::new(0x2001, 0xdb8, 0xdead, 0xbeef, 0, 0, 0, 1)),
            ..StreamSettings::default()
        };
        assert_eq!(parsed, expected);
    }

    #[test]
    fn port() {
        let parsed: Result<StreamSettings, _> = toml::from_str("port = 1337");
        assert!(parsed.is_ok(), "Failed to parse port number");
        let parsed = parsed.unwrap();
        let expected = StreamSettings {
            port: 1337u16,
            ..StreamSettings::default()
        };
        assert_eq!(parsed, expected);
    }

    #[test]
    fn string_port() {
        let parsed: Result<StreamSettings, _> = toml::from_str("port = \"foo\"");
        assert!(parsed.is_err(), "Incorrectly parsed string as port number");
    }

    #[test]
    fn mjpeg_off() {
        let parsed: Result<StreamSettings, _> = toml::from_str("mjpeg.enabled = false");
        assert!(parsed.is_ok(), "Failed to parse MJPEG disabled");
        let parsed = parsed.unwrap();
        let expected = StreamSettings {
            mjpeg: MjpegSettings { enabled: false },
            ..StreamSettings::default()
        };
        assert_eq!(parsed, expected);
    }

    #[test]
    fn socket_addr() {
        let settings = StreamSettings::default();
        let address = std::net::SocketAddr::from(&settings);
        assert_eq!(address.to_string(), "0.0.0.0:8001");
    }
}
