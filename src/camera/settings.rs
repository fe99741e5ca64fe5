// SPDX-License-Identifier: GPL-3.0-or-later
use serde::Deserialize;

use std::net;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
pub(crate) struct CameraSettings {
    /// The camera's network address.
    #[serde(default = "CameraSettings::default_address")]
    pub(crate) address: net::IpAddr,

    /// The TCP port of the camera's command interface. Defaults to `5001`.
    #[serde(default = "CameraSettings::default_port")]
    pub(crate) port: u16,
}

impl CameraSettings {
    pub(crate) fn socket_addr(&self) -> net::SocketAddr {
        net::SocketAddr::new(self.address, self.port)
    }

    fn default_address() -> net::IpAddr {
        net::IpAddr::from([192u8, 168u8, 1u8, 139u8])
    }

    fn default_port() -> u16 {
        5001u16
    }
}

impl Default for CameraSettings {
    fn default() -> Self {
        Self {
            address: Self::default_address(),
            port: Self::default_port(),
        }
    }
}

#[cfg(test)]
mod test {
    use super::CameraSettings;
    use std::net::{IpAddr, Ipv4Addr};

    #[test]
    fn default_settings() {
        let parsed: Result<CameraSettings, _> = toml::from_str("");
        assert!(parsed.is_ok(), "Failed to parse empty TOML");
        assert_eq!(parsed.unwrap(), CameraSettings::default());
    }

    #[test]
    fn custom_address() {
        let parsed: Result<CameraSettings, _> = toml::from_str("address = \"192.0.2.20\"");
        assert!(parsed.is_ok(), "Failed to parse IPv4 address");
        let expected = CameraSettings {
            address: IpAddr::from(Ipv4Addr::new(192, 0, 2, 20)),
            ..CameraSettings::default()
        };
        assert_eq!(parsed.unwrap(), expected);
    }

    #[test]
    fn custom_port() {
        let parsed: Result<CameraSettings, _> = toml::from_str("port = 1337");
        assert!(parsed.is_ok(), "Failed to parse port number");
        let expected = CameraSettings {
            port: 1337u16,
            ..CameraSettings::default()
        };
        assert_eq!(parsed.unwrap(), expected);
    }

    #[test]
    fn socket_addr() {
        let settings = CameraSettings::default();
        assert_eq!(settings.socket_addr().to_string(), "192.168.1.139:5001");
    }
}
