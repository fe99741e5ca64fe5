// SPDX-License-Identifier: GPL-3.0-or-later
use structopt::StructOpt;

use std::net::IpAddr;
use std::path::PathBuf;

/// Stream a tCam thermal camera as MJPEG over HTTP.
#[derive(Debug, StructOpt)]
#[structopt(name = "tcam-stream")]
pub struct Args {
    /// Path to a configuration file.
    #[structopt(short, long, parse(from_os_str))]
    pub config_path: Option<PathBuf>,

    /// Network address of the camera, overriding the configuration file.
    #[structopt(short = "i", long)]
    pub address: Option<IpAddr>,
}
