//! rubin-mx bootstrap configuration (`rubin-mx.toml`)
//!
//! Every field is optional; anything missing falls back to a compiled
//! default.
//!
//! ```toml
//! host = "127.0.0.1"
//! port = 5740
//! root_folder = "/srv/rubin"
//!
//! [logging]
//! level = "debug"
//!
//! [capture]
//! source = "system"
//! device = "BlackHole 2ch"
//! default_duration = 5.0
//! ```

use rubin_common::config::LoggingConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Module name used for the config file and root folder resolution
pub const MODULE_NAME: &str = "rubin-mx";

pub const DEFAULT_PORT: u16 = 5740;
pub const DEFAULT_TCP_PORT: u16 = 9878;
pub const DEFAULT_DURATION: f64 = 5.0;
pub const DEFAULT_SAMPLE_RATE: u32 = 44100;
pub const DEFAULT_TCP_TIMEOUT_SECS: f64 = 30.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MxConfig {
    pub host: String,
    pub port: u16,
    pub root_folder: Option<PathBuf>,
    pub logging: LoggingConfig,
    pub capture: CaptureConfig,
}

impl Default for MxConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            root_folder: None,
            logging: LoggingConfig::default(),
            capture: CaptureConfig::default(),
        }
    }
}

/// Where captured audio comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CaptureSource {
    /// A system input device (loopback or line in)
    System,
    /// Interleaved f32le stereo piped on stdin
    Stdin,
    /// Length-prefixed f32 stereo over TCP
    Tcp,
    /// A WAV file on disk
    Wav,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub source: CaptureSource,
    /// Input device name for `source = "system"`; default device when unset
    pub device: Option<String>,
    /// Address the TCP client listens on
    pub tcp_host: String,
    pub tcp_port: u16,
    /// Seconds to wait for a TCP sender, and for each read from it
    pub tcp_timeout_secs: f64,
    /// Required when `source = "wav"`
    pub wav_path: Option<PathBuf>,
    /// Seconds captured when a request omits `duration`
    pub default_duration: f64,
    /// Hz used when a request omits `sample_rate`
    pub default_sample_rate: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            source: CaptureSource::System,
            device: None,
            tcp_host: "0.0.0.0".to_string(),
            tcp_port: DEFAULT_TCP_PORT,
            tcp_timeout_secs: DEFAULT_TCP_TIMEOUT_SECS,
            wav_path: None,
            default_duration: DEFAULT_DURATION,
            default_sample_rate: DEFAULT_SAMPLE_RATE,
        }
    }
}
