//! Test Helper Utilities
//!
//! Shared signal generators and a scripted capture client for rubin-mx tests

#![allow(dead_code)]

pub mod audio_generator;
pub mod fake_client;

pub use audio_generator::{noise, sine, silence, stereo_sine, write_wav};
pub use fake_client::FakeAudioClient;
