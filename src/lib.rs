//! `lc3-decoder` — lifecycle management for a mono LC3 decoder.
//!
//! The codec math belongs to an external engine (see [`engine::Engine`]). This crate owns
//! the contract around it:
//! - Configuration validation against the small set of legal LC3 parameters
//! - Working-memory allocation and engine decoder construction, with guaranteed release
//! - Frame geometry queries callers size their buffers from
//! - Decode dispatch with buffer sizes checked against that geometry
//! - Host-facing status codes
//!
//! Most consumers either hold an owned [`Decoder`] directly, or a [`DecoderState`] when they
//! need the initialize / decode / destroy call pattern of a host binding.

pub mod error;
pub use error::{Error, Result};

// Configuration and sample layout.
pub mod config;
pub mod pcm;

// Engine seam and the decoder resource built on it.
pub mod decoder;
pub mod engine;

// Lifecycle surfaces for host bindings.
pub mod lifecycle;
pub mod shared;
pub mod status;

// Streaming decode and WAV output.
pub mod stream;
pub mod wav;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

pub use config::Config;
pub use decoder::Decoder;
pub use lifecycle::{DecoderState, ReinitPolicy};
pub use shared::SharedDecoder;
pub use status::Status;
