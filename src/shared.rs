//! A [`DecoderState`] that can be shared across threads.
//!
//! Hosts that keep one process-wide decoder and call into it from several threads wrap it
//! here. Every operation takes the lock for its whole duration; a poisoned lock is reported
//! as [`Error::Internal`].

use std::sync::{Mutex, MutexGuard};

use crate::config::Config;
use crate::engine::Engine;
use crate::lifecycle::{DecoderState, ReinitPolicy};
use crate::{Error, Result};

pub struct SharedDecoder<E: Engine + Clone> {
    inner: Mutex<DecoderState<E>>,
}

impl<E: Engine + Clone> SharedDecoder<E> {
    pub fn new(engine: E) -> Self {
        Self::with_policy(engine, ReinitPolicy::default())
    }

    pub fn with_policy(engine: E, policy: ReinitPolicy) -> Self {
        Self {
            inner: Mutex::new(DecoderState::with_policy(engine, policy)),
        }
    }

    pub fn initialize(
        &self,
        bit_depth: u8,
        num_channels: u8,
        sample_rate: u32,
        frame_us: u16,
        bit_rate: u32,
    ) -> Result<()> {
        self.lock()?
            .initialize(bit_depth, num_channels, sample_rate, frame_us, bit_rate)
    }

    pub fn initialize_with(&self, config: Config) -> Result<()> {
        self.lock()?.initialize_with(config)
    }

    pub fn decode(&self, frame: &[u8], pcm: &mut [u8]) -> Result<()> {
        self.lock()?.decode(frame, pcm)
    }

    pub fn conceal(&self, pcm: &mut [u8]) -> Result<()> {
        self.lock()?.conceal(pcm)
    }

    pub fn block_bytes(&self) -> Result<usize> {
        self.lock()?.block_bytes()
    }

    pub fn frame_samples(&self) -> Result<usize> {
        self.lock()?.frame_samples()
    }

    pub fn config(&self) -> Result<Option<Config>> {
        Ok(self.lock()?.config().copied())
    }

    pub fn is_initialized(&self) -> bool {
        self.lock().map(|s| s.is_initialized()).unwrap_or(false)
    }

    /// Release the decoder. Recovers the state from a poisoned lock so memory is never leaked.
    pub fn destroy(&self) {
        let mut state = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        state.destroy();
    }

    fn lock(&self) -> Result<MutexGuard<'_, DecoderState<E>>> {
        self.inner
            .lock()
            .map_err(|_| Error::internal("decoder state mutex poisoned"))
    }
}
