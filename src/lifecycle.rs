//! Initialize / decode / destroy lifecycle around a single decoder.
//!
//! [`DecoderState`] is what host bindings hold: a value that is either uninitialized or owns
//! exactly one [`Decoder`]. It keeps the established call contract:
//! - `initialize` once; while initialized, further calls are no-ops that report success
//! - geometry queries and `decode` fail with [`Error::NotInitialized`] until then
//! - `destroy` releases everything and may be called any number of times
//!
//! The repeat-initialize behaviour silently keeps the first configuration. Callers that would
//! rather be told about a conflicting configuration can opt into [`ReinitPolicy::Strict`].

use tracing::{debug, warn};

use crate::config::Config;
use crate::decoder::Decoder;
use crate::engine::Engine;
use crate::{Error, Result};

/// What `initialize` does when a decoder is already active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReinitPolicy {
    /// Report success and keep the existing decoder, without looking at the new parameters.
    #[default]
    KeepExisting,
    /// Validate the new parameters; succeed only if they match the active configuration.
    Strict,
}

/// A decoder slot that is either uninitialized or holds one active [`Decoder`].
pub struct DecoderState<E: Engine + Clone> {
    engine: E,
    policy: ReinitPolicy,
    decoder: Option<Decoder<E>>,
}

impl<E: Engine + Clone> DecoderState<E> {
    /// An uninitialized slot using the default [`ReinitPolicy::KeepExisting`].
    pub fn new(engine: E) -> Self {
        Self::with_policy(engine, ReinitPolicy::default())
    }

    pub fn with_policy(engine: E, policy: ReinitPolicy) -> Self {
        Self {
            engine,
            policy,
            decoder: None,
        }
    }

    pub fn policy(&self) -> ReinitPolicy {
        self.policy
    }

    pub fn is_initialized(&self) -> bool {
        self.decoder.is_some()
    }

    /// The active configuration, if any.
    pub fn config(&self) -> Option<&Config> {
        self.decoder.as_ref().map(Decoder::config)
    }

    /// The active decoder, if any.
    pub fn decoder(&self) -> Option<&Decoder<E>> {
        self.decoder.as_ref()
    }

    /// Validate raw parameters and bring up a decoder.
    ///
    /// On failure the slot stays uninitialized and any memory acquired along the way has
    /// already been released.
    pub fn initialize(
        &mut self,
        bit_depth: u8,
        num_channels: u8,
        sample_rate: u32,
        frame_us: u16,
        bit_rate: u32,
    ) -> Result<()> {
        if self.is_initialized() && self.policy == ReinitPolicy::KeepExisting {
            debug!("decoder already initialized; keeping existing configuration");
            return Ok(());
        }

        let config = Config::new(bit_depth, num_channels, sample_rate, frame_us, bit_rate)?;
        self.initialize_with(config)
    }

    /// Bring up a decoder for an already validated configuration.
    pub fn initialize_with(&mut self, config: Config) -> Result<()> {
        if let Some(active) = &self.decoder {
            let current = active.config();
            if *current == config {
                return Ok(());
            }
            return match self.policy {
                ReinitPolicy::KeepExisting => {
                    warn!(?current, requested = ?config, "ignoring re-initialization");
                    Ok(())
                }
                ReinitPolicy::Strict => Err(Error::invalid(
                    "decoder is already initialized with a different configuration",
                )),
            };
        }

        self.decoder = Some(Decoder::new(self.engine.clone(), config)?);
        Ok(())
    }

    /// Decode one encoded block into `pcm`.
    pub fn decode(&mut self, frame: &[u8], pcm: &mut [u8]) -> Result<()> {
        self.active_mut()?.decode(frame, pcm)
    }

    /// Fill `pcm` with a concealment frame for a lost block.
    pub fn conceal(&mut self, pcm: &mut [u8]) -> Result<()> {
        self.active_mut()?.conceal(pcm)
    }

    /// Bytes in one encoded block for the active configuration.
    pub fn block_bytes(&self) -> Result<usize> {
        self.active()?.block_bytes()
    }

    /// PCM samples per frame for the active configuration.
    pub fn frame_samples(&self) -> Result<usize> {
        self.active()?.frame_samples()
    }

    /// Bytes of PCM per decoded frame for the active configuration.
    pub fn pcm_bytes(&self) -> Result<usize> {
        self.active()?.pcm_bytes()
    }

    /// Release the active decoder, if any. Never fails.
    pub fn destroy(&mut self) {
        if let Some(decoder) = self.decoder.take() {
            drop(decoder);
            debug!("decoder destroyed");
        }
    }

    fn active(&self) -> Result<&Decoder<E>> {
        self.decoder.as_ref().ok_or(Error::NotInitialized)
    }

    fn active_mut(&mut self) -> Result<&mut Decoder<E>> {
        self.decoder.as_mut().ok_or(Error::NotInitialized)
    }
}
