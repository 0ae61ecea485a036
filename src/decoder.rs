//! An owned, initialized LC3 decoder.
//!
//! [`Decoder`] is the resource itself: a validated [`Config`], the working memory the engine
//! asked for, and the engine's decoder handle built inside that memory. Construction acquires
//! all three or nothing; dropping the decoder releases them exactly once, handle first.
//!
//! Buffer sizes are not taken on trust. Every decode recomputes the frame geometry from the
//! stored configuration and checks both slices against it before the engine sees them.

use tracing::debug;

use crate::config::Config;
use crate::engine::{Engine, Region};
use crate::pcm::PcmFormat;
use crate::{Error, Result};

/// High-resolution mode is never enabled by this crate.
const HRMODE: bool = false;

/// Output sample rate passed to the engine; `0` keeps the codec rate.
const SAME_PCM_RATE: u32 = 0;

/// A decoder instance owning its engine handle and working memory.
pub struct Decoder<E: Engine> {
    // Field order matters: the handle may point into `region`, so it must drop first.
    handle: E::Handle,
    region: Region,
    engine: E,
    config: Config,
}

impl<E: Engine> Decoder<E> {
    /// Allocate working memory and build an engine decoder for `config`.
    ///
    /// Errors:
    /// - [`Error::Memory`] when the working memory cannot be allocated
    /// - [`Error::Internal`] when the engine refuses to build a decoder (the memory is
    ///   released before returning)
    pub fn new(engine: E, config: Config) -> Result<Self> {
        let frame_us = config.frame_duration().micros();
        let sample_rate = config.sample_rate().hz();

        let bytes = engine.decoder_size(HRMODE, frame_us, sample_rate);
        let mut region = Region::allocate(bytes)?;
        debug!(bytes, frame_us, sample_rate, "allocated decoder memory");

        // SAFETY: `region` moves into the returned decoder together with the handle and is
        // only dropped after it.
        let handle = unsafe {
            engine.setup_decoder(HRMODE, frame_us, sample_rate, SAME_PCM_RATE, &mut region)
        };
        let Some(handle) = handle else {
            // `region` is released on return.
            return Err(Error::internal(format!(
                "engine could not set up a decoder for {frame_us} us at {sample_rate} Hz"
            )));
        };

        debug!(?config, "decoder ready");
        Ok(Self {
            handle,
            region,
            engine,
            config,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    /// Size of the engine's working memory in bytes.
    pub fn memory_bytes(&self) -> usize {
        self.region.len()
    }

    pub fn pcm_format(&self) -> PcmFormat {
        self.config.pcm_format()
    }

    /// PCM samples per frame (mono, so also samples per channel).
    pub fn frame_samples(&self) -> Result<usize> {
        let n = self.engine.frame_samples(
            HRMODE,
            self.config.frame_duration().micros(),
            self.config.sample_rate().hz(),
        );
        usize::try_from(n).map_err(|_| Error::internal(format!("engine reported {n} frame samples")))
    }

    /// Bytes in one encoded block.
    pub fn block_bytes(&self) -> Result<usize> {
        let n = self.engine.frame_block_bytes(
            HRMODE,
            self.config.frame_duration().micros(),
            self.config.sample_rate().hz(),
            self.config.num_channels(),
            self.config.bit_rate(),
        );
        usize::try_from(n).map_err(|_| Error::internal(format!("engine reported {n} block bytes")))
    }

    /// Bytes of PCM one decoded frame occupies.
    pub fn pcm_bytes(&self) -> Result<usize> {
        Ok(self.frame_samples()? * self.config.bit_depth().bytes_per_sample())
    }

    /// Decode one encoded block into `pcm`.
    ///
    /// `frame` must be exactly [`Decoder::block_bytes`] long and `pcm` exactly
    /// [`Decoder::pcm_bytes`] long; anything else is [`Error::InvalidParameters`].
    pub fn decode(&mut self, frame: &[u8], pcm: &mut [u8]) -> Result<()> {
        let block_bytes = self.block_bytes()?;
        if frame.len() != block_bytes {
            return Err(Error::invalid(format!(
                "encoded block is {} bytes, expected {block_bytes}",
                frame.len()
            )));
        }
        self.run(Some(frame), pcm)
    }

    /// Produce a concealment frame for a block that was lost in transit.
    pub fn conceal(&mut self, pcm: &mut [u8]) -> Result<()> {
        // Still validate the block geometry so a broken configuration surfaces here too.
        self.block_bytes()?;
        self.run(None, pcm)
    }

    fn run(&mut self, frame: Option<&[u8]>, pcm: &mut [u8]) -> Result<()> {
        let pcm_bytes = self.pcm_bytes()?;
        if pcm.len() != pcm_bytes {
            return Err(Error::invalid(format!(
                "PCM buffer is {} bytes, expected {pcm_bytes}",
                pcm.len()
            )));
        }

        let format = self.pcm_format();
        let stride = usize::from(self.config.num_channels());
        // SAFETY: the handle was built by this engine into `self.region`, which is still owned
        // by `self`, and `pcm` was just checked to hold exactly one frame.
        let ret = unsafe {
            self.engine
                .decode(&mut self.handle, frame, format, pcm, stride)
        };
        if ret < 0 {
            return Err(Error::internal(format!("engine decode failed with {ret}")));
        }
        Ok(())
    }
}

impl<E: Engine> Drop for Decoder<E> {
    fn drop(&mut self) {
        debug!(bytes = self.region.len(), "releasing decoder");
    }
}

impl<E: Engine> std::fmt::Debug for Decoder<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("config", &self.config)
            .field("region", &self.region)
            .finish_non_exhaustive()
    }
}
