//! The seam between the decoder lifecycle and the codec engine that does the actual signal
//! processing.
//!
//! An [`Engine`] is treated as an opaque collaborator. It reports how much working memory a
//! decoder needs, builds a decoder inside memory we own ([`Region`]), reports frame geometry,
//! and decodes one block at a time. Everything else (validation, ownership, teardown) lives on
//! our side of the seam.

use crate::pcm::PcmFormat;
use crate::{Error, Result};

/// Binding to the system `liblc3` library.
#[cfg(feature = "liblc3")]
pub mod liblc3;

/// An LC3-class codec engine.
///
/// `hrmode` selects the engine's high-resolution mode. The decoder lifecycle always passes
/// `false`; the parameter is part of the engine surface so bindings can forward it verbatim.
pub trait Engine {
    /// Engine-specific decoder instance, built inside a [`Region`].
    type Handle;

    /// Bytes of working memory a decoder needs for this frame duration and sample rate.
    ///
    /// Returns `0` when the engine does not support the combination.
    fn decoder_size(&self, hrmode: bool, frame_us: u16, sample_rate: u32) -> usize;

    /// Build a decoder inside `mem`. Returns `None` when the engine rejects the configuration.
    ///
    /// `pcm_rate` is the output sample rate; `0` means "same as `sample_rate`".
    ///
    /// # Safety
    /// The returned handle may point into `mem`. The caller must keep `mem` alive, unmoved
    /// and otherwise untouched until the handle has been dropped.
    unsafe fn setup_decoder(
        &self,
        hrmode: bool,
        frame_us: u16,
        sample_rate: u32,
        pcm_rate: u32,
        mem: &mut Region,
    ) -> Option<Self::Handle>;

    /// PCM samples per channel in one frame, or a negative value when invalid.
    fn frame_samples(&self, hrmode: bool, frame_us: u16, sample_rate: u32) -> i32;

    /// Bytes in one encoded block, or a negative value when invalid.
    fn frame_block_bytes(
        &self,
        hrmode: bool,
        frame_us: u16,
        sample_rate: u32,
        channels: u8,
        bit_rate: u32,
    ) -> i32;

    /// Decode one block into `pcm`. `frame = None` marks the block as lost so the engine can
    /// conceal it. Returns a negative value on failure.
    ///
    /// # Safety
    /// `handle` must come from [`Engine::setup_decoder`] on this engine with its region still
    /// alive, and `pcm` must hold one full frame (`frame_samples * stride` samples in `format`).
    unsafe fn decode(
        &self,
        handle: &mut Self::Handle,
        frame: Option<&[u8]>,
        format: PcmFormat,
        pcm: &mut [u8],
        stride: usize,
    ) -> i32;
}

const WORD: usize = std::mem::size_of::<u64>();

/// Owned, zero-initialized working memory for an engine decoder.
///
/// Backed by 8-byte words so engines that lay out floats and pointers inside it get the same
/// alignment `malloc` would give them.
pub struct Region {
    words: Box<[u64]>,
    bytes: usize,
}

impl Region {
    /// Allocate `bytes` of working memory.
    ///
    /// Fails with [`Error::Memory`] instead of aborting when the allocator cannot satisfy the
    /// request.
    pub fn allocate(bytes: usize) -> Result<Self> {
        let words = bytes.div_ceil(WORD);
        let mut buf: Vec<u64> = Vec::new();
        buf.try_reserve_exact(words)
            .map_err(|_| Error::Memory { bytes })?;
        buf.resize(words, 0);

        Ok(Self {
            words: buf.into_boxed_slice(),
            bytes,
        })
    }

    /// Requested size in bytes.
    pub fn len(&self) -> usize {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes == 0
    }

    pub fn as_mut_ptr(&mut self) -> *mut u8 {
        self.words.as_mut_ptr().cast()
    }

    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: `bytes <= words.len() * WORD`, the words are initialized, and u8 has no
        // alignment requirement.
        unsafe { std::slice::from_raw_parts(self.words.as_ptr().cast(), self.bytes) }
    }

    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        // SAFETY: see `as_bytes`; the borrow of `self` is exclusive.
        unsafe { std::slice::from_raw_parts_mut(self.words.as_mut_ptr().cast(), self.bytes) }
    }
}

impl std::fmt::Debug for Region {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Region").field("bytes", &self.bytes).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_zeroed_aligned_memory() -> anyhow::Result<()> {
        let mut region = Region::allocate(13)?;
        assert_eq!(region.len(), 13);
        assert!(region.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(region.as_mut_ptr() as usize % WORD, 0);
        Ok(())
    }

    #[test]
    fn empty_region_is_allowed() -> anyhow::Result<()> {
        let region = Region::allocate(0)?;
        assert!(region.is_empty());
        assert!(region.as_bytes().is_empty());
        Ok(())
    }

    #[test]
    fn oversized_request_reports_memory_error() {
        let err = Region::allocate(usize::MAX).unwrap_err();
        assert_eq!(err, Error::Memory { bytes: usize::MAX });
    }
}
