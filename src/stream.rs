//! Decode a byte stream of back-to-back encoded blocks, emitting one PCM frame per block.
//!
//! The input carries no framing of its own: every block is exactly `block_bytes` long for the
//! decoder's configuration, so the stream is simply cut at those boundaries. A stream that
//! ends mid-block is reported as an error rather than silently dropping the tail.

use std::io::{ErrorKind, Read};

use anyhow::{Context, Result, bail};
use tracing::debug;

use crate::decoder::Decoder;
use crate::engine::Engine;

/// Consumer callback for decoded PCM frames.
///
/// Each call receives exactly one frame in the decoder's PCM format.
/// Returning `Ok(false)` signals "stop decoding early".
pub trait PcmSink {
    fn on_pcm(&mut self, pcm: &[u8]) -> Result<bool>;
}

/// Totals for one [`decode_stream`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    /// Frames decoded and delivered to the sink.
    pub frames: u64,
    /// PCM bytes delivered to the sink.
    pub pcm_bytes: u64,
}

/// Decode every block read from `reader` and hand the PCM to `sink`.
pub fn decode_stream<E, R>(
    decoder: &mut Decoder<E>,
    mut reader: R,
    sink: &mut dyn PcmSink,
) -> Result<StreamSummary>
where
    E: Engine,
    R: Read,
{
    let block_bytes = decoder.block_bytes()?;
    let pcm_bytes = decoder.pcm_bytes()?;
    if block_bytes == 0 {
        bail!("decoder reports zero-byte blocks; cannot split the stream");
    }

    let mut block = vec![0u8; block_bytes];
    let mut pcm = vec![0u8; pcm_bytes];
    let mut summary = StreamSummary::default();

    loop {
        let filled = read_block(&mut reader, &mut block)
            .with_context(|| format!("failed to read block {}", summary.frames))?;
        if filled == 0 {
            break;
        }
        if filled < block_bytes {
            bail!(
                "stream ended mid-block: got {filled} of {block_bytes} bytes for block {}",
                summary.frames
            );
        }

        decoder
            .decode(&block, &mut pcm)
            .with_context(|| format!("failed to decode block {}", summary.frames))?;

        summary.frames += 1;
        summary.pcm_bytes += pcm.len() as u64;

        if !sink.on_pcm(&pcm)? {
            break;
        }
    }

    debug!(frames = summary.frames, pcm_bytes = summary.pcm_bytes, "stream decoded");
    Ok(summary)
}

/// Fill `buf` as far as the reader allows, returning the number of bytes read.
/// Anything short of `buf.len()` means EOF was reached.
fn read_block<R: Read>(reader: &mut R, buf: &mut [u8]) -> std::io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
