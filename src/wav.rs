use std::fs::File;
use std::io::{BufWriter, Seek, Write};
use std::path::Path;

use anyhow::{Context, Result};
use hound::{SampleFormat, WavSpec, WavWriter};

use crate::config::Config;
use crate::pcm::{PcmFormat, unpack_samples};
use crate::stream::PcmSink;

/// WAV header matching the decoder's output for `config`.
///
/// Always mono integer PCM at the codec sample rate and the configured bit depth.
pub fn wav_spec(config: &Config) -> WavSpec {
    WavSpec {
        channels: u16::from(config.num_channels()),
        sample_rate: config.sample_rate().hz(),
        bits_per_sample: config.pcm_format().bits_per_sample(),
        sample_format: SampleFormat::Int,
    }
}

/// A [`PcmSink`] that appends decoded frames to a WAV file.
///
/// Call [`WavPcmSink::finalize`] when done so the header gets the final data length.
pub struct WavPcmSink<W: Write + Seek> {
    writer: WavWriter<W>,
    format: PcmFormat,
}

impl WavPcmSink<BufWriter<File>> {
    /// Create (or truncate) a WAV file at `path`.
    pub fn create(path: impl AsRef<Path>, config: &Config) -> Result<Self> {
        let path = path.as_ref();
        let writer = WavWriter::create(path, wav_spec(config))
            .with_context(|| format!("failed to create WAV file at '{}'", path.display()))?;
        Ok(Self {
            writer,
            format: config.pcm_format(),
        })
    }
}

impl<W: Write + Seek> WavPcmSink<W> {
    /// Write WAV data into any seekable writer.
    pub fn new(inner: W, config: &Config) -> Result<Self> {
        let writer =
            WavWriter::new(inner, wav_spec(config)).context("failed to write WAV header")?;
        Ok(Self {
            writer,
            format: config.pcm_format(),
        })
    }

    /// Fix up the header and flush.
    pub fn finalize(self) -> Result<()> {
        self.writer
            .finalize()
            .context("failed to finalize WAV output")
    }
}

impl<W: Write + Seek> PcmSink for WavPcmSink<W> {
    fn on_pcm(&mut self, pcm: &[u8]) -> Result<bool> {
        for sample in unpack_samples(self.format, pcm) {
            self.writer
                .write_sample(sample)
                .context("failed to write WAV sample")?;
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn spec_follows_config() -> anyhow::Result<()> {
        let spec = wav_spec(&Config::new(24, 1, 32_000, 5_000, 64_000)?);
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 32_000);
        assert_eq!(spec.bits_per_sample, 24);
        assert_eq!(spec.sample_format, SampleFormat::Int);
        Ok(())
    }

    #[test]
    fn writes_s16_frames_readable_by_hound() -> anyhow::Result<()> {
        let config = Config::new(16, 1, 8_000, 10_000, 16_000)?;
        let mut out = Cursor::new(Vec::new());

        let mut sink = WavPcmSink::new(&mut out, &config)?;
        assert!(sink.on_pcm(&[0x01, 0x00, 0xff, 0xff])?);
        sink.finalize()?;

        out.set_position(0);
        let mut reader = hound::WavReader::new(out)?;
        assert_eq!(reader.spec(), wav_spec(&config));
        let samples = reader.samples::<i16>().collect::<hound::Result<Vec<_>>>()?;
        assert_eq!(samples, vec![1, -1]);
        Ok(())
    }
}
