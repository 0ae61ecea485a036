//! Decoder configuration.
//!
//! A [`Config`] can only be built from values inside the small discrete set the decoder
//! supports, so once a caller holds one, every downstream component can trust it:
//! - bit depth: 16 or 24
//! - channels: mono only
//! - sample rate: 8, 16, 24, 32 or 48 kHz
//! - frame duration: 2.5, 5, 7.5 or 10 ms
//!
//! The bit rate is carried through unchecked; it only feeds the engine's block-size formula.

use serde::{Deserialize, Serialize};

use crate::pcm::PcmFormat;
use crate::{Error, Result};

/// The only channel count the decoder supports.
pub const MONO: u8 = 1;

/// PCM sample width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BitDepth {
    /// 16-bit signed little-endian.
    Sixteen,
    /// 24-bit signed, packed into 3 little-endian bytes.
    TwentyFour,
}

impl BitDepth {
    pub fn bits(self) -> u8 {
        match self {
            Self::Sixteen => 16,
            Self::TwentyFour => 24,
        }
    }

    pub fn bytes_per_sample(self) -> usize {
        usize::from(self.bits() / 8)
    }

    /// PCM layout the engine writes for this depth.
    pub fn pcm_format(self) -> PcmFormat {
        match self {
            Self::TwentyFour => PcmFormat::S24Le3,
            Self::Sixteen => PcmFormat::S16,
        }
    }
}

impl TryFrom<u8> for BitDepth {
    type Error = Error;

    fn try_from(bits: u8) -> Result<Self> {
        match bits {
            16 => Ok(Self::Sixteen),
            24 => Ok(Self::TwentyFour),
            other => Err(Error::invalid(format!(
                "unsupported bit depth {other} (expected 16 or 24)"
            ))),
        }
    }
}

/// Codec sample rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleRate {
    Hz8000,
    Hz16000,
    Hz24000,
    Hz32000,
    Hz48000,
}

impl SampleRate {
    pub fn hz(self) -> u32 {
        match self {
            Self::Hz8000 => 8_000,
            Self::Hz16000 => 16_000,
            Self::Hz24000 => 24_000,
            Self::Hz32000 => 32_000,
            Self::Hz48000 => 48_000,
        }
    }
}

impl TryFrom<u32> for SampleRate {
    type Error = Error;

    fn try_from(hz: u32) -> Result<Self> {
        match hz {
            8_000 => Ok(Self::Hz8000),
            16_000 => Ok(Self::Hz16000),
            24_000 => Ok(Self::Hz24000),
            32_000 => Ok(Self::Hz32000),
            48_000 => Ok(Self::Hz48000),
            other => Err(Error::invalid(format!(
                "unsupported sample rate {other} Hz (expected 8000, 16000, 24000, 32000 or 48000)"
            ))),
        }
    }
}

/// Duration of one codec frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameDuration {
    Us2500,
    Us5000,
    Us7500,
    Us10000,
}

impl FrameDuration {
    pub fn micros(self) -> u16 {
        match self {
            Self::Us2500 => 2_500,
            Self::Us5000 => 5_000,
            Self::Us7500 => 7_500,
            Self::Us10000 => 10_000,
        }
    }
}

impl TryFrom<u16> for FrameDuration {
    type Error = Error;

    fn try_from(us: u16) -> Result<Self> {
        match us {
            2_500 => Ok(Self::Us2500),
            5_000 => Ok(Self::Us5000),
            7_500 => Ok(Self::Us7500),
            10_000 => Ok(Self::Us10000),
            other => Err(Error::invalid(format!(
                "unsupported frame duration {other} us (expected 2500, 5000, 7500 or 10000)"
            ))),
        }
    }
}

/// A validated, immutable decoder configuration.
///
/// Serializes as a flat object (`bit_depth`, `num_channels`, `sample_rate`, `frame_us`,
/// `bit_rate`). Deserializing goes through the same validation as [`Config::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawConfig", into = "RawConfig")]
pub struct Config {
    bit_depth: BitDepth,
    sample_rate: SampleRate,
    frame_duration: FrameDuration,
    bit_rate: u32,
}

impl Config {
    /// Validate raw decoder parameters.
    ///
    /// Fails with [`Error::InvalidParameters`] on the first value outside its legal set.
    pub fn new(
        bit_depth: u8,
        num_channels: u8,
        sample_rate: u32,
        frame_us: u16,
        bit_rate: u32,
    ) -> Result<Self> {
        let bit_depth = BitDepth::try_from(bit_depth)?;
        if num_channels != MONO {
            return Err(Error::invalid(format!(
                "unsupported channel count {num_channels} (only mono is supported)"
            )));
        }
        let sample_rate = SampleRate::try_from(sample_rate)?;
        let frame_duration = FrameDuration::try_from(frame_us)?;

        Ok(Self::from_parts(bit_depth, sample_rate, frame_duration, bit_rate))
    }

    /// Build a configuration from already-typed parts. This cannot fail.
    pub fn from_parts(
        bit_depth: BitDepth,
        sample_rate: SampleRate,
        frame_duration: FrameDuration,
        bit_rate: u32,
    ) -> Self {
        Self {
            bit_depth,
            sample_rate,
            frame_duration,
            bit_rate,
        }
    }

    pub fn bit_depth(&self) -> BitDepth {
        self.bit_depth
    }

    /// Always [`MONO`].
    pub fn num_channels(&self) -> u8 {
        MONO
    }

    pub fn sample_rate(&self) -> SampleRate {
        self.sample_rate
    }

    pub fn frame_duration(&self) -> FrameDuration {
        self.frame_duration
    }

    pub fn bit_rate(&self) -> u32 {
        self.bit_rate
    }

    pub fn pcm_format(&self) -> PcmFormat {
        self.bit_depth.pcm_format()
    }
}

/// Wire form of [`Config`], before validation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct RawConfig {
    bit_depth: u8,
    #[serde(default = "default_channels")]
    num_channels: u8,
    sample_rate: u32,
    frame_us: u16,
    bit_rate: u32,
}

fn default_channels() -> u8 {
    MONO
}

impl TryFrom<RawConfig> for Config {
    type Error = Error;

    fn try_from(raw: RawConfig) -> Result<Self> {
        Config::new(
            raw.bit_depth,
            raw.num_channels,
            raw.sample_rate,
            raw.frame_us,
            raw.bit_rate,
        )
    }
}

impl From<Config> for RawConfig {
    fn from(config: Config) -> Self {
        Self {
            bit_depth: config.bit_depth.bits(),
            num_channels: MONO,
            sample_rate: config.sample_rate.hz(),
            frame_us: config.frame_duration.micros(),
            bit_rate: config.bit_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_every_legal_combination() {
        for bits in [16, 24] {
            for hz in [8_000, 16_000, 24_000, 32_000, 48_000] {
                for us in [2_500, 5_000, 7_500, 10_000] {
                    let config = Config::new(bits, 1, hz, us, 64_000)
                        .unwrap_or_else(|err| panic!("{bits}/{hz}/{us}: {err}"));
                    assert_eq!(config.bit_depth().bits(), bits);
                    assert_eq!(config.sample_rate().hz(), hz);
                    assert_eq!(config.frame_duration().micros(), us);
                }
            }
        }
    }

    #[test]
    fn rejects_values_outside_legal_sets() {
        let bad = [
            (8, 1, 16_000, 10_000),
            (32, 1, 16_000, 10_000),
            (16, 0, 16_000, 10_000),
            (16, 2, 16_000, 10_000),
            (16, 1, 44_100, 10_000),
            (16, 1, 0, 10_000),
            (16, 1, 16_000, 20_000),
            (16, 1, 16_000, 0),
        ];
        for (bits, channels, hz, us) in bad {
            let err = Config::new(bits, channels, hz, us, 32_000).unwrap_err();
            assert!(
                matches!(err, Error::InvalidParameters(_)),
                "{bits}/{channels}/{hz}/{us} gave {err:?}"
            );
        }
    }

    #[test]
    fn bit_rate_is_not_validated() -> anyhow::Result<()> {
        assert_eq!(Config::new(16, 1, 16_000, 10_000, 0)?.bit_rate(), 0);
        assert_eq!(Config::new(16, 1, 16_000, 10_000, u32::MAX)?.bit_rate(), u32::MAX);
        Ok(())
    }

    #[test]
    fn pcm_format_follows_bit_depth() -> anyhow::Result<()> {
        assert_eq!(Config::new(24, 1, 48_000, 10_000, 0)?.pcm_format(), PcmFormat::S24Le3);
        assert_eq!(Config::new(16, 1, 48_000, 10_000, 0)?.pcm_format(), PcmFormat::S16);
        Ok(())
    }

    #[test]
    fn json_round_trips_through_validation() -> anyhow::Result<()> {
        let config: Config = serde_json::from_str(
            r#"{"bit_depth":24,"sample_rate":48000,"frame_us":7500,"bit_rate":96000}"#,
        )?;
        assert_eq!(config.bit_depth(), BitDepth::TwentyFour);
        assert_eq!(config.num_channels(), MONO);

        let json = serde_json::to_value(config)?;
        assert_eq!(json["num_channels"], 1);
        assert_eq!(json["frame_us"], 7500);
        Ok(())
    }

    #[test]
    fn json_with_illegal_values_is_rejected() {
        let res: serde_json::Result<Config> = serde_json::from_str(
            r#"{"bit_depth":16,"num_channels":2,"sample_rate":16000,"frame_us":10000,"bit_rate":0}"#,
        );
        let err = res.unwrap_err();
        assert!(err.to_string().contains("only mono"));
    }
}
