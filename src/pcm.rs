//! PCM sample layouts produced by the decoder.

/// Byte layout of decoded samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PcmFormat {
    /// 16-bit signed, little-endian.
    S16,
    /// 24-bit signed, packed into 3 little-endian bytes.
    S24Le3,
}

impl PcmFormat {
    pub fn bytes_per_sample(self) -> usize {
        match self {
            Self::S16 => 2,
            Self::S24Le3 => 3,
        }
    }

    pub fn bits_per_sample(self) -> u16 {
        match self {
            Self::S16 => 16,
            Self::S24Le3 => 24,
        }
    }
}

/// Unpack raw decoder output into sign-extended integer samples.
///
/// Trailing bytes that do not form a whole sample are ignored.
pub fn unpack_samples(format: PcmFormat, bytes: &[u8]) -> Vec<i32> {
    match format {
        PcmFormat::S16 => bytes
            .chunks_exact(2)
            .map(|c| i32::from(i16::from_le_bytes([c[0], c[1]])))
            .collect(),
        PcmFormat::S24Le3 => bytes
            .chunks_exact(3)
            .map(|c| i24_from_le([c[0], c[1], c[2]]))
            .collect(),
    }
}

#[inline]
fn i24_from_le(bytes: [u8; 3]) -> i32 {
    // Place the 24 bits in the top of an i32, then arithmetic-shift back to sign-extend.
    i32::from_le_bytes([0, bytes[0], bytes[1], bytes[2]]) >> 8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpacks_s16_little_endian() {
        let bytes = [0x01, 0x00, 0xff, 0xff, 0x00, 0x80];
        assert_eq!(unpack_samples(PcmFormat::S16, &bytes), vec![1, -1, -32768]);
    }

    #[test]
    fn unpacks_and_sign_extends_s24() {
        let bytes = [
            0xff, 0xff, 0x7f, // max
            0x00, 0x00, 0x80, // min
            0xff, 0xff, 0xff, // -1
        ];
        assert_eq!(
            unpack_samples(PcmFormat::S24Le3, &bytes),
            vec![8_388_607, -8_388_608, -1]
        );
    }

    #[test]
    fn ignores_partial_trailing_sample() {
        assert_eq!(unpack_samples(PcmFormat::S24Le3, &[1, 0, 0, 9, 9]), vec![1]);
    }
}
