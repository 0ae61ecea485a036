use std::os::raw::{c_int, c_uint, c_void};
use std::ptr::NonNull;

use super::{Engine, Region};
use crate::pcm::PcmFormat;

#[repr(C)]
struct Lc3DecoderRaw {
    _private: [u8; 0],
}

// `enum lc3_pcm_format` from lc3.h.
const LC3_PCM_FORMAT_S16: c_int = 0;
const LC3_PCM_FORMAT_S24_3LE: c_int = 2;

#[link(name = "lc3")]
unsafe extern "C" {
    fn lc3_hr_decoder_size(hrmode: bool, dt_us: c_int, sr_hz: c_int) -> c_uint;
    fn lc3_hr_setup_decoder(
        hrmode: bool,
        dt_us: c_int,
        sr_hz: c_int,
        sr_pcm_hz: c_int,
        mem: *mut c_void,
    ) -> *mut Lc3DecoderRaw;
    fn lc3_hr_frame_samples(hrmode: bool, dt_us: c_int, sr_hz: c_int) -> c_int;
    fn lc3_hr_frame_block_bytes(
        hrmode: bool,
        dt_us: c_int,
        sr_hz: c_int,
        nchannels: c_int,
        bitrate: c_int,
    ) -> c_int;
    fn lc3_decode(
        decoder: *mut Lc3DecoderRaw,
        input: *const c_void,
        nbytes: c_int,
        fmt: c_int,
        pcm: *mut c_void,
        stride: c_int,
    ) -> c_int;
}

/// The reference LC3 implementation, linked as a system library.
#[derive(Debug, Clone, Copy, Default)]
pub struct Liblc3;

/// A liblc3 decoder living inside a [`Region`].
#[derive(Debug)]
pub struct Liblc3Handle {
    raw: NonNull<Lc3DecoderRaw>,
}

// The handle is only a pointer into a region the owning decoder moves along with it.
unsafe impl Send for Liblc3Handle {}

fn to_c_int(value: u32) -> c_int {
    c_int::try_from(value).unwrap_or(c_int::MAX)
}

impl Engine for Liblc3 {
    type Handle = Liblc3Handle;

    fn decoder_size(&self, hrmode: bool, frame_us: u16, sample_rate: u32) -> usize {
        // SAFETY: pure computation on plain integers.
        let size =
            unsafe { lc3_hr_decoder_size(hrmode, c_int::from(frame_us), to_c_int(sample_rate)) };
        size as usize
    }

    unsafe fn setup_decoder(
        &self,
        hrmode: bool,
        frame_us: u16,
        sample_rate: u32,
        pcm_rate: u32,
        mem: &mut Region,
    ) -> Option<Self::Handle> {
        if mem.is_empty() {
            return None;
        }
        // SAFETY: `mem` is sized by `lc3_hr_decoder_size` for the same parameters and the
        // caller keeps it alive for the lifetime of the handle.
        let raw = unsafe {
            lc3_hr_setup_decoder(
                hrmode,
                c_int::from(frame_us),
                to_c_int(sample_rate),
                to_c_int(pcm_rate),
                mem.as_mut_ptr().cast(),
            )
        };
        NonNull::new(raw).map(|raw| Liblc3Handle { raw })
    }

    fn frame_samples(&self, hrmode: bool, frame_us: u16, sample_rate: u32) -> i32 {
        // SAFETY: pure computation on plain integers.
        unsafe { lc3_hr_frame_samples(hrmode, c_int::from(frame_us), to_c_int(sample_rate)) }
    }

    fn frame_block_bytes(
        &self,
        hrmode: bool,
        frame_us: u16,
        sample_rate: u32,
        channels: u8,
        bit_rate: u32,
    ) -> i32 {
        // SAFETY: pure computation on plain integers.
        unsafe {
            lc3_hr_frame_block_bytes(
                hrmode,
                c_int::from(frame_us),
                to_c_int(sample_rate),
                c_int::from(channels),
                to_c_int(bit_rate),
            )
        }
    }

    unsafe fn decode(
        &self,
        handle: &mut Self::Handle,
        frame: Option<&[u8]>,
        format: PcmFormat,
        pcm: &mut [u8],
        stride: usize,
    ) -> i32 {
        let fmt = match format {
            PcmFormat::S16 => LC3_PCM_FORMAT_S16,
            PcmFormat::S24Le3 => LC3_PCM_FORMAT_S24_3LE,
        };
        // liblc3 runs packet-loss concealment when handed a null block.
        let (input, nbytes) = match frame {
            Some(frame) => (frame.as_ptr().cast::<c_void>(), frame.len()),
            None => (std::ptr::null(), 0),
        };
        let (Ok(nbytes), Ok(stride)) = (c_int::try_from(nbytes), c_int::try_from(stride)) else {
            return -1;
        };

        // SAFETY: the caller guarantees the handle's region is alive and `pcm` holds a full
        // frame for the handle's configuration.
        unsafe {
            lc3_decode(
                handle.raw.as_ptr(),
                input,
                nbytes,
                fmt,
                pcm.as_mut_ptr().cast(),
                stride,
            )
        }
    }
}
