#![allow(dead_code)]

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use lc3_decoder::engine::{Engine, Region};
use lc3_decoder::pcm::PcmFormat;

/// Counters shared between a [`FakeEngine`], its clones and the handles it builds.
#[derive(Debug, Default)]
pub struct Stats {
    pub setups: AtomicUsize,
    pub releases: AtomicUsize,
    pub decodes: AtomicUsize,
    pub concealments: AtomicUsize,
    pub last_format: Mutex<Option<PcmFormat>>,
    pub last_stride: AtomicUsize,
    pub last_region_bytes: AtomicUsize,
}

impl Stats {
    pub fn setups(&self) -> usize {
        self.setups.load(Ordering::SeqCst)
    }

    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    pub fn decodes(&self) -> usize {
        self.decodes.load(Ordering::SeqCst)
    }

    pub fn concealments(&self) -> usize {
        self.concealments.load(Ordering::SeqCst)
    }

    pub fn live(&self) -> usize {
        self.setups() - self.releases()
    }
}

/// A stand-in codec engine following the LC3 frame geometry formulas.
///
/// Decoding writes silence; the interesting part is the bookkeeping in [`Stats`].
#[derive(Debug, Clone, Default)]
pub struct FakeEngine {
    pub stats: Arc<Stats>,
    pub fail_setup: bool,
    pub fail_decode: bool,
    pub broken_geometry: bool,
    pub size_override: Option<usize>,
}

#[derive(Debug)]
pub struct FakeHandle {
    stats: Arc<Stats>,
    marker: *mut u8,
}

// The marker only points into the region owned alongside the handle.
unsafe impl Send for FakeHandle {}

impl Drop for FakeHandle {
    fn drop(&mut self) {
        self.stats.releases.fetch_add(1, Ordering::SeqCst);
    }
}

fn dt_index(frame_us: u16) -> Option<i64> {
    match frame_us {
        2_500 => Some(0),
        5_000 => Some(1),
        7_500 => Some(2),
        10_000 => Some(3),
        _ => None,
    }
}

fn valid_rate(sample_rate: u32) -> bool {
    matches!(sample_rate, 8_000 | 16_000 | 24_000 | 32_000 | 48_000)
}

impl Engine for FakeEngine {
    type Handle = FakeHandle;

    fn decoder_size(&self, hrmode: bool, frame_us: u16, sample_rate: u32) -> usize {
        if let Some(size) = self.size_override {
            return size;
        }
        match usize::try_from(self.frame_samples(hrmode, frame_us, sample_rate)) {
            Ok(samples) => 64 + samples * 4,
            Err(_) => 0,
        }
    }

    unsafe fn setup_decoder(
        &self,
        _hrmode: bool,
        _frame_us: u16,
        _sample_rate: u32,
        _pcm_rate: u32,
        mem: &mut Region,
    ) -> Option<Self::Handle> {
        if self.fail_setup || mem.is_empty() {
            return None;
        }
        mem.as_bytes_mut()[0] = 0xAB;
        self.stats.setups.fetch_add(1, Ordering::SeqCst);
        self.stats
            .last_region_bytes
            .store(mem.len(), Ordering::SeqCst);
        Some(FakeHandle {
            stats: Arc::clone(&self.stats),
            marker: mem.as_mut_ptr(),
        })
    }

    fn frame_samples(&self, _hrmode: bool, frame_us: u16, sample_rate: u32) -> i32 {
        if self.broken_geometry || dt_index(frame_us).is_none() || !valid_rate(sample_rate) {
            return -1;
        }
        (i64::from(sample_rate) * i64::from(frame_us) / 1_000_000) as i32
    }

    fn frame_block_bytes(
        &self,
        _hrmode: bool,
        frame_us: u16,
        sample_rate: u32,
        channels: u8,
        bit_rate: u32,
    ) -> i32 {
        let Some(dt) = dt_index(frame_us) else {
            return -1;
        };
        if self.broken_geometry || !valid_rate(sample_rate) || channels == 0 {
            return -1;
        }
        let ch = i64::from(channels);
        (i64::from(bit_rate) * (1 + dt) / 3200).clamp(20 * ch, 400 * ch) as i32
    }

    unsafe fn decode(
        &self,
        handle: &mut Self::Handle,
        frame: Option<&[u8]>,
        format: PcmFormat,
        pcm: &mut [u8],
        stride: usize,
    ) -> i32 {
        // The region must still be alive and untouched while the handle exists.
        assert_eq!(unsafe { *handle.marker }, 0xAB);

        *self.stats.last_format.lock().unwrap() = Some(format);
        self.stats.last_stride.store(stride, Ordering::SeqCst);
        if self.fail_decode {
            return -1;
        }
        match frame {
            Some(_) => self.stats.decodes.fetch_add(1, Ordering::SeqCst),
            None => self.stats.concealments.fetch_add(1, Ordering::SeqCst),
        };
        pcm.fill(0);
        0
    }
}
