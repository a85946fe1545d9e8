use core::{
    convert::Infallible,
    sync::atomic::{fence, AtomicBool, AtomicU32, Ordering},
};
use embedded_hal::blocking::delay::DelayMs;
use log::warn;
use super::{
    port::MicrosClock,
    sample::ChannelSample,
    Error,
};

/// Latest sample of one channel, shared between the capture interrupt and
/// whatever polls it.
///
/// A sequence lock over atomics: the channel is the only writer and never waits,
/// readers retry until they copy every field from the same publish. Put one in a
/// `static` and hand `&'static SampleCell` to both sides.
#[derive(Debug)]
pub struct SampleCell {
    seq: AtomicU32,
    period_ticks: AtomicU32,
    period_us: AtomicU32,
    frequency_hz: AtomicU32,
    timestamp_us: AtomicU32,
    edge_count: AtomicU32,
    valid: AtomicBool,
}

impl Default for SampleCell {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleCell {
    /// An empty cell holding the default (invalid, zero edge) sample
    pub const fn new() -> Self {
        Self {
            seq: AtomicU32::new(0),
            period_ticks: AtomicU32::new(0),
            period_us: AtomicU32::new(0),
            frequency_hz: AtomicU32::new(0),
            timestamp_us: AtomicU32::new(0),
            edge_count: AtomicU32::new(0),
            valid: AtomicBool::new(false),
        }
    }

    /// Single writer only. Owned by the channel this cell was configured with
    pub(crate) fn publish(&self, sample: &ChannelSample) {
        let seq = self.seq.load(Ordering::Relaxed);
        // Odd while the fields are inconsistent
        self.seq.store(seq.wrapping_add(1), Ordering::Relaxed);
        fence(Ordering::Release);

        self.period_ticks.store(sample.period_ticks, Ordering::Relaxed);
        self.period_us.store(sample.period_us, Ordering::Relaxed);
        self.frequency_hz.store(sample.frequency_hz, Ordering::Relaxed);
        self.timestamp_us.store(sample.timestamp_us, Ordering::Relaxed);
        self.edge_count.store(sample.edge_count, Ordering::Relaxed);
        self.valid.store(sample.valid, Ordering::Relaxed);

        self.seq.store(seq.wrapping_add(2), Ordering::Release);
    }

    /// A consistent copy of the latest sample
    pub fn snapshot(&self) -> ChannelSample {
        loop {
            let before = self.seq.load(Ordering::Acquire);
            if before & 1 == 1 {
                core::hint::spin_loop();
                continue;
            }

            let sample = ChannelSample {
                period_ticks: self.period_ticks.load(Ordering::Relaxed),
                period_us: self.period_us.load(Ordering::Relaxed),
                frequency_hz: self.frequency_hz.load(Ordering::Relaxed),
                timestamp_us: self.timestamp_us.load(Ordering::Relaxed),
                edge_count: self.edge_count.load(Ordering::Relaxed),
                valid: self.valid.load(Ordering::Relaxed),
            };

            fence(Ordering::Acquire);
            if self.seq.load(Ordering::Relaxed) == before {
                return sample;
            }
        }
    }

    /// Edge count of the latest sample. A single field, so no retry needed
    pub fn edge_count(&self) -> u32 {
        self.edge_count.load(Ordering::Acquire)
    }

    /// True if an edge has been measured since the count was `last_count`
    pub fn is_new_edge(&self, last_count: u32) -> bool {
        self.edge_count() != last_count
    }

    /// Non-blocking check for an edge measured since `last_count`
    pub fn poll_new_edge(&self, last_count: u32) -> nb::Result<ChannelSample, Infallible> {
        let sample = self.snapshot();
        if sample.edge_count != last_count {
            Ok(sample)
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Blocks until the next edge is measured, polling once a millisecond.
    ///
    /// A `timeout_ms` of 0 waits forever. Elapsed time is taken from `clock` and is
    /// wrap safe, so timeouts up to the clock's ~71 minute wrap period work.
    pub fn wait_for_edge<C, D>(&self, clock: &C, delay: &mut D, timeout_ms: u32) -> Result<ChannelSample, Error>
    where
        C: MicrosClock,
        D: DelayMs<u32>,
    {
        let last_count = self.edge_count();
        let start_us = clock.now_us();
        let budget_us = u64::from(timeout_ms) * 1_000;

        loop {
            match self.poll_new_edge(last_count) {
                Ok(sample) => return Ok(sample),
                Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(never)) => match never {},
            }

            if timeout_ms > 0 {
                let elapsed_us = clock.now_us().wrapping_sub(start_us);
                if u64::from(elapsed_us) >= budget_us {
                    warn!("No zero crossing within {}ms", timeout_ms);
                    return Err(Error::Timeout);
                }
            }

            delay.delay_ms(1);
        }
    }
}
