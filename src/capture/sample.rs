use super::constants::MICROS_PER_SECOND;

/// One measured zero crossing interval
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelSample {
    /// Raw capture counter delta since the previous edge
    pub period_ticks: u32,
    /// `period_ticks` converted to microseconds, truncated
    pub period_us: u32,
    /// `1_000_000 / period_us`, truncated
    pub frequency_hz: u32,
    /// Time of this edge from the port's microsecond clock
    pub timestamp_us: u32,
    /// Edges measured since the channel was created or last reset. Wraps
    pub edge_count: u32,
    /// True if `frequency_hz` is within tolerance of the expected line frequency
    pub valid: bool,
}

impl ChannelSample {
    /// Half of the measured period, if the sample is valid
    pub fn half_period_us(&self) -> Option<u32> {
        if self.valid { Some(self.period_us / 2) } else { None }
    }

    /// A quarter of the measured period, if the sample is valid
    pub fn quarter_period_us(&self) -> Option<u32> {
        if self.valid { Some(self.period_us / 4) } else { None }
    }
}

/// Cumulative statistics for one channel.
///
/// Only valid samples feed the min/max/average figures, invalid ones are counted
/// and otherwise ignored. `valid_count + invalid_count == total_count` always.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelStatistics {
    /// Every measured edge
    pub total_count: u32,
    /// Edges whose frequency was within tolerance
    pub valid_count: u32,
    /// Edges whose frequency was out of tolerance
    pub invalid_count: u32,
    /// Shortest valid period, 0 until the first valid sample
    pub min_period_us: u32,
    /// Longest valid period
    pub max_period_us: u32,
    /// Mean of all valid periods, truncated
    pub avg_period_us: u32,
    /// Lowest valid frequency, 0 until the first valid sample
    pub min_frequency_hz: f32,
    /// Highest valid frequency
    pub max_frequency_hz: f32,
    /// Frequency corresponding to `avg_period_us`
    pub avg_frequency_hz: f32,
    period_sum_us: u64,
    period_count: u64,
}

impl ChannelStatistics {
    pub(crate) fn record_valid(&mut self, period_us: u32, frequency_hz: u32) {
        self.total_count = self.total_count.wrapping_add(1);
        self.valid_count = self.valid_count.wrapping_add(1);

        if self.min_period_us == 0 || period_us < self.min_period_us {
            self.min_period_us = period_us;
        }
        if period_us > self.max_period_us {
            self.max_period_us = period_us;
        }

        let freq = frequency_hz as f32;
        if self.min_frequency_hz == 0. || freq < self.min_frequency_hz {
            self.min_frequency_hz = freq;
        }
        if freq > self.max_frequency_hz {
            self.max_frequency_hz = freq;
        }

        // Plain sum / count so the average is reproducible from the edge history
        self.period_sum_us += u64::from(period_us);
        self.period_count += 1;
        self.avg_period_us = (self.period_sum_us / self.period_count) as u32;
        if self.avg_period_us > 0 {
            self.avg_frequency_hz = MICROS_PER_SECOND as f32 / self.avg_period_us as f32;
        }
    }

    pub(crate) fn record_invalid(&mut self) {
        self.total_count = self.total_count.wrapping_add(1);
        self.invalid_count = self.invalid_count.wrapping_add(1);
    }
}
