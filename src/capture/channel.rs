use core::convert::TryFrom;
use log::{debug, info, warn};
#[cfg(feature = "edge_trace")]
use log::trace;
use super::{
    configure::{validate_line_frequency, validate_tolerance_percent, ChannelConfig, Configure},
    constants::MICROS_PER_SECOND,
    phase::wrapping_delta,
    port::CapturePort,
    sample::{ChannelSample, ChannelStatistics},
    snapshot::SampleCell,
    Error,
};

/// Called with every valid sample, from the same context as `process_edge`.
/// Typically the capture interrupt, so it must return quickly
pub type EdgeListener = fn(&ChannelSample);

/// Zero crossing capture processor for one opto input.
///
/// Turns successive capture counter values into period, frequency and statistics
/// and publishes each sample to its `SampleCell`. Call `on_capture` (or
/// `process_edge` with values you read yourself) from the capture interrupt.
pub struct ZcChannel<'a, P> {
    port: P,
    config: ChannelConfig,
    cell: &'a SampleCell,
    sample: ChannelSample,
    statistics: ChannelStatistics,
    last_capture_value: Option<u32>,
    listener: Option<EdgeListener>,
}

impl<'a, P: CapturePort> Configure<'a> for ZcChannel<'a, P> {
    type Params = (
        P,
        ChannelConfig,
        &'a SampleCell,
    );
    fn configure((mut port, config, cell): Self::Params) -> Result<Self, Error> {
        config.validate()?;

        port.configure_pull(config.pull);
        port.select_edge(config.edge);

        let channel = Self {
            port,
            config,
            cell,
            sample: ChannelSample::default(),
            statistics: ChannelStatistics::default(),
            last_capture_value: None,
            listener: None,
        };
        channel.cell.publish(&channel.sample);

        debug!("Channel configured: {:?}", config);
        Ok(channel)
    }
}

impl<'a, P: CapturePort> ZcChannel<'a, P> {
    /// Reads the latched capture value, counter rate and time from the port and
    /// processes them as one edge. Call from the capture interrupt
    pub fn on_capture(&mut self) -> Result<Option<ChannelSample>, Error> {
        let raw = self.port.capture_value();
        let counter_hz = self.port.counter_frequency_hz();
        let now_us = self.port.now_us();
        self.process_edge(raw, counter_hz, now_us)
    }

    /// Enables capture events on the port
    pub fn start(&mut self) {
        self.port.start_capture();
        info!("Zero crossing capture started");
    }

    /// Disables capture events on the port
    pub fn stop(&mut self) {
        self.port.stop_capture();
        info!("Zero crossing capture stopped");
    }

    /// Forgets the previous capture, zeroes the edge count, invalidates the
    /// sample and resets the hardware counter. Statistics are kept
    pub fn reset(&mut self) {
        self.last_capture_value = None;
        self.sample.edge_count = 0;
        self.sample.valid = false;
        self.cell.publish(&self.sample);
        self.port.reset_capture();
        info!("Zero crossing channel reset");
    }

    /// Microseconds since the last measured edge, `None` before the first one
    pub fn time_since_edge(&self) -> Option<u32> {
        if self.sample.edge_count == 0 {
            return None;
        }
        Some(self.port.now_us().wrapping_sub(self.sample.timestamp_us))
    }

    /// The port this channel was configured with
    pub fn port(&self) -> &P {
        &self.port
    }

    /// Mutable access to the port, e.g. to clear its interrupt flag
    pub fn port_mut(&mut self) -> &mut P {
        &mut self.port
    }
}

impl<'a, P> ZcChannel<'a, P> {
    /// Turns one captured counter value into a sample.
    ///
    /// Returns `Ok(None)` for the first edge after configure/reset since there is
    /// nothing to measure against yet. Zero `raw_counter_value` or
    /// `counter_frequency_hz` is rejected without touching any state. An interval
    /// that is 0us or doesn't fit a `u32` of microseconds gives `DegenerateInterval`.
    pub fn process_edge(
        &mut self,
        raw_counter_value: u32,
        counter_frequency_hz: u32,
        now_us: u32,
    ) -> Result<Option<ChannelSample>, Error> {
        if raw_counter_value == 0 || counter_frequency_hz == 0 {
            return Err(Error::InvalidArgument);
        }

        let previous = match self.last_capture_value.replace(raw_counter_value) {
            Some(previous) => previous,
            None => return Ok(None),
        };

        let period_ticks = wrapping_delta(previous, raw_counter_value, self.config.counter_bits);
        // Widened so fast counters don't overflow, still truncating like the u32 maths
        let period_us = u64::from(period_ticks) * u64::from(MICROS_PER_SECOND)
            / u64::from(counter_frequency_hz);
        let period_us = match u32::try_from(period_us) {
            Ok(period_us) if period_us > 0 => period_us,
            _ => {
                warn!("Degenerate interval: {} ticks at {}Hz", period_ticks, counter_frequency_hz);
                return Err(Error::DegenerateInterval);
            }
        };
        let frequency_hz = MICROS_PER_SECOND / period_us;
        let valid = frequency_within_tolerance(
            frequency_hz,
            self.config.expected_hz,
            self.config.tolerance_percent,
        );

        self.sample = ChannelSample {
            period_ticks,
            period_us,
            frequency_hz,
            timestamp_us: now_us,
            edge_count: self.sample.edge_count.wrapping_add(1),
            valid,
        };

        if valid {
            self.statistics.record_valid(period_us, frequency_hz);
        } else {
            self.statistics.record_invalid();
        }

        self.cell.publish(&self.sample);

        #[cfg(feature = "edge_trace")]
        trace!("edge {}: {}us {}Hz valid={}", self.sample.edge_count, period_us, frequency_hz, valid);

        if valid {
            if let Some(listener) = self.listener {
                listener(&self.sample);
            }
        }

        Ok(Some(self.sample))
    }

    /// Copy of the latest sample
    pub fn sample(&self) -> ChannelSample {
        self.sample
    }

    /// The cell this channel publishes to
    pub fn cell(&self) -> &'a SampleCell {
        self.cell
    }

    /// Measured line frequency, if the latest sample is valid
    pub fn frequency_hz(&self) -> Option<u32> {
        if self.sample.valid { Some(self.sample.frequency_hz) } else { None }
    }

    /// Measured period, if the latest sample is valid
    pub fn period_us(&self) -> Option<u32> {
        if self.sample.valid { Some(self.sample.period_us) } else { None }
    }

    /// Half the measured period (180 degrees), if the latest sample is valid
    pub fn half_period_us(&self) -> Option<u32> {
        self.sample.half_period_us()
    }

    /// A quarter of the measured period (90 degrees), if the latest sample is valid
    pub fn quarter_period_us(&self) -> Option<u32> {
        self.sample.quarter_period_us()
    }

    /// Edges measured since configure/reset
    pub fn edge_count(&self) -> u32 {
        self.sample.edge_count
    }

    /// True if the latest sample was within tolerance
    pub fn is_valid(&self) -> bool {
        self.sample.valid
    }

    /// True if an edge has been measured since the count was `last_count`
    pub fn is_new_edge(&self, last_count: u32) -> bool {
        self.sample.edge_count != last_count
    }

    /// Cumulative statistics since configure or the last `reset_statistics`
    pub fn statistics(&self) -> &ChannelStatistics {
        &self.statistics
    }

    /// Clears the statistics only
    pub fn reset_statistics(&mut self) {
        self.statistics = ChannelStatistics::default();
    }

    /// Current configuration
    pub fn config(&self) -> &ChannelConfig {
        &self.config
    }

    /// Sets the line frequency samples are validated against. Only 50 and 60 are accepted
    pub fn set_expected_frequency(&mut self, hz: u32) -> Result<(), Error> {
        if let Err(e) = validate_line_frequency(hz) {
            debug!("Rejected expected frequency {}Hz", hz);
            return Err(e);
        }
        self.config.expected_hz = hz;
        debug!("Expected frequency set to {}Hz", hz);
        Ok(())
    }

    /// Sets the allowed deviation from the expected frequency. (0, 50] percent
    pub fn set_frequency_tolerance(&mut self, percent: f32) -> Result<(), Error> {
        if let Err(e) = validate_tolerance_percent(percent) {
            debug!("Rejected frequency tolerance {}%", percent);
            return Err(e);
        }
        self.config.tolerance_percent = percent;
        debug!("Frequency tolerance set to {}%", percent);
        Ok(())
    }

    /// Registers (or with `None` removes) the valid sample listener
    pub fn set_listener(&mut self, listener: Option<EdgeListener>) {
        self.listener = listener;
    }

    /// Gives the port back
    pub fn release(self) -> P {
        self.port
    }
}

/// `|measured - expected| / expected * 100 <= tolerance_percent`. Zero on either side is never valid
pub fn frequency_within_tolerance(measured_hz: u32, expected_hz: u32, tolerance_percent: f32) -> bool {
    if measured_hz == 0 || expected_hz == 0 {
        return false;
    }
    let diff = (i64::from(measured_hz) - i64::from(expected_hz)).abs() as f32;
    diff / expected_hz as f32 * 100. <= tolerance_percent
}
