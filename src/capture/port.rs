/// Pull resistor applied to the optocoupler output pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pull {
    /// Output idles high, the opto pulls it low around each zero crossing
    Up,
    /// Output idles low, the opto pulls it high around each zero crossing
    Down,
}

/// Which transition of the opto output the capture timer latches on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Low to high
    Rising,
    /// High to low
    Falling,
}

/// Free running microsecond time source. Wraps at `u32::MAX`
pub trait MicrosClock {
    /// Current time in microseconds
    fn now_us(&self) -> u32;
}

/// The timer input capture + GPIO capabilities a channel needs from the board.
///
/// Implement this on whatever wraps the HAL's capture timer for one opto
/// input. Everything here should be a short forwarding call, `capture_value`
/// in particular is read from the capture interrupt.
pub trait CapturePort: MicrosClock {
    /// The counter value latched by the last capture event
    fn capture_value(&mut self) -> u32;
    /// The rate the capture counter ticks at, in Hz
    fn counter_frequency_hz(&self) -> u32;
    /// Zero the capture counter
    fn reset_capture(&mut self);
    /// Enable capture events
    fn start_capture(&mut self);
    /// Disable capture events
    fn stop_capture(&mut self);
    /// Apply the pull resistor configuration to the input pin
    fn configure_pull(&mut self, pull: Pull);
    /// Select the capture polarity. Boards with fixed polarity can ignore it
    fn select_edge(&mut self, _edge: Edge) {}
}
