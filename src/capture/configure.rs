use super::{
    constants::*,
    port::{Edge, Pull},
    Error,
};

/// This trait allows a configure function to be implemented on the channel and
/// three-phase types. Each provides a bundle of parameters and gets back a fully
/// set up value or the reason the parameters were rejected.
pub trait Configure<'a>
where Self: Sized
{
    /// The type of the parameters that need to be provided to the configure function
    type Params;
    /// Validate the parameters and construct `Self`
    fn configure(_: Self::Params) -> Result<Self, Error>;
}

/// Per channel measurement settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelConfig {
    /// Line frequency samples are validated against. 50 or 60
    pub expected_hz: u32,
    /// Allowed deviation from `expected_hz`, in percent. (0, 50]
    pub tolerance_percent: f32,
    /// Width of the hardware capture counter. 1..=32
    pub counter_bits: u8,
    /// Pull resistor for the opto output
    pub pull: Pull,
    /// Capture polarity
    pub edge: Edge,
}

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            expected_hz: DEFAULT_LINE_FREQ_HZ,
            tolerance_percent: DEFAULT_FREQ_TOLERANCE_PERCENT,
            counter_bits: DEFAULT_COUNTER_BITS,
            pull: Pull::Up,
            edge: Edge::Rising,
        }
    }
}

impl ChannelConfig {
    /// Checks every field is inside its accepted range
    pub fn validate(&self) -> Result<(), Error> {
        validate_line_frequency(self.expected_hz)?;
        validate_tolerance_percent(self.tolerance_percent)?;
        if self.counter_bits == 0 || self.counter_bits > 32 {
            return Err(Error::InvalidArgument);
        }
        Ok(())
    }
}

pub(crate) fn validate_line_frequency(hz: u32) -> Result<(), Error> {
    if ACCEPTED_LINE_FREQS_HZ.contains(&hz) {
        Ok(())
    } else {
        Err(Error::InvalidArgument)
    }
}

pub(crate) fn validate_tolerance_percent(percent: f32) -> Result<(), Error> {
    // NaN fails both comparisons
    if percent > 0. && percent <= MAX_FREQ_TOLERANCE_PERCENT {
        Ok(())
    } else {
        Err(Error::InvalidArgument)
    }
}
