use core::fmt;
use crate::three_phase::Phase;

/// Errors returned by the capture and three-phase operations
///
/// Out of tolerance edges are not errors, they produce a sample with
/// `valid == false` and bump the invalid counter instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A required parameter was zero or outside its accepted range
    InvalidArgument,
    /// The operation needs state that hasn't been produced yet
    NotInitialized,
    /// The measured interval truncated to 0us, or overflowed 32 bits of us, so no
    /// frequency can be derived
    DegenerateInterval,
    /// A three-phase pass found this phase without a valid sample
    ChannelUnavailable(Phase),
    /// A blocking wait ran out of time
    Timeout,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidArgument => f.write_str("invalid argument"),
            Error::NotInitialized => f.write_str("not initialized"),
            Error::DegenerateInterval => f.write_str("interval out of range to derive a frequency"),
            Error::ChannelUnavailable(phase) => write!(f, "no valid sample on phase {}", phase),
            Error::Timeout => f.write_str("timed out waiting for zero crossing"),
        }
    }
}
