/// Line frequency assumed until the user configures one, in Hz
pub const DEFAULT_LINE_FREQ_HZ: u32 = 50;

/// Line frequencies a channel can be told to expect, in Hz
pub const ACCEPTED_LINE_FREQS_HZ: [u32; 2] = [50, 60];

/// Frequency tolerance used for sample validation until configured, in percent
pub const DEFAULT_FREQ_TOLERANCE_PERCENT: f32 = 5.;

/// Largest frequency tolerance a channel accepts, in percent.
/// Lower bound is exclusive zero
pub const MAX_FREQ_TOLERANCE_PERCENT: f32 = 50.;

/// Width of the capture counter unless configured otherwise
pub const DEFAULT_COUNTER_BITS: u8 = 32;

/// Microseconds in a second, used for every tick/period/frequency conversion
pub const MICROS_PER_SECOND: u32 = 1_000_000;

/// Angular tolerance used by the sequence classifier until configured, in degrees
pub const DEFAULT_SEQUENCE_TOLERANCE_DEG: f32 = 10.;

/// Largest sequence tolerance accepted, in degrees. Lower bound is exclusive zero
pub const MAX_SEQUENCE_TOLERANCE_DEG: f32 = 30.;

/// Ideal separation between consecutive phases of a correctly wired system
pub const IDEAL_SEPARATION_DEG: f32 = 120.;

/// Separation seen between consecutive phases when rotation is reversed
pub const REVERSED_SEPARATION_DEG: f32 = 240.;

/// Three phases are synchronized when their frequencies spread by at most this much.
///
/// TODO: make this part of `ThreePhaseConfig` once a use for a looser bound shows up
pub const SYNC_THRESHOLD_HZ: u32 = 1;

/// Returned by the imbalance query when no valid relationship exists yet.
/// Negative so it can't be mistaken for a real (>= 0) imbalance
pub const IMBALANCE_NO_DATA: f32 = -1.;
