use core::fmt;
use crate::capture::{normalize_degrees, ChannelSample};

/// One of the three line phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Phase A (L1)
    A,
    /// Phase B (L2)
    B,
    /// Phase C (L3)
    C,
}

impl Phase {
    /// All phases in ABC order
    pub const ALL: [Phase; 3] = [Phase::A, Phase::B, Phase::C];

    /// Position in ABC order, for indexing per phase arrays
    pub fn index(self) -> usize {
        match self {
            Phase::A => 0,
            Phase::B => 1,
            Phase::C => 2,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::A => "A",
            Phase::B => "B",
            Phase::C => "C",
        })
    }
}

/// Angles from one phase's zero crossing to the next, in degrees [0, 360)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseAngles {
    /// A to B
    pub ab: f32,
    /// B to C
    pub bc: f32,
    /// C to A
    pub ca: f32,
}

/// Snapshot of how the three phases relate, recomputed on every pass
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PhaseRelationship {
    /// Latest zero crossing time per phase, indexed by `Phase::index`
    pub timestamps_us: [u32; 3],
    /// Latest measured frequency per phase, indexed by `Phase::index`
    pub frequencies_hz: [u32; 3],
    /// Pairwise angles
    pub angles: PhaseAngles,
    /// True only if all three samples were valid in the pass that produced this
    pub valid: bool,
}

impl PhaseRelationship {
    /// Builds the relationship from one valid sample per phase, in ABC order.
    ///
    /// Angles are measured against the mean of the three periods.
    pub fn compute(samples: &[ChannelSample; 3]) -> Self {
        let [a, b, c] = samples;
        let period_sum = u64::from(a.period_us) + u64::from(b.period_us) + u64::from(c.period_us);
        let period_us = (period_sum / 3) as u32;

        Self {
            timestamps_us: [a.timestamp_us, b.timestamp_us, c.timestamp_us],
            frequencies_hz: [a.frequency_hz, b.frequency_hz, c.frequency_hz],
            angles: PhaseAngles {
                ab: pairwise_angle(a.timestamp_us, b.timestamp_us, period_us),
                bc: pairwise_angle(b.timestamp_us, c.timestamp_us, period_us),
                ca: pairwise_angle(c.timestamp_us, a.timestamp_us, period_us),
            },
            valid: true,
        }
    }

    /// Angle from `from`'s zero crossing to `to`'s. Pairs against ABC order are
    /// read as 360 minus the forward angle, the same phase twice is 0
    pub fn angle_between(&self, from: Phase, to: Phase) -> f32 {
        let reverse = |angle: f32| if angle > 0. { 360. - angle } else { 0. };
        match (from, to) {
            (Phase::A, Phase::B) => self.angles.ab,
            (Phase::B, Phase::C) => self.angles.bc,
            (Phase::C, Phase::A) => self.angles.ca,
            (Phase::B, Phase::A) => reverse(self.angles.ab),
            (Phase::C, Phase::B) => reverse(self.angles.bc),
            (Phase::A, Phase::C) => reverse(self.angles.ca),
            _ => 0.,
        }
    }

    /// Latest measured frequency of `phase`
    pub fn frequency_hz(&self, phase: Phase) -> u32 {
        self.frequencies_hz[phase.index()]
    }
}

/// Angle from a zero crossing at `t1` to one at `t2`, both on the same free
/// running 32-bit microsecond clock. Whole elapsed periods are dropped.
///
/// The wrapped difference is read as signed, so `t2` may be the earlier of the
/// two (up to ~35 minutes either way). Folding the unsigned difference would
/// only be right when 2^32 is a multiple of the period.
pub fn pairwise_angle(t1: u32, t2: u32, period_us: u32) -> f32 {
    if period_us == 0 {
        return 0.;
    }
    let elapsed_us = i64::from(t2.wrapping_sub(t1) as i32);
    let offset_us = elapsed_us.rem_euclid(i64::from(period_us));
    normalize_degrees(offset_us as f32 / period_us as f32 * 360.)
}
