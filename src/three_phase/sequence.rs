use core::fmt;
use libm::fabsf;
use crate::capture::{IDEAL_SEPARATION_DEG, REVERSED_SEPARATION_DEG};
use super::relationship::PhaseAngles;

/// Rotation order of the three phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceVerdict {
    /// A-B-C, 120 degrees between consecutive phases
    Correct,
    /// A-C-B, consecutive phases 240 degrees apart
    Reversed,
    /// No valid relationship has been computed yet
    Unknown,
    /// The angles fit neither rotation within tolerance
    Error,
}

impl Default for SequenceVerdict {
    fn default() -> Self {
        SequenceVerdict::Unknown
    }
}

impl fmt::Display for SequenceVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SequenceVerdict::Correct => "ABC (correct)",
            SequenceVerdict::Reversed => "ACB (reversed)",
            SequenceVerdict::Unknown => "unknown",
            SequenceVerdict::Error => "error",
        })
    }
}

/// How `near_120` treats angles close to 240 degrees.
///
/// The default gives up the older 240-counts-as-120 overlap, which can never
/// report `Reversed` for a cleanly reversed system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Near120Rule {
    /// Only angles within tolerance of 120 count. A reversed system
    /// (240/240/240) is then reported as `Reversed`. The default
    Exclusive,
    /// Angles within tolerance of 240 also count as "near 120". Matches older
    /// firmware that used this overlap, where every reversed system classifies
    /// as `Correct`. Keep only for compatibility with it
    Inclusive240,
}

impl Default for Near120Rule {
    fn default() -> Self {
        Near120Rule::Exclusive
    }
}

/// Shortest distance between two angles around the circle
fn wrapped_distance(angle: f32, target: f32) -> f32 {
    let diff = fabsf(angle - target);
    if diff > 180. { 360. - diff } else { diff }
}

/// True if `angle` is an ABC separation within `tolerance_deg`
pub fn near_120(angle: f32, tolerance_deg: f32, rule: Near120Rule) -> bool {
    let near = fabsf(angle - IDEAL_SEPARATION_DEG) <= tolerance_deg;
    match rule {
        Near120Rule::Exclusive => near,
        Near120Rule::Inclusive240 => {
            near || wrapped_distance(angle, REVERSED_SEPARATION_DEG) <= tolerance_deg
        }
    }
}

/// True if `angle` is within `tolerance_deg` of 240 and not within it of 120
pub fn near_240(angle: f32, tolerance_deg: f32) -> bool {
    wrapped_distance(angle, REVERSED_SEPARATION_DEG) <= tolerance_deg
        && fabsf(angle - IDEAL_SEPARATION_DEG) > tolerance_deg
}

/// Classifies the rotation from the pairwise angles. Never returns `Unknown`
pub fn classify(angles: &PhaseAngles, tolerance_deg: f32, rule: Near120Rule) -> SequenceVerdict {
    let ab_120 = near_120(angles.ab, tolerance_deg, rule);
    let bc_120 = near_120(angles.bc, tolerance_deg, rule);
    let ca_120 = near_120(angles.ca, tolerance_deg, rule);
    if ab_120 && bc_120 && ca_120 {
        return SequenceVerdict::Correct;
    }

    let ab_240 = near_240(angles.ab, tolerance_deg);
    let bc_240 = near_240(angles.bc, tolerance_deg);
    if (ab_240 || bc_240) && ca_120 {
        return SequenceVerdict::Reversed;
    }
    if ab_240 && bc_240 {
        return SequenceVerdict::Reversed;
    }

    SequenceVerdict::Error
}
