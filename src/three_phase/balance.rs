use libm::fabsf;
use crate::capture::{IDEAL_SEPARATION_DEG, SYNC_THRESHOLD_HZ};
use super::relationship::PhaseAngles;

/// Mean deviation of the three angles from 120 degrees, as a percentage of 120
pub fn imbalance_percent(angles: &PhaseAngles) -> f32 {
    let deviation = fabsf(angles.ab - IDEAL_SEPARATION_DEG)
        + fabsf(angles.bc - IDEAL_SEPARATION_DEG)
        + fabsf(angles.ca - IDEAL_SEPARATION_DEG);
    deviation / 3. / IDEAL_SEPARATION_DEG * 100.
}

/// True if the three frequencies spread by no more than `SYNC_THRESHOLD_HZ`
pub fn is_synchronized(frequencies_hz: &[u32; 3]) -> bool {
    let max = frequencies_hz.iter().copied().max().unwrap_or(0);
    let min = frequencies_hz.iter().copied().min().unwrap_or(0);
    max - min <= SYNC_THRESHOLD_HZ
}
