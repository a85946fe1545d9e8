use embedded_hal::blocking::delay::DelayUs;
use super::{
    constants::MICROS_PER_SECOND,
    Error,
};

/// Mask covering the low `bits` bits of a counter
pub fn counter_mask(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Ticks elapsed from `previous` to `current` on a counter `bits` wide.
///
/// The subtraction is modular so a counter that wrapped between the two
/// readings still gives the forward distance, e.g. 0xFFFF_FFF0 -> 0x10 is 0x20.
pub fn wrapping_delta(previous: u32, current: u32, bits: u8) -> u32 {
    current.wrapping_sub(previous) & counter_mask(bits)
}

/// Folds any finite angle into [0, 360)
pub fn normalize_degrees(angle: f32) -> f32 {
    let mut angle = libm::fmodf(angle, 360.);
    if angle < 0. {
        angle += 360.;
    }
    // A tiny negative remainder can round up to exactly 360 when shifted
    if angle >= 360. {
        angle = 0.;
    }
    angle
}

/// Period of one line cycle in whole microseconds
pub fn line_period_us(line_freq_hz: u32) -> Result<u32, Error> {
    if line_freq_hz == 0 {
        return Err(Error::InvalidArgument);
    }
    match MICROS_PER_SECOND / line_freq_hz {
        0 => Err(Error::InvalidArgument),
        period_us => Ok(period_us),
    }
}

/// Converts a delay after a zero crossing into a phase angle in [0, 360).
/// Offsets longer than a cycle wrap around
pub fn phase_angle_from_offset(time_offset_us: u32, line_freq_hz: u32) -> Result<f32, Error> {
    let period_us = line_period_us(line_freq_hz)?;
    let phase = time_offset_us as f32 / period_us as f32 * 360.;
    Ok(normalize_degrees(phase))
}

/// Converts a phase angle into the delay after a zero crossing at which
/// that angle is reached. The angle is normalized first, the result truncated
pub fn time_for_phase_angle(angle_deg: f32, line_freq_hz: u32) -> Result<u32, Error> {
    if !angle_deg.is_finite() {
        return Err(Error::InvalidArgument);
    }
    let period_us = line_period_us(line_freq_hz)?;
    let angle = normalize_degrees(angle_deg);
    Ok((angle / 360. * period_us as f32) as u32)
}

/// Blocks for as long as it takes the line to advance `angle_deg` from now.
/// Call straight after a zero crossing. Returns the delay used in microseconds
pub fn delay_until_phase<D>(angle_deg: f32, line_freq_hz: u32, delay: &mut D) -> Result<u32, Error>
where
    D: DelayUs<u32>,
{
    let offset_us = time_for_phase_angle(angle_deg, line_freq_hz)?;
    delay.delay_us(offset_us);
    Ok(offset_us)
}
