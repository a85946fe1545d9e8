use log::{debug, info, warn};
use crate::capture::{
    ChannelSample,
    Configure,
    Error,
    SampleCell,
    DEFAULT_SEQUENCE_TOLERANCE_DEG,
    IMBALANCE_NO_DATA,
    MAX_SEQUENCE_TOLERANCE_DEG,
};
use super::{
    balance::{imbalance_percent, is_synchronized},
    correction::{correction_message, recommend, SwapRecommendation},
    relationship::{Phase, PhaseRelationship},
    sequence::{classify, Near120Rule, SequenceVerdict},
};

/// Settings for the three-phase analysis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThreePhaseConfig {
    /// How far an angle may sit from 120/240 degrees and still count. (0, 30]
    pub tolerance_deg: f32,
    /// Whether angles near 240 also count as near 120
    pub near_120_rule: Near120Rule,
}

impl Default for ThreePhaseConfig {
    fn default() -> Self {
        Self {
            tolerance_deg: DEFAULT_SEQUENCE_TOLERANCE_DEG,
            near_120_rule: Near120Rule::default(),
        }
    }
}

impl ThreePhaseConfig {
    /// Checks every field is inside its accepted range
    pub fn validate(&self) -> Result<(), Error> {
        validate_sequence_tolerance(self.tolerance_deg)
    }
}

fn validate_sequence_tolerance(deg: f32) -> Result<(), Error> {
    if deg > 0. && deg <= MAX_SEQUENCE_TOLERANCE_DEG {
        Ok(())
    } else {
        Err(Error::InvalidArgument)
    }
}

/// Polls three channels and works out how their phases relate.
///
/// Holds the channels' `SampleCell`s rather than the channels themselves so the
/// capture interrupts keep exclusive ownership of the channels. Call `process`
/// periodically from the main loop.
pub struct ThreePhase<'a> {
    phases: [&'a SampleCell; 3],
    config: ThreePhaseConfig,
    relationship: PhaseRelationship,
    sequence: SequenceVerdict,
    last_update_us: u32,
}

impl<'a> Configure<'a> for ThreePhase<'a> {
    type Params = (
        &'a SampleCell,
        &'a SampleCell,
        &'a SampleCell,
        ThreePhaseConfig,
    );
    fn configure((a, b, c, config): Self::Params) -> Result<Self, Error> {
        config.validate()?;
        debug!("Three-phase analysis configured: {:?}", config);
        Ok(Self {
            phases: [a, b, c],
            config,
            relationship: PhaseRelationship::default(),
            sequence: SequenceVerdict::Unknown,
            last_update_us: 0,
        })
    }
}

impl<'a> ThreePhase<'a> {
    /// Takes a snapshot of all three channels, recomputes the relationship and
    /// classifies the rotation.
    ///
    /// Fails with `ChannelUnavailable` naming the first phase without a valid
    /// sample, in which case the relationship is marked invalid.
    pub fn process(&mut self) -> Result<SequenceVerdict, Error> {
        let mut samples = [ChannelSample::default(); 3];
        for phase in Phase::ALL.iter() {
            let sample = self.phases[phase.index()].snapshot();
            if !sample.valid {
                self.relationship.valid = false;
                warn!("Phase {} has no valid zero crossing", phase);
                return Err(Error::ChannelUnavailable(*phase));
            }
            samples[phase.index()] = sample;
        }

        self.relationship = PhaseRelationship::compute(&samples);
        let sequence = classify(
            &self.relationship.angles,
            self.config.tolerance_deg,
            self.config.near_120_rule,
        );
        if sequence != self.sequence {
            info!("Phase sequence: {} -> {}", self.sequence, sequence);
        }
        self.sequence = sequence;
        self.last_update_us = samples[Phase::A.index()].timestamp_us;

        Ok(sequence)
    }

    /// The verdict of the last successful pass, `Unknown` before the first
    pub fn sequence(&self) -> SequenceVerdict {
        self.sequence
    }

    /// True if the last verdict was ABC
    pub fn is_sequence_correct(&self) -> bool {
        self.sequence == SequenceVerdict::Correct
    }

    /// The latest relationship. Check `valid` before trusting the angles
    pub fn relationship(&self) -> &PhaseRelationship {
        &self.relationship
    }

    /// Phase A's zero crossing time from the last successful pass
    pub fn last_update_us(&self) -> u32 {
        self.last_update_us
    }

    fn valid_relationship(&self) -> Result<&PhaseRelationship, Error> {
        if self.relationship.valid {
            Ok(&self.relationship)
        } else {
            Err(Error::NotInitialized)
        }
    }

    /// Angle from `from`'s zero crossing to `to`'s
    pub fn phase_angle(&self, from: Phase, to: Phase) -> Result<f32, Error> {
        Ok(self.valid_relationship()?.angle_between(from, to))
    }

    /// Measured frequency of `phase`
    pub fn phase_frequency(&self, phase: Phase) -> Result<u32, Error> {
        Ok(self.valid_relationship()?.frequency_hz(phase))
    }

    /// Which conductors to swap to fix the rotation
    pub fn swap_recommendation(&self) -> Result<SwapRecommendation, Error> {
        let relationship = self.valid_relationship()?;
        Ok(recommend(
            self.sequence,
            &relationship.angles,
            self.config.tolerance_deg,
            self.config.near_120_rule,
        ))
    }

    /// Operator facing summary of the verdict and the fix
    pub fn correction_message(&self) -> Result<&'static str, Error> {
        let swaps = self.swap_recommendation()?;
        Ok(correction_message(self.sequence, &swaps))
    }

    /// True if the three frequencies agree within 1Hz. False without valid data
    pub fn is_synchronized(&self) -> bool {
        match self.valid_relationship() {
            Ok(relationship) => is_synchronized(&relationship.frequencies_hz),
            Err(_) => false,
        }
    }

    /// Angular imbalance in percent, or `IMBALANCE_NO_DATA` without valid data
    pub fn imbalance_percent(&self) -> f32 {
        match self.valid_relationship() {
            Ok(relationship) => imbalance_percent(&relationship.angles),
            Err(_) => IMBALANCE_NO_DATA,
        }
    }

    /// Current configuration
    pub fn config(&self) -> &ThreePhaseConfig {
        &self.config
    }

    /// Sets the classification tolerance. (0, 30] degrees
    pub fn set_sequence_tolerance(&mut self, deg: f32) -> Result<(), Error> {
        if let Err(e) = validate_sequence_tolerance(deg) {
            debug!("Rejected sequence tolerance {}deg", deg);
            return Err(e);
        }
        self.config.tolerance_deg = deg;
        debug!("Sequence tolerance set to {}deg", deg);
        Ok(())
    }

    /// Forgets the relationship and goes back to `Unknown`
    pub fn reset(&mut self) {
        self.relationship = PhaseRelationship::default();
        self.sequence = SequenceVerdict::Unknown;
        self.last_update_us = 0;
        info!("Three-phase analysis reset");
    }
}
