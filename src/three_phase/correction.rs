use super::{
    relationship::PhaseAngles,
    sequence::{near_120, Near120Rule, SequenceVerdict},
};

/// Which pair of phase conductors to swap to get ABC rotation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapRecommendation {
    /// Swap A and B
    pub swap_ab: bool,
    /// Swap B and C
    pub swap_bc: bool,
    /// Swap C and A
    pub swap_ca: bool,
}

impl SwapRecommendation {
    /// Nothing to swap
    pub const NONE: Self = Self { swap_ab: false, swap_bc: false, swap_ca: false };

    /// True if no swap is recommended
    pub fn is_empty(&self) -> bool {
        !(self.swap_ab || self.swap_bc || self.swap_ca)
    }

    /// True if every pair is flagged
    pub fn is_all(&self) -> bool {
        self.swap_ab && self.swap_bc && self.swap_ca
    }
}

/// Works out the swap that should fix the rotation.
///
/// A reversed system is always fixed by swapping B and C. For an error verdict
/// the angles are inspected: whichever two are at 120 decide the pair to swap.
pub fn recommend(
    verdict: SequenceVerdict,
    angles: &PhaseAngles,
    tolerance_deg: f32,
    rule: Near120Rule,
) -> SwapRecommendation {
    let mut swaps = SwapRecommendation::NONE;
    match verdict {
        SequenceVerdict::Reversed => swaps.swap_bc = true,
        SequenceVerdict::Error => {
            let ab_120 = near_120(angles.ab, tolerance_deg, rule);
            let bc_120 = near_120(angles.bc, tolerance_deg, rule);
            let ca_120 = near_120(angles.ca, tolerance_deg, rule);

            if ab_120 && ca_120 {
                swaps.swap_bc = true;
            } else if bc_120 && ca_120 {
                swaps.swap_ab = true;
            } else if ab_120 && bc_120 {
                swaps.swap_ca = true;
            }
        }
        SequenceVerdict::Correct | SequenceVerdict::Unknown => {}
    }
    swaps
}

/// Operator facing description of the verdict and the swap to make
pub fn correction_message(verdict: SequenceVerdict, swaps: &SwapRecommendation) -> &'static str {
    match verdict {
        SequenceVerdict::Correct => "Phase sequence is correct (ABC)",
        SequenceVerdict::Unknown => "Phase sequence not determined yet - waiting for all phases",
        SequenceVerdict::Reversed | SequenceVerdict::Error => {
            if swaps.is_all() {
                "All phases need correction - check every connection"
            } else if swaps.swap_ab {
                "Swap phases A and B to correct the sequence"
            } else if swaps.swap_bc {
                "Swap phases B and C to correct the sequence"
            } else if swaps.swap_ca {
                "Swap phases C and A to correct the sequence"
            } else {
                "Phase sequence error - check all connections"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn angles(ab: f32, bc: f32, ca: f32) -> PhaseAngles {
        PhaseAngles { ab, bc, ca }
    }

    const RULE: Near120Rule = Near120Rule::Exclusive;

    #[test]
    fn correct_needs_nothing() {
        let swaps = recommend(SequenceVerdict::Correct, &angles(120., 120., 120.), 10., RULE);
        assert!(swaps.is_empty());
        assert_eq!(correction_message(SequenceVerdict::Correct, &swaps), "Phase sequence is correct (ABC)");
    }

    #[test]
    fn reversed_swaps_b_and_c() {
        let swaps = recommend(SequenceVerdict::Reversed, &angles(240., 240., 120.), 10., RULE);
        assert_eq!(swaps, SwapRecommendation { swap_bc: true, ..SwapRecommendation::NONE });
        assert!(correction_message(SequenceVerdict::Reversed, &swaps).contains("B and C"));
    }

    #[test]
    fn error_heuristics_pick_the_pair_from_the_angles() {
        let bc = recommend(SequenceVerdict::Error, &angles(120., 60., 120.), 10., RULE);
        assert_eq!(bc, SwapRecommendation { swap_bc: true, ..SwapRecommendation::NONE });

        let ab = recommend(SequenceVerdict::Error, &angles(60., 120., 120.), 10., RULE);
        assert_eq!(ab, SwapRecommendation { swap_ab: true, ..SwapRecommendation::NONE });
        assert!(correction_message(SequenceVerdict::Error, &ab).contains("A and B"));

        let ca = recommend(SequenceVerdict::Error, &angles(120., 120., 60.), 10., RULE);
        assert_eq!(ca, SwapRecommendation { swap_ca: true, ..SwapRecommendation::NONE });
        assert!(correction_message(SequenceVerdict::Error, &ca).contains("C and A"));
    }

    #[test]
    fn indeterminate_error_gives_generic_message() {
        let swaps = recommend(SequenceVerdict::Error, &angles(90., 150., 120.), 10., RULE);
        assert!(swaps.is_empty());
        assert_eq!(
            correction_message(SequenceVerdict::Error, &swaps),
            "Phase sequence error - check all connections",
        );
    }

    #[test]
    fn all_flags_get_their_own_message() {
        let all = SwapRecommendation { swap_ab: true, swap_bc: true, swap_ca: true };
        assert!(all.is_all());
        assert_eq!(
            correction_message(SequenceVerdict::Error, &all),
            "All phases need correction - check every connection",
        );
    }

    #[test]
    fn unknown_recommends_nothing() {
        let swaps = recommend(SequenceVerdict::Unknown, &PhaseAngles::default(), 10., RULE);
        assert!(swaps.is_empty());
        assert!(correction_message(SequenceVerdict::Unknown, &swaps).contains("not determined"));
    }
}
