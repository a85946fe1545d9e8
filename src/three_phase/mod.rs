/*
    Three-phase analysis on top of three capture channels: pairwise angles,
    rotation, the swap that fixes it, imbalance and synchronization.
    Runs from the main loop, never from the capture interrupts.
*/

mod relationship;
pub use relationship::*;

mod sequence;
pub use sequence::*;

mod correction;
pub use correction::*;

mod balance;
pub use balance::*;

mod system;
pub use system::*;
