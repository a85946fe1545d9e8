/*
    One zero crossing channel: an opto input feeding a timer input capture.
    Everything here is safe to call from the capture interrupt except the
    blocking wait on `SampleCell`.
*/

mod constants;
pub use constants::*;

mod error;
pub use error::*;

mod port;
pub use port::*;

mod configure;
pub use configure::*;

mod phase;
pub use phase::*;

mod sample;
pub use sample::*;

mod snapshot;
pub use snapshot::*;

mod channel;
pub use channel::*;
