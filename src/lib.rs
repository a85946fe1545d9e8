//! # zcphase
//! 
//! Zero crossing timing and three-phase relationship analysis for mains monitoring boards

#![cfg_attr(not(test), no_std)]

#![deny(missing_docs)]

/// Zero crossing capture channels, their configuration and phase timing helpers
pub mod capture;

/// Rotation, swap recommendation, imbalance and synchronization across three channels
pub mod three_phase;
