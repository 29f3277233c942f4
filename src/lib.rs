//! Gridlock
//!
//! A tick-driven traffic simulation on a rectilinear city grid.

pub mod simulation;
