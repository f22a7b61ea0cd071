//! File output for simulation results.

pub mod export;
