//! Per-frame overlay systems.

/// Live camera position, rotation and zoom readout.
pub mod telemetry;
