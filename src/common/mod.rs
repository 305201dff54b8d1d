//! Data structures shared between input loading and the simulation core.

pub mod sensor_field;
