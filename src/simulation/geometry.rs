//! Distance calculations between deployed sensors.

use crate::common::sensor_field::SensorRecord;

/// Squared Euclidean distance between two sensors (avoids a sqrt in hot paths).
///
/// Range checks compare d1² against range², which is equivalent to comparing
/// the plain distances for non-negative values and skips the square root for
/// every candidate pair probed during discovery.
pub fn distance2(a: &SensorRecord, b: &SensorRecord) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Convert squared distance back to distance (only when a real length is needed).
pub fn distance_from_d2(d2: f32) -> f32 {
    d2.sqrt()
}
