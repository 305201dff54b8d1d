//! Link quality calculations for HELLO probes.
//!
//! Contains the model that turns a simulated HELLO exchange into a scalar
//! link quality score, combining:
//! - A bounded pseudorandom SNR measurement, normalized to a 0-100 scale
//! - The receiver's remaining buffer capacity
//! - The receiver's residual energy
//!
//! Randomness always flows through an injected generator so that identical
//! seeds reproduce identical discovery runs.

use rand::Rng;

use crate::common::sensor_field::SensorRecord;

/// Parameters bounding the simulated SNR measurement.
#[derive(Debug, Clone)]
pub struct SignalParameters {
    /// Maximum achievable SNR value.
    pub max_snr: u32,
    /// Minimum SNR required for a probe to be measured at all.
    pub required_snr: u32,
}

/// Score a HELLO probe arriving at `receiver`.
///
/// # Formula
///
/// ```text
/// SNR  = draw from [required_snr, max_snr), scaled to (SNR / max_snr) × 100
/// Val  = (SNR + buffer_capacity + residual_energy) / 3
/// ```
///
/// All three terms share the same 0-100 scale and are weighted equally, so
/// a well-placed receiver with depleted energy scores no better than a
/// marginal receiver with full reserves.
///
/// # Parameters
///
/// * `receiver` - The sensor receiving the probe; only receiver state enters the score
/// * `params` - SNR bounds; `max_snr` must exceed `required_snr` (enforced at config load)
/// * `rng` - Injected random source for the SNR measurement
///
/// # Returns
///
/// The composite link quality score. Strictly positive whenever any term is
/// positive; no error conditions.
pub fn link_quality<R: Rng>(receiver: &SensorRecord, params: &SignalParameters, rng: &mut R) -> f32 {
    let measured = rng.gen_range(params.required_snr..params.max_snr);
    let snr = (measured as f32 / params.max_snr as f32) * 100.0;
    (snr + receiver.buffer_capacity + receiver.residual_energy) / 3.0
}
