//! Breadth-first neighbor discovery across the sensor field.
//!
//! A HELLO flood spreads outward from the source: each node, when its turn
//! in the flood comes, probes every sensor that has not yet taken its own
//! turn and lies inside the transmission range. Probes scoring above the
//! quality threshold become recorded links. Because a node keeps receiving
//! probes until it is processed itself, nodes reached in the same wave also
//! link to each other, not just to the node that first reached them.
//!
//! Nodes outside the source's reachable component keep all-zero rows; that
//! is a valid outcome here and only matters once extraction asks for a path
//! to an unreached sink.

use rand::Rng;
use std::collections::VecDeque;

use crate::common::sensor_field::SensorField;
use crate::config::SimulationConfig;

use super::connection_matrix::ConnectionMatrix;
use super::geometry::{distance2, distance_from_d2};
use super::signal_calculations::link_quality;
use super::types::RouteError;

/// Run the discovery flood and build the connection matrix.
///
/// A node may be enqueued once per neighbor that probed it; later queue
/// entries for an already processed node are skipped, so every node probes
/// its candidates exactly once and the loop terminates when the queue
/// drains.
///
/// Deterministic for identical field, config, and random-source state: the
/// queue drains in FIFO order and candidates are probed in index order, so
/// the RNG draw sequence is fixed.
///
/// # Returns
///
/// The populated matrix, or `RouteError::NodeNotFound` when the configured
/// source ID does not exist in the field.
pub fn discover<R: Rng>(field: &SensorField, config: &SimulationConfig, rng: &mut R) -> Result<ConnectionMatrix, RouteError> {
    let source = field.source_index()?;
    let n = field.len();
    let range2 = config.transmission_range * config.transmission_range;
    let params = config.signal_parameters();

    log::info!("Neighbor discovery started from sensor {} across {} nodes", field.source_id, n);

    let mut matrix = ConnectionMatrix::new(n);
    let mut visited = vec![false; n];
    let mut queue = VecDeque::new();
    queue.push_back(source);

    while let Some(u) = queue.pop_front() {
        if visited[u] {
            continue;
        }
        visited[u] = true;
        for v in 0..n {
            if visited[v] {
                continue;
            }
            let d2 = distance2(field.node(u), field.node(v));
            if d2 >= range2 {
                continue;
            }
            let quality = link_quality(field.node(v), &params, rng);
            if quality > config.quality_threshold {
                matrix.record_link(u, v, quality);
                queue.push_back(v);
                log::debug!(
                    "Recorded link {} <-> {} with quality {:.2} at distance {:.1}",
                    field.node(u).id,
                    field.node(v).id,
                    quality,
                    distance_from_d2(d2)
                );
            }
        }
    }

    let linked = visited.iter().filter(|&&v| v).count();
    log::info!("Neighbor discovery ended, {} of {} nodes linked", linked, n);

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::sensor_field::SensorRecord;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn sensor(id: u32, x: f32, y: f32) -> SensorRecord {
        SensorRecord {
            id,
            x,
            y,
            residual_energy: 80.0,
            buffer_capacity: 70.0,
        }
    }

    fn config() -> SimulationConfig {
        SimulationConfig {
            transmission_range: 100.0,
            max_snr: 40,
            required_snr: 10,
            quality_threshold: 0.0,
            rng_seed: Some(1),
        }
    }

    /// Four sensors, all mutually in range, accept-everything threshold.
    fn clustered_field() -> SensorField {
        SensorField {
            nodes: vec![
                sensor(1, 0.0, 0.0),
                sensor(2, 10.0, 0.0),
                sensor(3, 0.0, 10.0),
                sensor(4, 10.0, 10.0),
            ],
            source_id: 1,
            sink_id: 4,
        }
    }

    #[test]
    fn matrix_is_symmetric_with_zero_diagonal() {
        let field = clustered_field();
        let mut rng = StdRng::seed_from_u64(3);
        let matrix = discover(&field, &config(), &mut rng).unwrap();

        for i in 0..field.len() {
            assert_eq!(matrix.quality(i, i), 0.0);
            for j in 0..field.len() {
                assert_eq!(matrix.quality(i, j), matrix.quality(j, i));
            }
        }
    }

    #[test]
    fn mutually_in_range_cluster_is_fully_connected() {
        let field = clustered_field();
        let mut rng = StdRng::seed_from_u64(3);
        let matrix = discover(&field, &config(), &mut rng).unwrap();

        // Nodes reached in the same wave still probe each other, so with an
        // accept-everything threshold every off-diagonal entry is filled.
        for i in 0..field.len() {
            for j in 0..field.len() {
                if i != j {
                    assert!(matrix.quality(i, j) > 0.0, "missing link {} <-> {}", i, j);
                }
            }
        }
    }

    #[test]
    fn identical_seeds_yield_identical_matrices() {
        let field = clustered_field();
        let a = discover(&field, &config(), &mut StdRng::seed_from_u64(99)).unwrap();
        let b = discover(&field, &config(), &mut StdRng::seed_from_u64(99)).unwrap();

        for i in 0..field.len() {
            for j in 0..field.len() {
                assert_eq!(a.quality(i, j), b.quality(i, j));
            }
        }
    }

    #[test]
    fn out_of_range_sensors_stay_isolated() {
        let field = SensorField {
            nodes: vec![sensor(1, 0.0, 0.0), sensor(2, 50.0, 0.0), sensor(3, 5000.0, 5000.0)],
            source_id: 1,
            sink_id: 3,
        };
        let mut rng = StdRng::seed_from_u64(5);
        let matrix = discover(&field, &config(), &mut rng).unwrap();

        assert!(matrix.has_links(0));
        assert!(matrix.has_links(1));
        assert!(!matrix.has_links(2));
    }

    #[test]
    fn range_cutoff_is_strict() {
        // Exactly at the transmission range: no probe may happen.
        let field = SensorField {
            nodes: vec![sensor(1, 0.0, 0.0), sensor(2, 100.0, 0.0)],
            source_id: 1,
            sink_id: 2,
        };
        let mut rng = StdRng::seed_from_u64(5);
        let matrix = discover(&field, &config(), &mut rng).unwrap();
        assert_eq!(matrix.quality(0, 1), 0.0);
    }

    #[test]
    fn unknown_source_id_is_reported() {
        let mut field = clustered_field();
        field.source_id = 77;
        let mut rng = StdRng::seed_from_u64(5);
        assert_eq!(discover(&field, &config(), &mut rng).unwrap_err(), RouteError::NodeNotFound(77));
    }

    #[test]
    fn relayed_reach_extends_beyond_direct_range() {
        // A chain: the source reaches 2 directly, 3 only through 2.
        let field = SensorField {
            nodes: vec![sensor(1, 0.0, 0.0), sensor(2, 80.0, 0.0), sensor(3, 160.0, 0.0)],
            source_id: 1,
            sink_id: 3,
        };
        let mut rng = StdRng::seed_from_u64(11);
        let matrix = discover(&field, &config(), &mut rng).unwrap();

        assert!(matrix.quality(0, 1) > 0.0);
        assert_eq!(matrix.quality(0, 2), 0.0);
        assert!(matrix.quality(1, 2) > 0.0);
    }

    #[test]
    fn threshold_filters_marginal_links() {
        // Threshold above the best achievable score: nothing is recorded.
        let field = clustered_field();
        let mut high = config();
        high.quality_threshold = 100.0;
        let mut rng = StdRng::seed_from_u64(13);
        let matrix = discover(&field, &high, &mut rng).unwrap();

        for i in 0..field.len() {
            assert!(!matrix.has_links(i));
        }
    }
}
