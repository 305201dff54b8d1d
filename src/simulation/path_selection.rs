//! Greedy multipath extraction over a discovered connection matrix.
//!
//! Each extraction call walks from the sink toward the source, always taking
//! the best-quality link among the neighbors that no earlier path consumed.
//! Relays are marked consumed as they are traversed, so successive calls are
//! forced onto relay-disjoint routes until no route remains. The source is
//! exempt from consumption: it must stay available as the endpoint of every
//! path.
//!
//! High-level flow per call:
//! 1) Refuse to search at all when the sink row is empty (`SinkUnreachable`).
//! 2) First call (sink unconsumed): direct search, preferring an immediate
//!    sink-source link at every step before falling back to the best relay.
//! 3) Later calls (sink consumed): backward trace along best links until the
//!    source is reached.
//! 4) A dead end anywhere retires the session into `Exhausted`, a value the
//!    caller stops on, never a process exit.

use crate::common::sensor_field::SensorField;

use super::connection_matrix::ConnectionMatrix;
use super::types::{Path, PathStatus, RouteError};

/// One extraction session over a matrix produced by discovery.
///
/// Takes exclusive ownership of the matrix: consumption markers are session
/// state, and a new session needs a freshly discovered matrix.
#[derive(Debug)]
pub struct PathSelector<'a> {
    field: &'a SensorField,
    matrix: ConnectionMatrix,
    source_index: usize,
    sink_index: usize,
    path_count: usize,
    exhausted: bool,
    failed: bool,
}

impl<'a> PathSelector<'a> {
    /// Create a session, resolving the endpoint indices up front.
    ///
    /// Fails with `RouteError::NodeNotFound` when the field's source or sink
    /// ID does not exist, before any marker is touched.
    pub fn new(field: &'a SensorField, matrix: ConnectionMatrix) -> Result<Self, RouteError> {
        debug_assert_eq!(field.len(), matrix.len());
        let source_index = field.source_index()?;
        let sink_index = field.sink_index()?;
        Ok(Self {
            field,
            matrix,
            source_index,
            sink_index,
            path_count: 0,
            exhausted: false,
            failed: false,
        })
    }

    /// Paths produced so far in this session.
    pub fn path_count(&self) -> usize {
        self.path_count
    }

    /// Read access to the session's matrix, markers included.
    pub fn matrix(&self) -> &ConnectionMatrix {
        &self.matrix
    }

    /// Extract the next path.
    ///
    /// Returns `PathStatus::Found` with a sink-to-source hop list, or
    /// `PathStatus::Exhausted` once no further path exists. `Exhausted`
    /// latches: every later call reports it immediately. A sink that was
    /// never linked by discovery is `RouteError::SinkUnreachable` instead -
    /// the session cannot produce anything, which is different from having
    /// produced everything.
    pub fn next_path(&mut self) -> Result<PathStatus, RouteError> {
        if self.exhausted {
            return Ok(PathStatus::Exhausted);
        }
        if !self.matrix.has_links(self.sink_index) {
            self.failed = true;
            return Err(RouteError::SinkUnreachable);
        }

        let found = if !self.matrix.is_consumed(self.sink_index) {
            self.direct_search()
        } else {
            self.backward_trace()
        };

        match found {
            Some(path) => {
                self.path_count += 1;
                log::info!("Path {} found: {} (sensors {:?})", self.path_count, path, path.ids(self.field));
                Ok(PathStatus::Found(path))
            }
            None => {
                self.exhausted = true;
                log::info!("No more paths found after {} paths", self.path_count);
                Ok(PathStatus::Exhausted)
            }
        }
    }

    /// First extraction: walk from the sink, checking for a direct link to
    /// the source before every relay step.
    fn direct_search(&mut self) -> Option<Path> {
        let mut hops = Vec::new();
        let mut current = self.sink_index;
        self.push_hop(&mut hops, current);

        loop {
            if self.matrix.quality(current, self.source_index) != 0.0 {
                self.push_hop(&mut hops, self.source_index);
                return Some(Path::new(hops));
            }
            match self.matrix.best_link(current) {
                Some(next) => {
                    self.push_hop(&mut hops, next);
                    current = next;
                }
                None => return None,
            }
        }
    }

    /// Later extractions: follow best links from the sink until the source
    /// turns up. The first hop may not jump straight to the source; the
    /// zero-relay path is produced at most once, by the direct search.
    fn backward_trace(&mut self) -> Option<Path> {
        let mut hops = Vec::new();
        let mut current = self.sink_index;
        self.push_hop(&mut hops, current);

        while current != self.source_index {
            let next = if current == self.sink_index {
                self.matrix.best_link_excluding(current, self.source_index)
            } else {
                self.matrix.best_link(current)
            };
            match next {
                Some(next) => {
                    self.push_hop(&mut hops, next);
                    current = next;
                }
                None => return None,
            }
        }
        Some(Path::new(hops))
    }

    /// Append a node to the path under construction, consuming it unless it
    /// is the source.
    fn push_hop(&mut self, hops: &mut Vec<usize>, index: usize) {
        if index != self.source_index {
            self.matrix.mark_consumed(index);
        }
        hops.push(index);
    }
}

/// The lazy path sequence: `None` at exhaustion, a fatal error yielded once.
impl Iterator for PathSelector<'_> {
    type Item = Result<Path, RouteError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_path() {
            Ok(PathStatus::Found(path)) => Some(Ok(path)),
            Ok(PathStatus::Exhausted) => None,
            Err(err) => {
                self.failed = true;
                Some(Err(err))
            }
        }
    }
}
