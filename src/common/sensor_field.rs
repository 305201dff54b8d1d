//! Sensor field loading, parsing, and validation logic.
//!
//! Contains the data structures describing the deployed sensor population
//! and provides functions for loading and validating a field description
//! before a simulation session starts.

use anyhow::Context;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;

use crate::simulation::types::RouteError;

/// Error type for field loading failures.
#[derive(Debug)]
pub enum FieldLoadError {
    FileReadError(String),
    ParseError(String),
    ValidationError(String),
}

impl std::fmt::Display for FieldLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldLoadError::FileReadError(msg) => write!(f, "Failed to read file: {}", msg),
            FieldLoadError::ParseError(msg) => write!(f, "Failed to parse JSON: {}", msg),
            FieldLoadError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
        }
    }
}

impl std::error::Error for FieldLoadError {}

/// One deployed sensor: identity, position, and relay-desirability attributes.
///
/// Loaded once from the field file and never mutated by the simulation core.
#[derive(Debug, Deserialize, Clone)]
pub struct SensorRecord {
    /// Unique sensor ID.
    pub id: u32,
    pub x: f32,
    pub y: f32,
    /// Residual energy on a 0-100 scale.
    pub residual_energy: f32,
    /// Remaining buffer capacity on a 0-100 scale.
    pub buffer_capacity: f32,
}

/// Root structure representing the entire sensor field.
///
/// The record order fixes the node indexing used by the connection matrix
/// and by every path the simulation reports.
#[derive(Debug, Deserialize, Clone)]
pub struct SensorField {
    /// All sensors present in the field.
    pub nodes: Vec<SensorRecord>,
    /// Sensor ID of the traffic source.
    pub source_id: u32,
    /// Sensor ID of the data sink.
    pub sink_id: u32,
}

impl SensorField {
    /// Number of sensors in the field.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Record at a given array index.
    pub fn node(&self, index: usize) -> &SensorRecord {
        &self.nodes[index]
    }

    /// Array index of the sensor with the given ID.
    ///
    /// Returns `RouteError::NodeNotFound` for unknown IDs instead of the
    /// first index that happens to be in scope.
    pub fn index_of(&self, id: u32) -> Result<usize, RouteError> {
        self.nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or(RouteError::NodeNotFound(id))
    }

    pub fn source_index(&self) -> Result<usize, RouteError> {
        self.index_of(self.source_id)
    }

    pub fn sink_index(&self) -> Result<usize, RouteError> {
        self.index_of(self.sink_id)
    }
}

/// Load and parse a sensor field from a file.
///
/// # Parameters
///
/// * `path` - Path to the field JSON file
///
/// # Returns
///
/// Parsed and validated SensorField or an error.
pub fn load_field(path: &str) -> Result<SensorField, FieldLoadError> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read file: {}", path))
        .map_err(|e| FieldLoadError::FileReadError(e.to_string()))?;

    let field: SensorField = serde_json::from_str(&data)
        .context("Invalid JSON format")
        .map_err(|e| FieldLoadError::ParseError(e.to_string()))?;

    validate_field(&field).map_err(FieldLoadError::ValidationError)?;

    Ok(field)
}

/// Validate a parsed sensor field.
///
/// Checks for inputs that would corrupt a simulation session:
/// - Empty field or excessive node count
/// - Duplicate sensor IDs
/// - Residual energy or buffer capacity outside the 0-100 scale the
///   link quality model averages against
/// - Source or sink ID missing from the record list
/// - Source and sink naming the same sensor
///
/// # Returns
///
/// `Ok(())` if validation passes, `Err(String)` with error description otherwise.
pub fn validate_field(field: &SensorField) -> Result<(), String> {
    const MAX_NODES: usize = 10000;
    const MIN_ATTRIBUTE: f32 = 0.0;
    const MAX_ATTRIBUTE: f32 = 100.0;

    if field.nodes.is_empty() {
        return Err("Field must contain at least one sensor".to_string());
    }
    if field.nodes.len() > MAX_NODES {
        return Err(format!("Sensor count {} exceeds maximum of {}", field.nodes.len(), MAX_NODES));
    }

    // Check for duplicate sensor IDs
    let mut seen = HashSet::new();
    for node in &field.nodes {
        if !seen.insert(node.id) {
            return Err(format!("Duplicate sensor id found: {}", node.id));
        }
    }

    // Validate each sensor's relay attributes
    for node in &field.nodes {
        if node.residual_energy < MIN_ATTRIBUTE || node.residual_energy > MAX_ATTRIBUTE {
            return Err(format!(
                "Sensor {} residual_energy {} outside scale ({} to {})",
                node.id, node.residual_energy, MIN_ATTRIBUTE, MAX_ATTRIBUTE
            ));
        }
        if node.buffer_capacity < MIN_ATTRIBUTE || node.buffer_capacity > MAX_ATTRIBUTE {
            return Err(format!(
                "Sensor {} buffer_capacity {} outside scale ({} to {})",
                node.id, node.buffer_capacity, MIN_ATTRIBUTE, MAX_ATTRIBUTE
            ));
        }
    }

    // Source and sink must name existing, distinct sensors
    if field.source_index().is_err() {
        return Err(format!("Source id {} does not match any sensor", field.source_id));
    }
    if field.sink_index().is_err() {
        return Err(format!("Sink id {} does not match any sensor", field.sink_id));
    }
    if field.source_id == field.sink_id {
        return Err(format!("Source and sink must differ, both are {}", field.source_id));
    }

    Ok(())
}
