// src/core/composer.rs
use std::sync::Arc;

use tracing::info;

use crate::config::LayoutConfig;
use crate::error::{EngineError, Result};
use super::clock::{to_base36, Clock, SystemClock};
use super::composition::{
    CompositionMetadata, ConstructComposition, ConstructInstance, InstanceSpec, Position,
};
use super::construct::{slugify, ConstructCatalog};
use super::validator::{CompositionValidator, ValidationResult};

/// Assembles construct instances into compositions and validates them
pub struct ConstructComposer {
    layout: LayoutConfig,
    clock: Arc<dyn Clock>,
}

impl ConstructComposer {
    pub fn new() -> Self {
        Self::with_layout(LayoutConfig::default())
    }

    pub fn with_layout(layout: LayoutConfig) -> Self {
        Self {
            layout,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the clock used for composition ids and timestamps
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Build a composition, failing on the first construct id missing from `catalog`
    pub fn compose(
        &self,
        name: &str,
        specs: Vec<InstanceSpec>,
        catalog: &ConstructCatalog,
    ) -> Result<ConstructComposition> {
        for spec in &specs {
            if !catalog.contains(&spec.construct_id) {
                return Err(EngineError::ConstructNotFound {
                    construct_id: spec.construct_id.clone(),
                    instance_name: spec.instance_name.clone(),
                });
            }
        }

        let now = self.clock.now();
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or_default();
        let id = format!("comp-{}-{}", slugify(name), to_base36(millis));

        let total = specs.len();
        let instances = specs
            .into_iter()
            .enumerate()
            .map(|(index, spec)| {
                let position = spec
                    .position
                    .unwrap_or_else(|| self.grid_position(index, total));
                ConstructInstance {
                    construct_id: spec.construct_id,
                    instance_name: spec.instance_name,
                    config: spec.config,
                    connections: spec.connections,
                    position,
                }
            })
            .collect::<Vec<_>>();

        info!("Composed '{}' ({}) with {} instances", name, id, instances.len());

        Ok(ConstructComposition {
            id,
            name: name.to_string(),
            metadata: CompositionMetadata {
                description: None,
                version: "1.0.0".to_string(),
                author: None,
                created_at: now,
                tags: Vec::new(),
            },
            instances,
        })
    }

    /// Report every structural problem in `composition`; never fails
    pub fn validate(
        &self,
        composition: &ConstructComposition,
        catalog: &ConstructCatalog,
    ) -> ValidationResult {
        CompositionValidator::new(catalog).validate(composition)
    }

    /// Square-ish grid slot for the instance at `index` out of `total`
    fn grid_position(&self, index: usize, total: usize) -> Position {
        let columns = (total as f64).sqrt().ceil().max(1.0) as usize;
        let row = index / columns;
        let column = index % columns;

        Position {
            x: self.layout.origin_x + column as f64 * self.layout.cell_width,
            y: self.layout.origin_y + row as f64 * self.layout.cell_height,
        }
    }
}

impl Default for ConstructComposer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_positions() {
        let composer = ConstructComposer::new();

        // five instances -> three columns
        assert_eq!(composer.grid_position(0, 5), Position { x: 100.0, y: 100.0 });
        assert_eq!(composer.grid_position(2, 5), Position { x: 700.0, y: 100.0 });
        assert_eq!(composer.grid_position(3, 5), Position { x: 100.0, y: 300.0 });
        assert_eq!(composer.grid_position(4, 5), Position { x: 400.0, y: 300.0 });

        // four instances -> two columns
        assert_eq!(composer.grid_position(3, 4), Position { x: 400.0, y: 300.0 });
    }

    #[test]
    fn test_single_instance_grid() {
        let composer = ConstructComposer::new();
        assert_eq!(composer.grid_position(0, 1), Position { x: 100.0, y: 100.0 });
    }
}
