//! Area catalog, synthetic OD flows and the views derived from them.
//!
//! Everything here is plain data and runs the same natively and in the
//! browser; the canvas components only consume the results.

pub mod aggregate;
pub mod catalog;
mod error;
pub mod export;
pub mod generator;
pub mod sankey;
mod selection;

use std::sync::Arc;

use rand::Rng;

pub use aggregate::{AreaTotals, FlowEntry, FlowSummary};
pub use catalog::{Area, AreaCatalog, SourceCrs};
pub use error::CatalogError;
pub use generator::{FlowCache, FlowEdge, FlowMatrix};
pub use sankey::{Direction, NodeRanking, SankeyGraph, SankeyLink};
pub use selection::Selection;

/// Catalog and flows, loaded once at startup and shared read-only.
#[derive(Debug)]
pub struct Dashboard {
	/// Every area with its boundary in lon/lat.
	pub catalog: AreaCatalog,
	/// Trips between every ordered pair of catalog areas.
	pub flows: Arc<FlowMatrix>,
}

impl Dashboard {
	/// Parse `dataset` and fetch (or generate) the flows for its areas.
	pub fn load<R: Rng + ?Sized>(
		dataset: &str,
		name_field: &str,
		cache: &mut FlowCache,
		rng: &mut R,
	) -> Result<Self, CatalogError> {
		let catalog = AreaCatalog::from_geojson_str(dataset, name_field)?;
		let flows = cache.get_or_generate(catalog.names(), rng);
		Ok(Self { catalog, flows })
	}

	/// Outbound and inbound flows of the current selection.
	pub fn summary(&self, selection: &Selection) -> FlowSummary {
		FlowSummary::for_area(&self.flows, selection.name())
	}

	/// Diagram of `summary`, capped at `max_others` other areas.
	pub fn sankey(&self, summary: &FlowSummary, max_others: usize) -> SankeyGraph {
		SankeyGraph::build(summary, self.catalog.names(), max_others)
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	use super::*;
	use crate::config::{DATASET, MAX_SANKEY_OTHERS, NAME_FIELD};

	#[test]
	fn embedded_dashboard_wires_up() {
		let mut rng = ChaCha8Rng::seed_from_u64(2024);
		let mut cache = FlowCache::default();
		let dashboard = Dashboard::load(DATASET, NAME_FIELD, &mut cache, &mut rng).unwrap();
		assert_eq!(dashboard.flows.edge_count(), 16 * 15);

		let selection = Selection::new(&dashboard.catalog);
		let summary = dashboard.summary(&selection);
		assert_eq!(summary.selected, "Alna");
		assert_eq!(summary.outbound.len(), 15);

		let graph = dashboard.sankey(&summary, MAX_SANKEY_OTHERS);
		assert_eq!(graph.nodes().len(), 1 + MAX_SANKEY_OTHERS);
		assert_eq!(graph.hidden_count(), 5);
	}

	#[test]
	fn single_area_dataset_renders_empty() {
		let one = r#"{ "type": "FeatureCollection", "features": [
			{ "type": "Feature", "properties": { "n": "Only" },
			  "geometry": { "type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]] } }
		] }"#;
		let mut rng = ChaCha8Rng::seed_from_u64(1);
		let dashboard = Dashboard::load(one, "n", &mut FlowCache::default(), &mut rng).unwrap();
		assert_eq!(dashboard.flows.edge_count(), 0);
		let summary = dashboard.summary(&Selection::new(&dashboard.catalog));
		assert!(summary.is_empty());
		assert!(dashboard.sankey(&summary, MAX_SANKEY_OTHERS).is_empty());
	}
}
