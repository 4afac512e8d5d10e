//! Build-time dashboard configuration.

/// Path of the embedded area dataset, relative to the crate root.
pub const DATASET_PATH: &str = "data/areas.geojson";

/// The dataset itself, baked into the binary.
pub const DATASET: &str = include_str!("../data/areas.geojson");

/// Feature property holding the area names.
pub const NAME_FIELD: &str = "delomrade";

/// Most non-selected areas drawn in the Sankey diagram.
pub const MAX_SANKEY_OTHERS: usize = 10;

/// Rows shown in the top-areas bar chart.
pub const TOP_AREAS_CHART: usize = 10;

/// File name shown in the sidebar and footer.
pub fn dataset_file_name() -> &'static str {
	DATASET_PATH.rsplit('/').next().unwrap_or(DATASET_PATH)
}
