use log::debug;

use super::catalog::AreaCatalog;

/// The area driving every derived view.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Selection {
	name: String,
}

impl Selection {
	/// Starts on the first area alphabetically.
	pub fn new(catalog: &AreaCatalog) -> Self {
		Self {
			name: catalog.names().first().cloned().unwrap_or_default(),
		}
	}

	/// The selected area's name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Focus another area. Returns whether the selection changed; unknown
	/// names are ignored.
	pub fn select(&mut self, name: &str, catalog: &AreaCatalog) -> bool {
		if name == self.name || catalog.index_of(name).is_none() {
			return false;
		}
		debug!("selected {name}");
		self.name = name.to_string();
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	const THREE: &str = r#"{
		"type": "FeatureCollection",
		"features": [
			{ "type": "Feature", "properties": { "name": "Gamma" }, "geometry": null },
			{ "type": "Feature", "properties": { "name": "Alpha" }, "geometry": null },
			{ "type": "Feature", "properties": { "name": "Beta" }, "geometry": null }
		]
	}"#;

	#[test]
	fn defaults_to_first_area_and_ignores_strangers() {
		let catalog = AreaCatalog::from_geojson_str(THREE, "name").unwrap();
		let mut selection = Selection::new(&catalog);
		assert_eq!(selection.name(), "Alpha");

		assert!(!selection.select("Alpha", &catalog));
		assert!(!selection.select("Omega", &catalog));
		assert_eq!(selection.name(), "Alpha");

		assert!(selection.select("Gamma", &catalog));
		assert_eq!(selection.name(), "Gamma");
	}
}
