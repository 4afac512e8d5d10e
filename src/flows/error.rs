use thiserror::Error;

/// Fatal failures while loading the area catalog at startup.
#[derive(Debug, Error)]
pub enum CatalogError {
	/// The dataset file could not be read.
	#[error("could not read dataset {path:?}")]
	Read {
		/// Path as given to the loader.
		path: String,
		/// Underlying I/O failure.
		#[source]
		source: std::io::Error,
	},
	/// Malformed GeoJSON, or not a FeatureCollection.
	#[error("could not parse dataset: {0}")]
	Parse(String),
	/// No record carries the name field.
	#[error("field '{field}' not found in the dataset")]
	MissingField {
		/// The requested name field.
		field: String,
		/// Every attribute seen across the records, sorted.
		available: Vec<String>,
	},
	/// The declared CRS is unknown or cannot be transformed.
	#[error("cannot reproject from {crs}: {message}")]
	Projection {
		/// CRS name as declared by the dataset.
		crs: String,
		/// What went wrong.
		message: String,
	},
	/// Every record lacks a usable name.
	#[error("the dataset contains no named areas")]
	Empty,
}

impl CatalogError {
	/// One-line remediation shown under the error message.
	pub fn hint(&self) -> String {
		match self {
			Self::Read { .. } => "Check that the path is correct and that the file exists.".into(),
			Self::Parse(_) => "The dataset must be a GeoJSON FeatureCollection.".into(),
			Self::MissingField { available, .. } if available.is_empty() => {
				"The records carry no attributes at all.".into()
			}
			Self::MissingField { available, .. } => {
				format!("Available fields: {}", available.join(", "))
			}
			Self::Projection { .. } => {
				"Use CRS84 or an EPSG code with a known proj4 definition.".into()
			}
			Self::Empty => "Check that the records carry a value for the name field.".into(),
		}
	}
}
