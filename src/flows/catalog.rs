//! Named areas loaded from a GeoJSON feature collection.
//!
//! Records sharing a name are merged into one boundary, and every coordinate
//! is reprojected to longitude/latitude (EPSG:4326) on load.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::Path;

use geo::{BoundingRect, Contains, Coord, LineString, MultiPolygon, Point, Polygon, Rect};
use geojson::{GeoJson, JsonObject, JsonValue};
use log::{debug, info, warn};
use proj4rs::proj::Proj;

use super::error::CatalogError;

const WGS84: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// Coordinate reference system declared by the dataset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceCrs {
	/// Longitude/latitude on WGS84, either EPSG:4326 or CRS84.
	Wgs84,
	/// Any other EPSG code, reprojected on load.
	Epsg(u16),
}

impl SourceCrs {
	/// Parse a GeoJSON `crs` name such as `urn:ogc:def:crs:EPSG::25833`.
	///
	/// The error says why the name was rejected.
	pub fn parse(name: &str) -> Result<Self, String> {
		let name = name.trim();
		if name.ends_with("CRS84") {
			return Ok(Self::Wgs84);
		}
		if !name.to_ascii_uppercase().contains("EPSG") {
			return Err("unrecognized coordinate reference system".into());
		}
		let digits = name.rsplit(':').next().unwrap_or_default();
		let code: u64 = digits
			.parse()
			.map_err(|_| format!("'{digits}' is not an EPSG code"))?;
		let code = u16::try_from(code)
			.map_err(|_| format!("EPSG code {code} is outside the supported range 1-65535"))?;
		Ok(if code == 4326 {
			Self::Wgs84
		} else {
			Self::Epsg(code)
		})
	}
}

impl fmt::Display for SourceCrs {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Wgs84 => write!(f, "EPSG:4326"),
			Self::Epsg(code) => write!(f, "EPSG:{code}"),
		}
	}
}

/// A named region and its boundary in longitude/latitude.
#[derive(Clone, Debug)]
pub struct Area {
	/// Display name, unique within the catalog.
	pub name: String,
	/// Every polygon recorded under the name; empty when none had geometry.
	pub boundary: MultiPolygon<f64>,
}

/// The fixed, alphabetically ordered set of areas for a session.
#[derive(Clone, Debug)]
pub struct AreaCatalog {
	areas: Vec<Area>,
	names: Vec<String>,
	source_crs: SourceCrs,
}

impl AreaCatalog {
	/// Read and parse a GeoJSON file from disk.
	pub fn load(path: impl AsRef<Path>, name_field: &str) -> Result<Self, CatalogError> {
		let path = path.as_ref();
		let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Read {
			path: path.display().to_string(),
			source,
		})?;
		Self::from_geojson_str(&text, name_field)
	}

	/// Parse GeoJSON text, reading area names from `name_field`.
	pub fn from_geojson_str(text: &str, name_field: &str) -> Result<Self, CatalogError> {
		let geojson: GeoJson = text
			.parse()
			.map_err(|err: geojson::Error| CatalogError::Parse(err.to_string()))?;
		let GeoJson::FeatureCollection(collection) = geojson else {
			return Err(CatalogError::Parse("expected a FeatureCollection".into()));
		};
		if collection.features.is_empty() {
			return Err(CatalogError::Empty);
		}

		let source_crs = declared_crs(collection.foreign_members.as_ref())?;
		let reprojector = match source_crs {
			SourceCrs::Wgs84 => None,
			SourceCrs::Epsg(code) => Some(Reprojector::new(code)?),
		};

		let mut fields = BTreeSet::new();
		let mut merged: BTreeMap<String, Vec<Polygon<f64>>> = BTreeMap::new();
		let mut skipped = 0usize;
		for feature in &collection.features {
			let properties = feature.properties.as_ref();
			if let Some(properties) = properties {
				fields.extend(properties.keys().cloned());
			}
			let Some(name) = properties
				.and_then(|p| p.get(name_field))
				.and_then(area_name)
			else {
				skipped += 1;
				continue;
			};
			let polygons = merged.entry(name).or_default();
			if let Some(geometry) = &feature.geometry {
				polygons.extend(boundary_polygons(&geometry.value, reprojector.as_ref())?);
			}
		}

		if !fields.contains(name_field) {
			return Err(CatalogError::MissingField {
				field: name_field.to_string(),
				available: fields.into_iter().collect(),
			});
		}
		if merged.is_empty() {
			return Err(CatalogError::Empty);
		}
		if skipped > 0 {
			warn!("skipped {skipped} record(s) without a usable '{name_field}' value");
		}

		let areas: Vec<Area> = merged
			.into_iter()
			.map(|(name, polygons)| Area {
				name,
				boundary: MultiPolygon::new(polygons),
			})
			.collect();
		let names = areas.iter().map(|area| area.name.clone()).collect();
		info!(
			"loaded {} areas from {} records ({source_crs})",
			areas.len(),
			collection.features.len()
		);
		Ok(Self {
			areas,
			names,
			source_crs,
		})
	}

	/// Areas in catalog order.
	pub fn areas(&self) -> &[Area] {
		&self.areas
	}

	/// Area names in catalog (alphabetical) order.
	pub fn names(&self) -> &[String] {
		&self.names
	}

	/// Number of distinct areas.
	pub fn len(&self) -> usize {
		self.areas.len()
	}

	/// Always false for a loaded catalog.
	pub fn is_empty(&self) -> bool {
		self.areas.is_empty()
	}

	/// CRS the dataset was declared in before reprojection.
	pub fn source_crs(&self) -> SourceCrs {
		self.source_crs
	}

	/// Catalog position of `name`.
	pub fn index_of(&self, name: &str) -> Option<usize> {
		self.names.binary_search_by(|n| n.as_str().cmp(name)).ok()
	}

	/// Area by name.
	pub fn get(&self, name: &str) -> Option<&Area> {
		self.index_of(name).map(|idx| &self.areas[idx])
	}

	/// Bounding box of every boundary, or `None` when no area has geometry.
	pub fn bounds(&self) -> Option<Rect<f64>> {
		self.areas
			.iter()
			.filter_map(|area| area.boundary.bounding_rect())
			.reduce(|a, b| {
				Rect::new(
					Coord {
						x: a.min().x.min(b.min().x),
						y: a.min().y.min(b.min().y),
					},
					Coord {
						x: a.max().x.max(b.max().x),
						y: a.max().y.max(b.max().y),
					},
				)
			})
	}

	/// The area whose boundary contains the given point.
	pub fn area_at(&self, lon: f64, lat: f64) -> Option<&str> {
		let point = Point::new(lon, lat);
		self.areas
			.iter()
			.find(|area| area.boundary.contains(&point))
			.map(|area| area.name.as_str())
	}
}

fn declared_crs(members: Option<&JsonObject>) -> Result<SourceCrs, CatalogError> {
	let Some(name) = members
		.and_then(|m| m.get("crs"))
		.and_then(|crs| crs.get("properties"))
		.and_then(|props| props.get("name"))
		.and_then(JsonValue::as_str)
	else {
		return Ok(SourceCrs::Wgs84);
	};
	SourceCrs::parse(name).map_err(|message| CatalogError::Projection {
		crs: name.to_string(),
		message,
	})
}

fn area_name(value: &JsonValue) -> Option<String> {
	match value {
		JsonValue::String(s) => Some(s.clone()),
		JsonValue::Number(n) => Some(n.to_string()),
		JsonValue::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}

fn boundary_polygons(
	value: &geojson::Value,
	reprojector: Option<&Reprojector>,
) -> Result<Vec<Polygon<f64>>, CatalogError> {
	match value {
		geojson::Value::Polygon(rings) => Ok(vec![polygon(rings, reprojector)?]),
		geojson::Value::MultiPolygon(polygons) => polygons
			.iter()
			.map(|rings| polygon(rings, reprojector))
			.collect(),
		_ => {
			debug!("ignoring non-polygonal geometry");
			Ok(Vec::new())
		}
	}
}

fn polygon(
	rings: &[Vec<Vec<f64>>],
	reprojector: Option<&Reprojector>,
) -> Result<Polygon<f64>, CatalogError> {
	let mut rings = rings.iter().map(|ring| line_string(ring, reprojector));
	let exterior = match rings.next() {
		Some(ring) => ring?,
		None => LineString::new(Vec::new()),
	};
	let interiors = rings.collect::<Result<Vec<_>, _>>()?;
	Ok(Polygon::new(exterior, interiors))
}

fn line_string(
	positions: &[Vec<f64>],
	reprojector: Option<&Reprojector>,
) -> Result<LineString<f64>, CatalogError> {
	positions
		.iter()
		.map(|position| {
			let [x, y, ..] = position.as_slice() else {
				return Err(CatalogError::Parse(
					"position with fewer than two coordinates".into(),
				));
			};
			match reprojector {
				Some(r) => r.to_lon_lat(*x, *y),
				None => Ok(Coord { x: *x, y: *y }),
			}
		})
		.collect::<Result<Vec<_>, _>>()
		.map(LineString::new)
}

struct Reprojector {
	code: u16,
	source: Proj,
	target: Proj,
}

impl Reprojector {
	fn new(code: u16) -> Result<Self, CatalogError> {
		let failed = |err: proj4rs::errors::Error| CatalogError::Projection {
			crs: SourceCrs::Epsg(code).to_string(),
			message: err.to_string(),
		};
		Ok(Self {
			code,
			source: Proj::from_epsg_code(code).map_err(failed)?,
			target: Proj::from_proj_string(WGS84).map_err(failed)?,
		})
	}

	fn to_lon_lat(&self, x: f64, y: f64) -> Result<Coord<f64>, CatalogError> {
		let mut point = if self.source.is_latlong() {
			(x.to_radians(), y.to_radians(), 0.0)
		} else {
			(x, y, 0.0)
		};
		proj4rs::transform::transform(&self.source, &self.target, &mut point).map_err(|err| {
			CatalogError::Projection {
				crs: SourceCrs::Epsg(self.code).to_string(),
				message: err.to_string(),
			}
		})?;
		Ok(Coord {
			x: point.0.to_degrees(),
			y: point.1.to_degrees(),
		})
	}
}
