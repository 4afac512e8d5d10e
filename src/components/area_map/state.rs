use std::sync::Arc;

use geo::{Centroid, Rect};

use crate::flows::Dashboard;

/// Share of the canvas left around the fitted areas.
const FIT_MARGIN: f64 = 0.9;
/// Pointer travel (px) after which a press counts as a pan, not a click.
pub const CLICK_SLOP: f64 = 4.0;
/// Wheel zoom limits, relative to the fitted scale.
const MIN_ZOOM: f64 = 0.2;
const MAX_ZOOM: f64 = 50.0;

#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub moved: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Equirectangular projection centred on the catalog, with longitudes
/// shrunk by the cosine of the centre latitude.
#[derive(Clone, Copy, Debug)]
pub struct Projection {
	center_lon: f64,
	center_lat: f64,
	lon_scale: f64,
}

impl Projection {
	pub fn centered_on(bounds: Rect<f64>) -> Self {
		let center = bounds.center();
		Self {
			center_lon: center.x,
			center_lat: center.y,
			lon_scale: center.y.to_radians().cos().max(0.01),
		}
	}

	pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
		(
			(lon - self.center_lon) * self.lon_scale,
			self.center_lat - lat,
		)
	}

	pub fn unproject(&self, x: f64, y: f64) -> (f64, f64) {
		(x / self.lon_scale + self.center_lon, self.center_lat - y)
	}
}

pub struct MapState {
	pub dashboard: Arc<Dashboard>,
	pub projection: Projection,
	/// Label anchor per catalog area, in projected units.
	pub labels: Vec<Option<(f64, f64)>>,
	pub transform: ViewTransform,
	pub pan: PanState,
	pub selected: String,
	pub hovered: Option<String>,
	/// Eases from 0 to 1 after each selection change.
	pub highlight_t: f64,
	pub width: f64,
	pub height: f64,
	extent: (f64, f64),
	/// Scale that shows every area; zoom is clamped around it.
	fit_k: f64,
}

impl MapState {
	pub fn new(dashboard: Arc<Dashboard>, selected: String, width: f64, height: f64) -> Self {
		let bounds = dashboard
			.catalog
			.bounds()
			.unwrap_or_else(|| Rect::new((-1.0, -1.0), (1.0, 1.0)));
		let projection = Projection::centered_on(bounds);
		let (x0, y0) = projection.project(bounds.min().x, bounds.max().y);
		let (x1, y1) = projection.project(bounds.max().x, bounds.min().y);
		let labels = dashboard
			.catalog
			.areas()
			.iter()
			.map(|area| {
				area.boundary
					.centroid()
					.map(|c| projection.project(c.x(), c.y()))
			})
			.collect();

		let mut state = Self {
			dashboard,
			projection,
			labels,
			transform: ViewTransform::default(),
			pan: PanState::default(),
			selected,
			hovered: None,
			highlight_t: 1.0,
			width,
			height,
			extent: ((x1 - x0).abs().max(1e-9), (y1 - y0).abs().max(1e-9)),
			fit_k: 1.0,
		};
		state.fit();
		state
	}

	/// Zoom and centre so every area is visible.
	pub fn fit(&mut self) {
		let (span_x, span_y) = self.extent;
		self.fit_k = ((self.width / span_x).min(self.height / span_y) * FIT_MARGIN).max(1e-9);
		self.transform = ViewTransform {
			x: self.width / 2.0,
			y: self.height / 2.0,
			k: self.fit_k,
		};
	}

	/// Scale by `factor` around the screen point (sx, sy).
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(self.fit_k * MIN_ZOOM, self.fit_k * MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = sx - (sx - self.transform.x) * ratio;
		self.transform.y = sy - (sy - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn to_screen(&self, lon: f64, lat: f64) -> (f64, f64) {
		let (x, y) = self.projection.project(lon, lat);
		(
			self.transform.x + x * self.transform.k,
			self.transform.y + y * self.transform.k,
		)
	}

	pub fn screen_to_lon_lat(&self, sx: f64, sy: f64) -> (f64, f64) {
		self.projection.unproject(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn area_at_position(&self, sx: f64, sy: f64) -> Option<String> {
		let (lon, lat) = self.screen_to_lon_lat(sx, sy);
		self.dashboard.catalog.area_at(lon, lat).map(str::to_string)
	}

	pub fn select(&mut self, name: &str) {
		if self.selected != name {
			self.selected = name.to_string();
			self.highlight_t = 0.0;
		}
	}

	pub fn tick(&mut self, dt: f64) {
		self.highlight_t = (self.highlight_t + dt * 2.5).min(1.0);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
		self.fit();
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	use super::*;
	use crate::config::{DATASET, NAME_FIELD};
	use crate::flows::FlowCache;

	fn embedded_map() -> MapState {
		let mut rng = ChaCha8Rng::seed_from_u64(7);
		let dashboard =
			Dashboard::load(DATASET, NAME_FIELD, &mut FlowCache::default(), &mut rng).unwrap();
		MapState::new(Arc::new(dashboard), "Alna".into(), 800.0, 500.0)
	}

	#[test]
	fn wheel_zoom_stays_within_limits() {
		let mut map = embedded_map();
		let fitted = map.transform.k;
		for _ in 0..200 {
			map.zoom_at(400.0, 250.0, 0.9);
		}
		assert!((map.transform.k - fitted * MIN_ZOOM).abs() < 1e-9 * fitted);
		for _ in 0..500 {
			map.zoom_at(400.0, 250.0, 1.1);
		}
		assert!((map.transform.k - fitted * MAX_ZOOM).abs() < 1e-9 * fitted);

		// the point under the cursor stays put
		let before = map.screen_to_lon_lat(120.0, 80.0);
		map.zoom_at(120.0, 80.0, 0.9);
		let after = map.screen_to_lon_lat(120.0, 80.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);

		map.fit();
		assert_eq!(map.transform.k, fitted);
	}

	#[test]
	fn projection_round_trips() {
		let projection = Projection::centered_on(Rect::new((10.0, 59.0), (11.0, 60.0)));
		let (x, y) = projection.project(10.25, 59.75);
		let (lon, lat) = projection.unproject(x, y);
		assert!((lon - 10.25).abs() < 1e-9);
		assert!((lat - 59.75).abs() < 1e-9);
		// north is up
		assert!(projection.project(10.5, 59.9).1 < projection.project(10.5, 59.1).1);
	}
}
