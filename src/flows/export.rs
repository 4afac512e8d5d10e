//! CSV export of a selection's outbound or inbound flows.

use serde::Serialize;

use super::aggregate::{FlowEntry, FlowSummary};
use super::sankey::Direction;

/// One table row: counterpart area, trips and its share of the total.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ShareRow {
	/// Counterpart area.
	pub area: String,
	/// Trips on the relation.
	pub trips: u32,
	/// Percent of all trips in the list, rounded to one decimal.
	pub share_pct: f64,
}

/// Rows sorted by trips, largest first. Equal counts keep area order.
pub fn share_rows(entries: &[FlowEntry]) -> Vec<ShareRow> {
	let total: u64 = entries.iter().map(|e| e.trips as u64).sum();
	let mut rows: Vec<ShareRow> = entries
		.iter()
		.map(|e| ShareRow {
			area: e.area.clone(),
			trips: e.trips,
			share_pct: if total == 0 {
				0.0
			} else {
				(e.trips as f64 / total as f64 * 1000.0).round() / 10.0
			},
		})
		.collect();
	rows.sort_by(|a, b| b.trips.cmp(&a.trips));
	rows
}

/// Header of the counterpart column.
pub fn area_column(direction: Direction) -> &'static str {
	match direction {
		Direction::Outbound => "destination",
		Direction::Inbound => "origin",
	}
}

/// Download name, `trips_out_<area>.csv` or `trips_in_<area>.csv`.
pub fn export_file_name(direction: Direction, area: &str) -> String {
	let tag = match direction {
		Direction::Outbound => "out",
		Direction::Inbound => "in",
	};
	format!("trips_{tag}_{area}.csv")
}

/// CSV bytes with a header row and one row per entry, largest first.
pub fn flows_csv(direction: Direction, entries: &[FlowEntry]) -> Result<Vec<u8>, csv::Error> {
	let mut writer = csv::WriterBuilder::new()
		.has_headers(false)
		.from_writer(Vec::new());
	writer.write_record([area_column(direction), "trips", "share_pct"])?;
	for row in share_rows(entries) {
		writer.serialize(row)?;
	}
	writer
		.into_inner()
		.map_err(|err| csv::Error::from(err.into_error()))
}

/// Destinations of the selection's trips as CSV.
pub fn outbound_csv(summary: &FlowSummary) -> Result<Vec<u8>, csv::Error> {
	flows_csv(Direction::Outbound, &summary.outbound)
}

/// Origins of the selection's trips as CSV.
pub fn inbound_csv(summary: &FlowSummary) -> Result<Vec<u8>, csv::Error> {
	flows_csv(Direction::Inbound, &summary.inbound)
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand_chacha::ChaCha8Rng;

	use super::*;
	use crate::flows::generator::FlowMatrix;

	fn entry(area: &str, trips: u32) -> FlowEntry {
		FlowEntry {
			area: area.to_string(),
			trips,
		}
	}

	#[test]
	fn rows_are_sorted_with_rounded_shares() {
		let rows = share_rows(&[entry("B", 1000), entry("C", 500), entry("D", 1500)]);
		let areas: Vec<&str> = rows.iter().map(|r| r.area.as_str()).collect();
		assert_eq!(areas, ["D", "B", "C"]);
		assert_eq!(rows[0].share_pct, 50.0);
		assert_eq!(rows[1].share_pct, 33.3);
		assert_eq!(rows[2].share_pct, 16.7);
	}

	#[test]
	fn csv_layout() {
		let bytes = flows_csv(Direction::Inbound, &[entry("B", 800), entry("C", 900)]).unwrap();
		let text = String::from_utf8(bytes).unwrap();
		assert_eq!(
			text,
			"origin,trips,share_pct\nC,900,52.9\nB,800,47.1\n"
		);
		assert_eq!(export_file_name(Direction::Inbound, "Sagene"), "trips_in_Sagene.csv");
		assert_eq!(export_file_name(Direction::Outbound, "Sagene"), "trips_out_Sagene.csv");
	}

	#[test]
	fn empty_list_exports_header_only() {
		let bytes = flows_csv(Direction::Outbound, &[]).unwrap();
		assert_eq!(String::from_utf8(bytes).unwrap(), "destination,trips,share_pct\n");
	}

	#[test]
	fn trip_column_sums_to_summary_total() {
		let mut rng = ChaCha8Rng::seed_from_u64(5);
		let areas: Vec<String> = (0..8).map(|i| format!("Area {i}")).collect();
		let matrix = FlowMatrix::generate(&areas, &mut rng);
		let summary = FlowSummary::for_area(&matrix, "Area 3");

		for (bytes, expected) in [
			(outbound_csv(&summary).unwrap(), summary.outbound_total),
			(inbound_csv(&summary).unwrap(), summary.inbound_total),
		] {
			let mut reader = csv::Reader::from_reader(bytes.as_slice());
			let mut sum = 0u64;
			let mut rows = 0;
			for record in reader.records() {
				let record = record.unwrap();
				sum += record[1].parse::<u64>().unwrap();
				rows += 1;
			}
			assert_eq!(rows, 7);
			assert_eq!(sum, expected);
		}
	}
}
