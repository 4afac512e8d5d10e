pub mod area_map;
pub mod bar_chart;
mod canvas;
pub mod flow_table;
pub mod metrics;
pub mod sankey;
