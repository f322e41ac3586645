pub mod chart;
pub mod raster;

pub use chart::{ChartDescription, ChartLayout, ChartStroke, LineSegment, Point};
pub use raster::{ChartPainter, SkiaChartPainter};
