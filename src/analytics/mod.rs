pub mod events;
pub mod trend;

pub use events::{EventDetectorConfig, EventMarker, detect_events};
pub use trend::{TrendLine, TrendWindows, fit_trend_line, fit_trend_lines};
