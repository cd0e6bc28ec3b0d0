pub mod mapper;
pub mod primitives;
pub mod project;
pub mod store;
pub mod types;
pub mod viewport;
pub mod windowing;

pub use mapper::{PlotInsets, ViewportMapper};
pub use project::{SamplePoint, project_samples};
pub use store::{SampleStore, StoreExtent, TimeRange};
pub use types::{Sample, ScreenPoint, Viewport};
pub use viewport::{PriceFitMode, ViewportBounds, ViewportState};
