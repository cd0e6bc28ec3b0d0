pub mod config;
pub mod engine;
pub mod events;
pub mod frame;
pub mod scheduler;

pub use config::{PerformanceMode, ViewEngineConfig};
pub use engine::ViewEngine;
pub use events::{EngineEvent, SelectionChanged, ViewportChanged};
pub use frame::{EventMarkerPoint, FrameBounds, RenderFrame};
pub use scheduler::{CadenceConfig, RenderScheduler, SchedulerConfig, TickOutcome};
