pub mod angle;
pub mod error;
pub mod geometry;
pub mod history;
pub mod marker;
pub mod orchestrator;
pub mod state;

pub use error::{Error, Result};
pub use geometry::{CircleLayout, MarkerPoint, Point, YAxis};
pub use history::{DEFAULT_SWEEP_STEPS, MAX_SWEEP_STEPS, TrajectoryHistory, TrajectoryPoint};
pub use marker::{Marker, MARKER_COUNT};
pub use orchestrator::{Orchestrator, RenderPayload, ResetPolicy, Settings};
pub use state::{AngleState, ArcDescriptor, Deltas};
