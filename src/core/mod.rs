pub mod active;
pub mod anchors;
pub mod animation;
pub mod camera;
pub mod diagnostics;
pub mod framing;
pub mod helix;
pub mod hit;
pub mod options;
pub mod projection;
pub mod scene;
pub mod schedule;
pub mod scroll;
pub mod section;

pub use active::ActiveSectionDetector;
pub use anchors::{AnchorLayout, SectionAnchorCalibrator};
pub use animation::{InstanceStyle, InstanceTable, LumaCheck};
pub use camera::Camera;
pub use diagnostics::{DiagEvent, DiagnosticsSink, DiagnosticsState, NoopSink, RecordingSink};
pub use framing::{CameraFramingController, CameraState, FramingConfig};
pub use helix::{HelixGeometry, HelixParams, SectionMarker};
pub use hit::{HitConfig, HitTester};
pub use options::SceneOptions;
pub use projection::{CssRect, MarkerScreenPosition, ScreenSnapshot, SharedSnapshot};
pub use scene::{FrameInput, FrameOutput, NavScene};
pub use scroll::{ScrollMetrics, ScrollProgressTracker};
pub use section::SectionId;

// Shaders bundled as string constants
pub static HELIX_WGSL: &str = include_str!("../../shaders/helix.wgsl");
