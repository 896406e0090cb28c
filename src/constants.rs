// Shared visual tuning constants for the helix scene.

// Particle sizing (group-local radius)
pub const BASE_PARTICLE_SCALE: f32 = 0.24; // strand particle
pub const CLUSTER_SCALE: f32 = 0.45; // particles at a section marker step
pub const GLOW_SCALE: f32 = 0.55; // inner marker halo radius
pub const OUTER_GLOW_FACTOR: f32 = 1.6; // outer halo radius relative to inner
pub const INDICATOR_SCALE: f32 = 0.35; // travelling progress point, before depth emphasis

// Base particle color: light gray lifted toward the viewer
pub const BASE_GRAY: f32 = 0.90;
pub const BASE_GRAY_DEPTH_SPAN: f32 = 0.10;
pub const INDICATOR_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

// Lattice (strand segments + rungs)
pub const LATTICE_COLOR_HEX: u32 = 0xcf_cf_cf;
pub const LATTICE_OPACITY: f32 = 0.10;

// Rotation (radians per second of idle spin)
pub const BASE_ROTATION_RATE: f64 = 0.15;

// Marker halo pulse
pub const HALO_ACTIVE_SCALE: f32 = 1.5;
pub const HALO_PULSE_SPEED: f32 = 2.0;
pub const HALO_ACTIVE_PULSE_SPEED: f32 = 3.0;
pub const HALO_INNER_AMPLITUDE: f32 = 0.10;
pub const HALO_OUTER_AMPLITUDE: f32 = 0.15;

// Hover
pub const HOVER_SCALE: f32 = 1.3;
pub const HOVER_BRIGHTEN: f32 = 1.2;

// Progressive reveal window around the progress indicator (world units)
pub const REVEAL_RANGE: f32 = 12.0;
pub const REVEAL_FADE: f32 = 4.0;
pub const REVEAL_BOOST: f32 = 0.25;

// Luminance guard
pub const LUMA_SAMPLE_STRIDE: usize = 5;
pub const LUMA_FLOOR_RATIO: f32 = 0.95;

// Canvas backing store
pub const MAX_DEVICE_PIXEL_RATIO: f64 = 2.0;

// Diagnostics
pub const DEBUG_GLOBAL: &str = "__HELIX_NAV_DEBUG__";
pub const E2E_GLOBAL: &str = "__HELIX_NAV_E2E__";
pub const DIAGNOSTICS_VERSION: u32 = 1;
