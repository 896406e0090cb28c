pub mod constants;
pub mod core;
pub mod error;

#[cfg(target_arch = "wasm32")]
mod app;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod navigate;
#[cfg(target_arch = "wasm32")]
mod observer;
#[cfg(target_arch = "wasm32")]
mod render;
#[cfg(target_arch = "wasm32")]
mod schedule;
#[cfg(target_arch = "wasm32")]
mod telemetry;

#[cfg(target_arch = "wasm32")]
pub use app::HelixNav;
#[cfg(target_arch = "wasm32")]
pub(crate) use app::Shared;

pub use crate::core::{NavScene, SceneOptions, SectionId};
pub use error::{NavError, NavResult};
