//! Core application setup and state management.
//!
//! Handles the viewer lifecycle, window configuration, runtime settings and
//! plugin initialisation for both native and WASM targets.

/// Application setup and plugin configuration for the Bevy engine.
///
/// Registers resources, events and the state-gated system schedule.
pub mod app_setup;

/// Viewer lifecycle states and the initialise/dispose transitions.
pub mod app_state;

/// Error type shared by the viewer modules.
pub mod error;

/// Runtime settings with JSON overrides loaded from the asset folder.
pub mod settings;

/// Platform-specific window configuration for native and WASM builds.
///
/// Binds to the host page canvas on the web and checks that it exists.
pub mod window_config;
