//! Console front-end: wires the core state machine to the engine, storage and terminal.
mod app;
mod console;
mod effects;
mod logging;
mod render;
mod settings;

pub use app::run_app;
