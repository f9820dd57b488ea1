// Library surface for headless/integration tests and reuse.
// The binary only adds terminal setup and the event loop.
pub mod app_dirs;
pub mod audio;
pub mod config;
pub mod games;
pub mod keymap;
pub mod runtime;
pub mod scores;
pub mod session;
pub mod timer;
pub mod ui;
