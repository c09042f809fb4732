//! Application module: exposes the app model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and mirrors the controller's status
//! plus the cursor and prompt state that only the front-end cares about.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
