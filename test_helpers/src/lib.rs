//! Test helpers shared across crates in the workspace.
//!
//! - [`defaults`] writes throwaway defaults files for `--load-defaults`.
//! - [`cwd`] serialises changes to the process working directory.
//! - [`text`] normalises rendered help so assertions ignore wrapping.

pub mod cwd;
pub mod defaults;
pub mod text;
