//! Command line front end for the `pkgtex_pkg` and `pkgtex_tex` libraries.

pub mod commands;
pub mod export;
