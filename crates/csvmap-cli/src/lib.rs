//! Command-line front end for csvmap.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
