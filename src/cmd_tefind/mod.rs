//! Subcommand modules for the `tefind` binary.

pub mod detect;
pub mod revcomp;
pub mod survey;
pub mod validate;
