//! Output generation.
//!
//! One submodule for now: [`markdown`] renders the collected items into the
//! daily digest document and writes it to disk.

pub mod markdown;
