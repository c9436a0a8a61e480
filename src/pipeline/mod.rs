//! Pipeline stages for the batch run.
//!
//! Each submodule implements exactly one step, kept separate so each is
//! independently testable:
//!
//! ```text
//! scan ──▶ layout ──▶ engine ──▶ write ──▶ report
//! (list+filter) (paths)  (OCR)   (txt files) (csv)
//! ```
//!
//! 1. [`scan`]   — list the input folder and keep supported extensions
//! 2. [`layout`] — derive the timestamped run folder and per-file output paths
//!
//! The engine call, output writes, and report assembly live in
//! [`crate::run`], which drives the stages in order.

pub mod layout;
pub mod scan;
