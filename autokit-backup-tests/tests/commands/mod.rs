//! Command tests for autokit-backup
//!
//! These tests drive the backup manager end to end on a temp directory,
//! with a stepping mock clock so snapshot names are predictable.

mod delete;
mod retention;
