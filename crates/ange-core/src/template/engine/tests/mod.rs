//! Tests for template engine
//!
//! Organized into focused submodules.

use super::*;

// Test helper functions
mod helpers;

mod tokenstream_performance;

mod render_blocks;
mod render_tags;

// Error and edge case tests
mod errors;
