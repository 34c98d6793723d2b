//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the viewer:
//! - Math types and operations
//! - Color values
//! - Handle and generation types
//! - Frame timing
//! - Logging utilities

pub mod math;
pub mod color;
pub mod collections;
pub mod time;
pub mod logging;
