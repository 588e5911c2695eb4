//! Analyze infrastructure source into construct definitions, compose them into
//! validated architectures, estimate their cost and render C4 diagrams.

pub mod config;
pub mod core;
pub mod error;

pub use crate::config::Config;
pub use crate::core::*;
pub use crate::error::{EngineError, Result};
