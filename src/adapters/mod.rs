//! Adapters Layer - Hexagonal Architecture Outer Ring
//!
//! Implements the port traits defined in `crate::ports` with concrete
//! external dependencies. Each sub-module groups adapters by
//! infrastructure concern.
//!
//! Adapter categories:
//! - `api`: Market-data REST API client, market and balance sources
//! - `chain`: Entry-function payload construction

pub mod api;
pub mod chain;
