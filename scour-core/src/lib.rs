//! Scour Core
//!
//! Core types for the scour artifact retention engine.
//!
//! This crate contains:
//! - Domain types: Core business entities (WorkflowRun, Artifact, Tag, RetentionPolicy)
//! - DTOs: Wire shapes of the GitHub REST API responses the engine consumes

pub mod domain;
pub mod dto;
