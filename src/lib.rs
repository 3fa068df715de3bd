//! Tenant-scoped timetabling service: round-robin generation, conflict
//! detection, quality scoring and rule-based advice over plain JSON.

pub mod advisor;
pub mod config;
pub mod conflicts;
pub mod data;
pub mod error;
pub mod generator;
pub mod quality;
pub mod rules;
pub mod server;
pub mod store;
