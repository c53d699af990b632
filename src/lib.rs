//! figs-ingest - schema-driven claims ingestion and FIGS tree parsing
//!
//! - `schema`: schema documents and header checks
//! - `ingest`: CSV pre-flight and typed record parsing
//! - `tree`: tree dump parsing and forest validation
//! - `validation`: the shared accumulate-and-report result type

pub mod cli;
pub mod config;
pub mod ingest;
pub mod observability;
pub mod schema;
pub mod tree;
pub mod validation;
