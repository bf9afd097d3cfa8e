//! Shared fixtures for integration tests.

#![allow(dead_code)]

use filter_expression::{FieldType, IndexSchema};
use std::sync::Once;

static INIT: Once = Once::new();

/// Install a test subscriber once; honours `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn logs_schema() -> IndexSchema {
    IndexSchema::new("logs-*")
        .with_field("status", FieldType::String)
        .with_field("host", FieldType::String)
        .with_field("bytes", FieldType::Number)
        .with_field("@timestamp", FieldType::Date)
}

pub fn schemas() -> Vec<IndexSchema> {
    vec![logs_schema()]
}
