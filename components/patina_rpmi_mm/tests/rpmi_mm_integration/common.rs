//! Common Test Infrastructure for RPMI MM Integration Tests
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent

pub mod constants;
pub mod message_builder;
pub mod shared_memory;

// Re-export commonly used items for test infrastructure
pub use {constants::*, message_builder::*, shared_memory::*};

use std::sync::Once;

static INIT: Once = Once::new();

/// Initializes `env_logger` once per test binary.
pub fn init_logger() {
    INIT.call_once(|| {
        // Default to no logging unless RUST_LOG environment variable is set
        let mut builder = env_logger::Builder::from_default_env();

        if std::env::var("RUST_LOG").is_err() {
            builder.filter_level(log::LevelFilter::Off);
        }

        builder.is_test(true).init();
    });
}
