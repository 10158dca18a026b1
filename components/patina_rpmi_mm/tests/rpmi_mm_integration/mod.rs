//! RPMI MM Integration Tests
//!
//! Tests end-to-end `COMMUNICATE` flows in the `patina_rpmi_mm` crate against an in-memory shared memory window.
//!
//! ## Logging
//!
//! The `env_logger` crate can be used to enable logging during tests.
//!
//! To enable logging, set the `RUST_LOG` environment variable to the desired
//! log level (e.g., `debug`, `info`, `warn`, `error`) before running the tests.
//!
//! For example, to enable debug logging for the service group only, run:
//!
//! ```sh
//! RUST_LOG=rpmi_mm=debug,mm_var=trace cargo make test -p patina_rpmi_mm --test rpmi_mm_integration
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent

// Common utilities available to all test modules
mod common;
