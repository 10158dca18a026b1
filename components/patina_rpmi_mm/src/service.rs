//! RPMI Management Mode (MM) Services
//!
//! The environment services the MM service group depends on.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
pub mod shared_memory;
pub mod variable_store;

pub use shared_memory::{PhysicalSharedMemory, SharedMemory};
pub use variable_store::{NullVariableStore, VariableStore};
