//! RPMI Management Mode (MM) Components
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
pub mod service_group;
pub mod variable_service;
