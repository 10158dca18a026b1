//! RPMI Management Mode (MM) Service Group
//!
//! This crate implements the MM service group of the RISC-V Platform Management Interface (RPMI). It lets a less
//! privileged actor (typically the UEFI runtime executing in S-mode) reach MM services, most importantly the UEFI
//! variable service, through a shared memory window that is jointly owned with M-mode firmware.
//!
//! ## MM Technology Background (RISC-V Architecture)
//!
//! On x86, Management Mode is entered through a System Management Interrupt and executes out of isolated SMRAM. On
//! RISC-V the same role is filled by firmware running at a higher privilege level. Requests are carried by the RPMI
//! transport as a service group id, a service id and a sequence of 32-bit words whose byte order is a property of
//! the transport.
//!
//! The shared memory window holds standard MM communicate buffers:
//!
//! ```text
//! EfiMmCommunicateHeader { header_guid, message_length } | message_length bytes of handler data
//! ```
//!
//! The header GUID selects the handler. For the MM variable protocol the handler data starts with a
//! `MmVarCommHeader { function, return_status }` followed by a function specific payload.
//!
//! Everything in the shared window may be modified concurrently by the less privileged actor. The service group
//! copies the message into a private buffer before interpreting it and validates every size derived field against
//! that private copy.
//!
//! ## Services
//!
//! | Id | Service               | Minimum request | Handler |
//! |----|-----------------------|-----------------|---------|
//! | 1  | `ENABLE_NOTIFICATION` | 0 bytes         | none    |
//! | 2  | `GET_ATTRIBUTES`      | 0 bytes         | [`MmServiceGroup::get_attributes`](component::service_group::MmServiceGroup::get_attributes) |
//! | 3  | `COMMUNICATE`         | 4 bytes         | [`MmServiceGroup::communicate`](component::service_group::MmServiceGroup::communicate) |
//!
//! ## Examples and Usage
//!
//! ```rust
//! use patina_rpmi_mm::component::service_group::{MmServiceGroup, MmServiceId};
//! use patina_rpmi_mm::config::MmServiceGroupConfig;
//! use patina_rpmi_mm::error::{EfiError, Result};
//! use patina_rpmi_mm::service::SharedMemory;
//! use patina_rpmi_mm::transport::{Endianness, RpmiTransport};
//!
//! /// Shared memory that cannot be accessed.
//! struct Unmapped;
//!
//! impl SharedMemory for Unmapped {
//!     fn read_bytes(&self, _address: u64, _buffer: &mut [u8]) -> Result<()> {
//!         Err(EfiError::InvalidParameter)
//!     }
//!
//!     fn write_bytes(&self, _address: u64, _data: &[u8]) -> Result<()> {
//!         Err(EfiError::InvalidParameter)
//!     }
//! }
//!
//! let config = MmServiceGroupConfig { shmem_addr_hi: 0, shmem_addr_lo: 0x8000_0000, shmem_size: 0x10000 };
//! let mut group = MmServiceGroup::new(config, Box::new(Unmapped));
//! let transport = RpmiTransport::new(Endianness::Little);
//!
//! let mut response = [0u8; 20];
//! let len = group
//!     .process_a2p_request(MmServiceId::GetAttributes as u8, &transport, None, &mut response)
//!     .unwrap();
//! assert_eq!(len, 20);
//! assert_eq!(transport.read_word(&response, 4), Some(0x10000));
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
#![cfg_attr(all(not(feature = "std"), not(test), not(feature = "mockall")), no_std)]

pub mod component;
pub mod config;
pub mod error;
pub mod protocol;
pub mod service;
pub mod transport;

#[cfg(test)]
mod test_support;
