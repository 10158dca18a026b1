//! MM Shared Memory Access
//!
//! The MM shared memory window is jointly owned with a less privileged actor. The service group only ever moves
//! bytes in and out of the window through this service and interprets local copies.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use crate::error::Result;

#[cfg(any(test, feature = "mockall"))]
use mockall::automock;

/// Shared Memory Service
///
/// Reads and writes raw bytes at physical addresses inside the MM shared memory window. Bounds checking against the
/// configured window is the responsibility of the implementation.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait SharedMemory {
    /// Copies `buffer.len()` bytes starting at `address` into `buffer`.
    fn read_bytes(&self, address: u64, buffer: &mut [u8]) -> Result<()>;

    /// Copies `data` to shared memory starting at `address`.
    fn write_bytes(&self, address: u64, data: &[u8]) -> Result<()>;
}

/// Identity mapped physical shared memory.
///
/// Addresses are used directly as pointers.
#[derive(Debug)]
pub struct PhysicalSharedMemory {
    _private: (),
}

impl PhysicalSharedMemory {
    /// Creates a new identity mapped shared memory accessor.
    ///
    /// ## Safety
    ///
    /// - Every address handed to the MM service group (the configured window plus any offset from a request) must be
    ///   mapped, readable and writable for the accessed length.
    /// - The memory must not overlap any memory owned by Rust code in this image.
    pub unsafe fn new() -> Self {
        Self { _private: () }
    }
}

#[cfg(not(tarpaulin_include))]
impl SharedMemory for PhysicalSharedMemory {
    fn read_bytes(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        let src = address as usize as *const u8;
        // SAFETY: The creator of this accessor guarantees the window is mapped and does not alias Rust memory.
        unsafe { core::ptr::copy_nonoverlapping(src, buffer.as_mut_ptr(), buffer.len()) };
        Ok(())
    }

    fn write_bytes(&self, address: u64, data: &[u8]) -> Result<()> {
        let dest = address as usize as *mut u8;
        // SAFETY: The creator of this accessor guarantees the window is mapped and does not alias Rust memory.
        unsafe { core::ptr::copy_nonoverlapping(data.as_ptr(), dest, data.len()) };
        Ok(())
    }
}
