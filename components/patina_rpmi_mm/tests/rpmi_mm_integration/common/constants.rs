//! Test constants for RPMI MM integration tests
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent

use r_efi::efi;

/// Physical base of the test shared memory window.
pub const SHMEM_BASE: u64 = 0x0000_0001_8000_0000;

/// Size of the test shared memory window.
pub const SHMEM_SIZE: usize = 0x10000;

/// Offset of the input message inside the window.
pub const INPUT_OFFSET: u32 = 0x0;

/// Offset of the output message inside the window.
pub const OUTPUT_OFFSET: u32 = 0x8000;

/// Size of an RPMI response buffer used by the tests.
pub const RESPONSE_SIZE: usize = 64;

/// `EFI_GLOBAL_VARIABLE`
pub const GLOBAL_VARIABLE_GUID: efi::Guid =
    efi::Guid::from_fields(0x8be4df61, 0x93ca, 0x11d2, 0xaa, 0x0d, &[0x00, 0xe0, 0x98, 0x03, 0x2b, 0x8c]);

/// A GUID with no MM handler.
pub const UNKNOWN_GUID: efi::Guid =
    efi::Guid::from_fields(0x12345678, 0x1234, 0x5678, 0x12, 0x34, &[0x56, 0x78, 0x90, 0xab, 0xcd, 0xef]);

/// Non-volatile, boot service and runtime access.
pub const NV_BS_RT: u32 = 0x7;

/// Response words of a `COMMUNICATE` request.
pub mod rpmi_status {
    pub const SUCCESS: u32 = 0;
    pub const INVALID_PARAM: u32 = -3i32 as u32;
    pub const INVALID_ADDR: u32 = -5i32 as u32;
    pub const NO_DATA: u32 = -14i32 as u32;
}

/// EFI status codes written to `return_status`.
pub mod efi_status {
    pub const SUCCESS: u64 = 0;
    pub const INVALID_PARAMETER: u64 = 0x8000_0000_0000_0002;
    pub const UNSUPPORTED: u64 = 0x8000_0000_0000_0003;
    pub const NOT_FOUND: u64 = 0x8000_0000_0000_000E;
    pub const ACCESS_DENIED: u64 = 0x8000_0000_0000_000F;
}
