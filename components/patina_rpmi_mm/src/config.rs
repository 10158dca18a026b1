//! RPMI Management Mode (MM) Configuration
//!
//! Defines the configuration needed to instantiate the MM service group and the attribute block that is reported to
//! RPMI clients through the `GET_ATTRIBUTES` service.
//!
//! ## MM Configuration Usage
//!
//! The platform is expected to describe the shared memory window used for MM communication when the service group
//! is created. The window is described as a split 64-bit physical address (high and low 32-bit halves) and a size in
//! bytes. The values are immutable for the lifetime of the service group.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use core::fmt;

/// Major version of the MM service group implementation.
pub const RPMI_MM_MAJOR_VER: u32 = 0x1;
/// Minor version of the MM service group implementation.
pub const RPMI_MM_MINOR_VER: u32 = 0x0;

const MM_MAJOR_VER_MASK: u32 = 0xFFFF_0000;
const MM_MINOR_VER_MASK: u32 = 0x0000_FFFF;
const MM_MAJOR_VER_SHIFT: u32 = 16;

/// Packs a major/minor pair into the 32-bit version layout used by RPMI.
pub const fn pack_version(major: u32, minor: u32) -> u32 {
    ((major << MM_MAJOR_VER_SHIFT) & MM_MAJOR_VER_MASK) | (minor & MM_MINOR_VER_MASK)
}

/// MM Service Group Configuration
///
/// Describes the shared memory window that carries MM communication buffers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MmServiceGroupConfig {
    /// Upper 32 bits of the shared memory physical address.
    pub shmem_addr_hi: u32,
    /// Lower 32 bits of the shared memory physical address.
    pub shmem_addr_lo: u32,
    /// Size of the shared memory window in bytes.
    pub shmem_size: u32,
}

/// MM Attributes
///
/// Per-instance state of the MM service group as reported by `GET_ATTRIBUTES`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct MmAttributes {
    pub mm_version: u32,
    pub shmem_addr_lo: u32,
    pub shmem_addr_hi: u32,
    pub shmem_size: u32,
}

impl MmAttributes {
    /// Returns the 64-bit base address of the shared memory window.
    pub const fn shmem_base(&self) -> u64 {
        ((self.shmem_addr_hi as u64) << 32) | self.shmem_addr_lo as u64
    }

    /// Returns the attribute words in the order they are placed in a `GET_ATTRIBUTES` response.
    pub const fn as_words(&self) -> [u32; 4] {
        [self.mm_version, self.shmem_addr_lo, self.shmem_addr_hi, self.shmem_size]
    }
}

impl From<MmServiceGroupConfig> for MmAttributes {
    fn from(config: MmServiceGroupConfig) -> Self {
        Self {
            mm_version: pack_version(RPMI_MM_MAJOR_VER, RPMI_MM_MINOR_VER),
            shmem_addr_lo: config.shmem_addr_lo,
            shmem_addr_hi: config.shmem_addr_hi,
            shmem_size: config.shmem_size,
        }
    }
}

impl fmt::Debug for MmAttributes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MmAttributes(version: 0x{:08X}, shmem: 0x{:016X}, size: 0x{:X})",
            self.mm_version,
            self.shmem_base(),
            self.shmem_size
        )
    }
}
