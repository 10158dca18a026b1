//! Error types for the RPMI MM service group.
//!
//! Two independent error channels exist:
//!
//! - [`EfiError`] is the payload-level status. It is encoded into the `return_status` field of the MM variable
//!   communicate header as a 64-bit signed-magnitude EFI status code and travels back to the caller inside the
//!   shared buffer.
//! - [`RpmiError`] is the RPC-level status reported to the RPMI transport in the first response word.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

/// A specialized [`Result`](core::result::Result) type for EFI style operations.
pub type Result<T> = core::result::Result<T, EfiError>;

use r_efi::efi;

/// High bit of a 64-bit EFI status code. Set for every error code.
pub const EFI_ERROR_BIT: u64 = 0x8000_0000_0000_0000;

/// Wire encoding of `EFI_SUCCESS`.
pub const EFI_SUCCESS: u64 = 0;

/// EFI error codes that the MM variable service can report.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum EfiError {
    InvalidParameter,
    Unsupported,
    BufferTooSmall,
    NotFound,
    AccessDenied,
}

impl EfiError {
    /// Numeric error code carried in the low bits of the status.
    pub const fn code(self) -> u64 {
        match self {
            EfiError::InvalidParameter => 2,
            EfiError::Unsupported => 3,
            EfiError::BufferTooSmall => 5,
            EfiError::NotFound => 14,
            EfiError::AccessDenied => 15,
        }
    }

    /// Returns the 64-bit signed-magnitude wire encoding of this error.
    pub const fn to_wire(self) -> u64 {
        EFI_ERROR_BIT | self.code()
    }

    /// Decodes a 64-bit wire status.
    ///
    /// `EFI_SUCCESS` maps to `Ok(())`. Codes outside of the set this service produces map to `None` inside the
    /// error position so the caller can decide how to treat them.
    pub fn wire_to_result(status: u64) -> core::result::Result<(), Option<EfiError>> {
        if status == EFI_SUCCESS {
            return Ok(());
        }
        if status & EFI_ERROR_BIT == 0 {
            return Err(None);
        }
        Err(match status & !EFI_ERROR_BIT {
            2 => Some(EfiError::InvalidParameter),
            3 => Some(EfiError::Unsupported),
            5 => Some(EfiError::BufferTooSmall),
            14 => Some(EfiError::NotFound),
            15 => Some(EfiError::AccessDenied),
            _ => None,
        })
    }

    /// Converts an `r_efi::efi::Status` to a `Result`.
    ///
    /// Statuses with no [`EfiError`] counterpart are reported as [`EfiError::Unsupported`].
    pub fn status_to_result(status: efi::Status) -> Result<()> {
        match status {
            efi::Status::SUCCESS => Ok(()),
            efi::Status::INVALID_PARAMETER => Err(EfiError::InvalidParameter),
            efi::Status::BUFFER_TOO_SMALL => Err(EfiError::BufferTooSmall),
            efi::Status::NOT_FOUND => Err(EfiError::NotFound),
            efi::Status::ACCESS_DENIED => Err(EfiError::AccessDenied),
            _ => Err(EfiError::Unsupported),
        }
    }
}

impl From<EfiError> for efi::Status {
    fn from(e: EfiError) -> efi::Status {
        match e {
            EfiError::InvalidParameter => efi::Status::INVALID_PARAMETER,
            EfiError::Unsupported => efi::Status::UNSUPPORTED,
            EfiError::BufferTooSmall => efi::Status::BUFFER_TOO_SMALL,
            EfiError::NotFound => efi::Status::NOT_FOUND,
            EfiError::AccessDenied => efi::Status::ACCESS_DENIED,
        }
    }
}

/// Encodes the outcome of a variable service operation as a 64-bit wire status.
pub fn encode_status(result: Result<()>) -> u64 {
    match result {
        Ok(()) => EFI_SUCCESS,
        Err(err) => err.to_wire(),
    }
}

/// RPMI error codes as defined by the RPMI specification.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
#[repr(i32)]
pub enum RpmiError {
    Success = 0,
    Failed = -1,
    NotSupported = -2,
    InvalidParam = -3,
    Denied = -4,
    InvalidAddr = -5,
    Already = -6,
    Extension = -7,
    HwFault = -8,
    Busy = -9,
    InvalidState = -10,
    BadRange = -11,
    Timeout = -12,
    Io = -13,
    NoData = -14,
}

impl RpmiError {
    /// Returns the status as the unsigned 32-bit word placed in an RPMI response.
    pub const fn as_word(self) -> u32 {
        self as i32 as u32
    }
}
