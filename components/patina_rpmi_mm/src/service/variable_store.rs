//! UEFI Variable Store Service
//!
//! The MM variable service validates requests and then hands the validated pieces to a variable store. Persisting
//! variables is not part of this crate; [`NullVariableStore`] accepts every validated request without storage I/O.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use crate::error::Result;
use r_efi::efi;

#[cfg(any(test, feature = "mockall"))]
use mockall::automock;

/// UEFI Variable Store
///
/// Every argument has already been validated by the MM variable service. `name` is the raw UCS-2 name including the
/// null terminator.
#[cfg_attr(any(test, feature = "mockall"), automock)]
pub trait VariableStore {
    /// Looks up a variable and fills `data` with its value.
    ///
    /// `attributes` holds the caller supplied attributes and may be updated with the stored ones.
    fn get_variable(&self, guid: &efi::Guid, name: &[u8], attributes: &mut u32, data: &mut [u8]) -> Result<()>;

    /// Creates, updates or deletes a variable.
    fn set_variable(&self, guid: &efi::Guid, name: &[u8], attributes: u32, data: &[u8]) -> Result<()>;
}

/// A variable store that performs no storage I/O and reports success.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullVariableStore;

impl VariableStore for NullVariableStore {
    fn get_variable(&self, guid: &efi::Guid, name: &[u8], _attributes: &mut u32, data: &mut [u8]) -> Result<()> {
        log::trace!(target: "mm_var", "GetVariable ignored: guid={:?}, name_size={}, data_size={}", guid, name.len(), data.len());
        Ok(())
    }

    fn set_variable(&self, guid: &efi::Guid, name: &[u8], attributes: u32, data: &[u8]) -> Result<()> {
        log::trace!(target: "mm_var", "SetVariable ignored: guid={:?}, name_size={}, attr=0x{:X}, data_size={}", guid, name.len(), attributes, data.len());
        Ok(())
    }
}
