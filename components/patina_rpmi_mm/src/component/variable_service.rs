//! MM Variable Service
//!
//! Handles messages addressed to the MM variable protocol GUID. The service validates the variable length payload
//! of each request before any size derived field is trusted, dispatches on the function code and writes an EFI
//! status code back into the `return_status` field of the [`MmVarCommHeader`].
//!
//! ## Logging
//!
//! Detailed logging is available for this component using the `mm_var` log target.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
extern crate alloc;
use alloc::{boxed::Box, vec};
use core::fmt::{self, Debug};
use core::ops::Range;

use crate::error::{encode_status, EfiError, Result};
use crate::protocol::variable::{
    MmVarCommAccessVariable, MmVarCommGetPayloadSize, MmVarCommHeader, MmVarFunction, MAX_PAYLOAD_SIZE,
    MAX_VARINFO_SIZE, MM_VAR_COMM_HEADER_SIZE,
};
use crate::service::variable_store::{NullVariableStore, VariableStore};
use r_efi::efi;
use zerocopy::{FromBytes, IntoBytes};

/// Size in bytes of a single UCS-2 code unit.
const NAME_CHAR_SIZE: usize = core::mem::size_of::<u16>();

/// Byte offset of the attributes field in the access payload.
const ATTR_OFFSET: usize = core::mem::offset_of!(MmVarCommAccessVariable, attr);

/// A validated `GET_VARIABLE` or `SET_VARIABLE` request.
///
/// The ranges index the payload (and its scratch copy) and are guaranteed to be in bounds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableAccess {
    pub guid: efi::Guid,
    pub attributes: u32,
    /// Range of the null-terminated UCS-2 name.
    pub name: Range<usize>,
    /// Range of the variable data following the name.
    pub data: Range<usize>,
}

fn read_char(bytes: &[u8], index: usize) -> Option<u16> {
    let start = index.checked_mul(NAME_CHAR_SIZE)?;
    let unit = bytes.get(start..start.checked_add(NAME_CHAR_SIZE)?)?;
    Some(u16::from_ne_bytes([unit[0], unit[1]]))
}

/// Validates the payload of a `GET_VARIABLE` or `SET_VARIABLE` request.
///
/// The payload is first copied into `scratch` so the checks and the returned fields are derived from a single
/// snapshot of the data, regardless of concurrent modification of the source.
///
/// ## Errors
///
/// - [`EfiError::InvalidParameter`]: the payload is shorter than the fixed access fields or larger than `scratch`.
/// - [`EfiError::AccessDenied`]: the declared sizes overflow, exceed the payload, or the name is not a
///   null-terminated UCS-2 string of at least one code unit.
/// - [`EfiError::InvalidParameter`]: `is_get_variable` is set and the name is empty.
pub fn validate_variable_access(payload: &[u8], scratch: &mut [u8], is_get_variable: bool) -> Result<VariableAccess> {
    let payload_size = payload.len();
    if payload_size < MmVarCommAccessVariable::NAME_OFFSET {
        log::warn!(target: "mm_var", "Access payload too small: size={}, required={}", payload_size, MmVarCommAccessVariable::NAME_OFFSET);
        return Err(EfiError::InvalidParameter);
    }

    let local = scratch.get_mut(..payload_size).ok_or_else(|| {
        log::warn!(target: "mm_var", "Access payload exceeds scratch buffer: size={}", payload_size);
        EfiError::InvalidParameter
    })?;
    local.copy_from_slice(payload);
    let local: &[u8] = local;

    let (fixed, _) = MmVarCommAccessVariable::read_from_prefix(local).map_err(|_| EfiError::InvalidParameter)?;
    let datasize = fixed.datasize;
    let namesize = fixed.namesize;

    let infosize = (MmVarCommAccessVariable::NAME_OFFSET as u64)
        .checked_add(datasize)
        .and_then(|size| size.checked_add(namesize))
        .ok_or_else(|| {
            log::warn!(target: "mm_var", "Access payload size overflow: datasize=0x{:X}, namesize=0x{:X}", datasize, namesize);
            EfiError::AccessDenied
        })?;

    if infosize > payload_size as u64 {
        log::warn!(target: "mm_var", "Access payload sizes exceed buffer: infosize={}, payload_size={}", infosize, payload_size);
        return Err(EfiError::AccessDenied);
    }

    // Both sizes are bounded by payload_size from here on.
    let namesize = namesize as usize;
    let datasize = datasize as usize;

    if namesize < NAME_CHAR_SIZE {
        log::warn!(target: "mm_var", "Variable name too small: namesize={}", namesize);
        return Err(EfiError::AccessDenied);
    }

    let name_range = MmVarCommAccessVariable::NAME_OFFSET..MmVarCommAccessVariable::NAME_OFFSET + namesize;
    let name = local.get(name_range.clone()).ok_or(EfiError::AccessDenied)?;

    if read_char(name, namesize / NAME_CHAR_SIZE - 1) != Some(0) {
        log::warn!(target: "mm_var", "Variable name is not null-terminated: namesize={}", namesize);
        return Err(EfiError::AccessDenied);
    }

    if is_get_variable && read_char(name, 0) == Some(0) {
        log::warn!(target: "mm_var", "GetVariable with an empty variable name");
        return Err(EfiError::InvalidParameter);
    }

    Ok(VariableAccess {
        guid: efi::Guid::from_bytes(&fixed.guid),
        attributes: fixed.attr,
        data: name_range.end..name_range.end + datasize,
        name: name_range,
    })
}

/// MM Variable Service
///
/// Owns the payload scratch buffer used while validating requests and the variable store requests are forwarded to.
pub struct MmVariableService {
    payload_buffer: Box<[u8]>,
    store: Box<dyn VariableStore>,
}

impl MmVariableService {
    /// Creates a new variable service backed by [`NullVariableStore`].
    pub fn new() -> Self {
        Self::with_store(Box::new(NullVariableStore))
    }

    /// Creates a new variable service backed by the given variable store.
    pub fn with_store(store: Box<dyn VariableStore>) -> Self {
        Self { payload_buffer: vec![0u8; MAX_VARINFO_SIZE].into_boxed_slice(), store }
    }

    /// Processes a variable protocol message in place.
    ///
    /// `buffer` starts with a [`MmVarCommHeader`] followed by the function payload. A buffer too small to hold the
    /// header, or with a payload larger than [`MAX_PAYLOAD_SIZE`], is ignored since there is no safe place to report
    /// a status. Otherwise the status of the operation is always written to `return_status` and `function` is left
    /// unmodified.
    pub fn handle(&mut self, buffer: &mut [u8]) {
        let Some(payload_size) = buffer.len().checked_sub(MM_VAR_COMM_HEADER_SIZE) else {
            log::warn!(target: "mm_var", "Buffer too small for variable header: size={}", buffer.len());
            return;
        };

        if payload_size > MAX_PAYLOAD_SIZE {
            log::warn!(target: "mm_var", "Variable payload too large: size={}, max={}", payload_size, MAX_PAYLOAD_SIZE);
            return;
        }

        let Ok((header, _)) = MmVarCommHeader::read_from_prefix(buffer) else {
            return;
        };
        let function = header.function;

        self.payload_buffer.fill(0);

        let (header_bytes, payload) = buffer.split_at_mut(MM_VAR_COMM_HEADER_SIZE);
        log::debug!(target: "mm_var", "Variable request: function={}, payload_size={}", function, payload_size);

        let result = match MmVarFunction::try_from(function) {
            Ok(MmVarFunction::GetVariable) => self.get_variable(payload),
            Ok(MmVarFunction::SetVariable) => self.set_variable(payload),
            Ok(MmVarFunction::GetPayloadSize) => Self::get_payload_size(payload),
            Ok(
                MmVarFunction::GetNextVariableName
                | MmVarFunction::QueryVariableInfo
                | MmVarFunction::ReadyToBoot
                | MmVarFunction::ExitBootService
                | MmVarFunction::GetStatistics
                | MmVarFunction::LockVariable
                | MmVarFunction::VarCheckVariablePropertySet
                | MmVarFunction::VarCheckVariablePropertyGet
                | MmVarFunction::InitRuntimeVariableCacheContext
                | MmVarFunction::SyncRuntimeCache
                | MmVarFunction::GetRuntimeCacheInfo,
            )
            | Err(_) => {
                log::debug!(target: "mm_var", "Unsupported variable function: {}", function);
                Err(EfiError::Unsupported)
            }
        };

        let status = encode_status(result);
        log::trace!(target: "mm_var", "Variable request complete: function={}, status=0x{:016X}", function, status);
        header_bytes[MmVarCommHeader::RETURN_STATUS_OFFSET..MM_VAR_COMM_HEADER_SIZE]
            .copy_from_slice(&status.to_ne_bytes());
    }

    fn get_variable(&mut self, payload: &mut [u8]) -> Result<()> {
        let access = validate_variable_access(payload, &mut self.payload_buffer, true)?;
        let name = self.payload_buffer.get(access.name.clone()).ok_or(EfiError::AccessDenied)?;
        let data = payload.get_mut(access.data.clone()).ok_or(EfiError::AccessDenied)?;

        let mut attributes = access.attributes;
        self.store.get_variable(&access.guid, name, &mut attributes, data)?;

        payload[ATTR_OFFSET..ATTR_OFFSET + core::mem::size_of::<u32>()].copy_from_slice(&attributes.to_ne_bytes());
        Ok(())
    }

    fn set_variable(&mut self, payload: &mut [u8]) -> Result<()> {
        let access = validate_variable_access(payload, &mut self.payload_buffer, false)?;
        let name = self.payload_buffer.get(access.name.clone()).ok_or(EfiError::AccessDenied)?;
        let data = self.payload_buffer.get(access.data.clone()).ok_or(EfiError::AccessDenied)?;

        self.store.set_variable(&access.guid, name, access.attributes, data)
    }

    fn get_payload_size(payload: &mut [u8]) -> Result<()> {
        let reply = MmVarCommGetPayloadSize { var_payload_size: MAX_PAYLOAD_SIZE as u64 };
        reply.write_to_prefix(payload).map_err(|_| {
            log::warn!(target: "mm_var", "Buffer too small for payload size reply: size={}", payload.len());
            EfiError::InvalidParameter
        })
    }
}

impl Default for MmVariableService {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for MmVariableService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "MmVariableService(payload_buffer: 0x{:X} bytes)", self.payload_buffer.len())
    }
}
