//! Shared helpers for unit tests.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use std::{cell::RefCell, rc::Rc, vec::Vec};

use crate::error::{EfiError, Result};
use crate::protocol::comm::EfiMmCommunicateHeader;
use crate::protocol::variable::{MmVarCommAccessVariable, MmVarCommHeader};
use crate::service::shared_memory::SharedMemory;
use r_efi::efi;
use zerocopy::IntoBytes;

pub(crate) const TEST_VARIABLE_GUID: efi::Guid =
    efi::Guid::from_fields(0x8be4df61, 0x93ca, 0x11d2, 0xaa, 0x0d, &[0x00, 0xe0, 0x98, 0x03, 0x2b, 0x8c]);

pub(crate) const TEST_ATTRIBUTES: u32 = 0x7;

/// Encodes `name` as UCS-2 code units with a null terminator.
pub(crate) fn utf16_name(name: &str) -> Vec<u16> {
    name.encode_utf16().chain(core::iter::once(0)).collect()
}

pub(crate) fn utf16_bytes(units: &[u16]) -> Vec<u8> {
    units.iter().flat_map(|unit| unit.to_ne_bytes()).collect()
}

/// Builds a `GET_VARIABLE`/`SET_VARIABLE` payload with consistent sizes.
pub(crate) fn access_payload(guid: &efi::Guid, name: &[u16], data: &[u8]) -> Vec<u8> {
    let name = utf16_bytes(name);
    let fixed = MmVarCommAccessVariable {
        guid: *guid.as_bytes(),
        datasize: data.len() as u64,
        namesize: name.len() as u64,
        attr: TEST_ATTRIBUTES,
    };
    let mut payload = fixed.as_bytes().to_vec();
    payload.extend_from_slice(&name);
    payload.extend_from_slice(data);
    payload
}

/// Overwrites the declared sizes of an access payload.
pub(crate) fn set_access_sizes(payload: &mut [u8], datasize: u64, namesize: u64) {
    payload[16..24].copy_from_slice(&datasize.to_ne_bytes());
    payload[24..32].copy_from_slice(&namesize.to_ne_bytes());
}

/// Builds a variable protocol message: variable header followed by `payload`.
pub(crate) fn var_message(function: u64, payload: &[u8]) -> Vec<u8> {
    let header = MmVarCommHeader { function, return_status: 0 };
    let mut message = header.as_bytes().to_vec();
    message.extend_from_slice(payload);
    message
}

/// Builds a full communicate buffer addressed to `guid` carrying `body`.
pub(crate) fn comm_message(guid: &efi::Guid, body: &[u8]) -> Vec<u8> {
    let header = EfiMmCommunicateHeader { header_guid: *guid.as_bytes(), message_length: body.len() as u64 };
    let mut message = header.as_bytes().to_vec();
    message.extend_from_slice(body);
    message
}

#[derive(Debug)]
struct Window {
    base: u64,
    memory: Vec<u8>,
    writes: Vec<(u64, usize)>,
}

/// An in-memory shared memory window.
///
/// Clones share the same backing memory so a test can keep a handle after moving one into the service group.
#[derive(Debug, Clone)]
pub(crate) struct TestSharedMemory {
    window: Rc<RefCell<Window>>,
}

impl TestSharedMemory {
    pub(crate) fn new(base: u64, size: usize) -> Self {
        Self { window: Rc::new(RefCell::new(Window { base, memory: std::vec![0u8; size], writes: Vec::new() })) }
    }

    pub(crate) fn load(&self, offset: usize, bytes: &[u8]) {
        self.window.borrow_mut().memory[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub(crate) fn bytes(&self, offset: usize, len: usize) -> Vec<u8> {
        self.window.borrow().memory[offset..offset + len].to_vec()
    }

    /// Returns every write as `(address, length)`.
    pub(crate) fn writes(&self) -> Vec<(u64, usize)> {
        self.window.borrow().writes.clone()
    }

    fn range(window: &Window, address: u64, len: usize) -> Result<core::ops::Range<usize>> {
        let start = address.checked_sub(window.base).ok_or(EfiError::InvalidParameter)? as usize;
        let end = start.checked_add(len).ok_or(EfiError::InvalidParameter)?;
        if end > window.memory.len() {
            return Err(EfiError::InvalidParameter);
        }
        Ok(start..end)
    }
}

impl SharedMemory for TestSharedMemory {
    fn read_bytes(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        let window = self.window.borrow();
        let range = Self::range(&window, address, buffer.len())?;
        buffer.copy_from_slice(&window.memory[range]);
        Ok(())
    }

    fn write_bytes(&self, address: u64, data: &[u8]) -> Result<()> {
        let mut window = self.window.borrow_mut();
        let range = Self::range(&window, address, data.len())?;
        window.memory[range].copy_from_slice(data);
        window.writes.push((address, data.len()));
        Ok(())
    }
}
