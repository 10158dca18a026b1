//! In-memory Shared Memory Window
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent

use std::{cell::RefCell, rc::Rc};

use patina_rpmi_mm::error::{EfiError, Result};
use patina_rpmi_mm::service::SharedMemory;

use super::constants::{SHMEM_BASE, SHMEM_SIZE};

#[derive(Debug)]
struct Window {
    memory: Vec<u8>,
    reads: usize,
    writes: usize,
}

/// A shared memory window backed by a vector.
///
/// Clones share the backing memory so tests can inspect the window after handing it to the service group.
#[derive(Debug, Clone)]
pub struct FakeSharedMemory {
    window: Rc<RefCell<Window>>,
}

impl FakeSharedMemory {
    pub fn new() -> Self {
        Self { window: Rc::new(RefCell::new(Window { memory: vec![0u8; SHMEM_SIZE], reads: 0, writes: 0 })) }
    }

    /// Places `bytes` at `offset` in the window, as the less privileged caller would.
    pub fn place(&self, offset: u32, bytes: &[u8]) {
        let offset = offset as usize;
        self.window.borrow_mut().memory[offset..offset + bytes.len()].copy_from_slice(bytes);
    }

    pub fn fetch(&self, offset: u32, len: usize) -> Vec<u8> {
        let offset = offset as usize;
        self.window.borrow().memory[offset..offset + len].to_vec()
    }

    pub fn read_count(&self) -> usize {
        self.window.borrow().reads
    }

    pub fn write_count(&self) -> usize {
        self.window.borrow().writes
    }

    fn range(address: u64, len: usize) -> Result<std::ops::Range<usize>> {
        let start = address.checked_sub(SHMEM_BASE).ok_or(EfiError::InvalidParameter)?;
        let start = usize::try_from(start).map_err(|_| EfiError::InvalidParameter)?;
        let end = start.checked_add(len).ok_or(EfiError::InvalidParameter)?;
        if end > SHMEM_SIZE {
            return Err(EfiError::InvalidParameter);
        }
        Ok(start..end)
    }
}

impl SharedMemory for FakeSharedMemory {
    fn read_bytes(&self, address: u64, buffer: &mut [u8]) -> Result<()> {
        let range = Self::range(address, buffer.len())?;
        let mut window = self.window.borrow_mut();
        window.reads += 1;
        buffer.copy_from_slice(&window.memory[range]);
        Ok(())
    }

    fn write_bytes(&self, address: u64, data: &[u8]) -> Result<()> {
        let range = Self::range(address, data.len())?;
        let mut window = self.window.borrow_mut();
        window.writes += 1;
        window.memory[range].copy_from_slice(data);
        Ok(())
    }
}
