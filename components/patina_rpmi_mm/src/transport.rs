//! RPMI Transport Byte Order
//!
//! RPMI request and response payloads are sequences of 32-bit words whose byte order is a property of the
//! transport. This module converts between native values and transport-ordered words.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!

/// Byte order used by an RPMI transport.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// The subset of an RPMI transport needed by service handlers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RpmiTransport {
    pub endianness: Endianness,
}

impl RpmiTransport {
    pub const fn new(endianness: Endianness) -> Self {
        Self { endianness }
    }

    /// Encodes a 32-bit value in the transport byte order.
    pub const fn to_xe32(&self, value: u32) -> [u8; 4] {
        match self.endianness {
            Endianness::Little => value.to_le_bytes(),
            Endianness::Big => value.to_be_bytes(),
        }
    }

    /// Decodes a 32-bit value from the transport byte order.
    pub const fn from_xe32(&self, bytes: [u8; 4]) -> u32 {
        match self.endianness {
            Endianness::Little => u32::from_le_bytes(bytes),
            Endianness::Big => u32::from_be_bytes(bytes),
        }
    }

    /// Reads the 32-bit word at `index` from `data`.
    ///
    /// Returns `None` if the word is not fully contained in `data`.
    pub fn read_word(&self, data: &[u8], index: usize) -> Option<u32> {
        let start = index.checked_mul(4)?;
        let bytes: [u8; 4] = data.get(start..start.checked_add(4)?)?.try_into().ok()?;
        Some(self.from_xe32(bytes))
    }

    /// Writes `words` to the start of `buffer` in the transport byte order.
    ///
    /// Returns the number of bytes written, or `None` if `buffer` cannot hold every word.
    pub fn write_words(&self, buffer: &mut [u8], words: &[u32]) -> Option<usize> {
        let len = words.len().checked_mul(4)?;
        let dest = buffer.get_mut(..len)?;
        for (chunk, word) in dest.chunks_exact_mut(4).zip(words) {
            chunk.copy_from_slice(&self.to_xe32(*word));
        }
        Some(len)
    }
}
