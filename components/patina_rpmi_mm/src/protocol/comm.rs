//! MM Communicate Header and RPMI Communicate Request
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use crate::transport::RpmiTransport;
use zerocopy::FromBytes;
use zerocopy_derive::*;

/// Size of the local message buffer, and therefore the largest communicate message that can be processed.
pub const MAX_MESSAGE_SIZE: usize = 0x4000;

/// Size of the MM communicate header, without the trailing message.
pub const MM_COMM_HEADER_SIZE: usize = core::mem::size_of::<EfiMmCommunicateHeader>();

/// UEFI MM Communicate Header
///
/// A standard header that must be present at the beginning of any MM communication buffer.
///
/// ## Notes
///
/// - The GUID is kept as raw bytes. Routing compares bytes, never numeric fields.
/// - `message_length` does not include the size of the header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct EfiMmCommunicateHeader {
    /// Allows for disambiguation of the message format.
    pub header_guid: [u8; 16],
    /// The size of the message (in bytes) following the header.
    pub message_length: u64,
}

impl EfiMmCommunicateHeader {
    /// Reads a header from the start of `bytes`.
    pub fn read(bytes: &[u8]) -> Option<Self> {
        Self::read_from_prefix(bytes).ok().map(|(header, _)| header)
    }

    /// Returns the total size of the communicate buffer described by this header.
    ///
    /// `None` if the total cannot be represented.
    pub fn total_size(&self) -> Option<usize> {
        let message_length = usize::try_from(self.message_length).ok()?;
        MM_COMM_HEADER_SIZE.checked_add(message_length)
    }
}

/// RPMI MM Communicate Request
///
/// The addressing descriptor carried in the payload of an RPMI `MM_COMMUNICATE` request. Offsets are relative to
/// the base of the MM shared memory window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MmCommRequest {
    pub idata_off: u32,
    pub idata_len: u32,
    pub odata_off: u32,
    pub odata_len: u32,
}

impl MmCommRequest {
    /// Number of 32-bit words in a complete request.
    pub const WORDS: usize = 4;

    /// Decodes a request from transport-ordered words.
    ///
    /// Words missing from a short request decode as zero.
    pub fn decode(transport: &RpmiTransport, data: &[u8]) -> Self {
        let word = |index| transport.read_word(data, index).unwrap_or(0);
        Self { idata_off: word(0), idata_len: word(1), odata_off: word(2), odata_len: word(3) }
    }

    /// Encodes the request as transport-ordered words.
    pub fn encode(&self, transport: &RpmiTransport) -> [u8; Self::WORDS * 4] {
        let mut bytes = [0u8; Self::WORDS * 4];
        for (chunk, word) in
            bytes.chunks_exact_mut(4).zip([self.idata_off, self.idata_len, self.odata_off, self.odata_len])
        {
            chunk.copy_from_slice(&transport.to_xe32(word));
        }
        bytes
    }
}
