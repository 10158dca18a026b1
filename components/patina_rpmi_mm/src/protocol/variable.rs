//! MM Variable Protocol Wire Formats
//!
//! The communication buffer for the MM variable protocol is laid out as:
//!
//! ```text
//! EfiMmCommunicateHeader | MmVarCommHeader | function specific payload
//! ```
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use zerocopy_derive::*;

/// Size of the MM variable communicate header, without the trailing payload.
pub const MM_VAR_COMM_HEADER_SIZE: usize = core::mem::size_of::<MmVarCommHeader>();

/// Max information size per MM variable request, including the variable communicate header.
pub const MAX_VARINFO_SIZE: usize = 1024;

/// Max payload size of a single MM variable request.
pub const MAX_PAYLOAD_SIZE: usize = MAX_VARINFO_SIZE - MM_VAR_COMM_HEADER_SIZE;

/// MM Variable Communicate Header
///
/// `function` is written by the caller and preserved. `return_status` is overwritten by the variable service with a
/// 64-bit EFI status code.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct MmVarCommHeader {
    pub function: u64,
    pub return_status: u64,
}

impl MmVarCommHeader {
    /// Byte offset of `return_status` in the header.
    pub const RETURN_STATUS_OFFSET: usize = core::mem::offset_of!(MmVarCommHeader, return_status);
}

/// Payload of `GET_VARIABLE` and `SET_VARIABLE`.
///
/// The fixed fields are followed by a null-terminated UCS-2 name of `namesize` bytes and then `datasize` bytes of
/// variable data.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct MmVarCommAccessVariable {
    pub guid: [u8; 16],
    pub datasize: u64,
    pub namesize: u64,
    pub attr: u32,
}

impl MmVarCommAccessVariable {
    /// Byte offset of the inline name, which is also the size of the fixed fields.
    pub const NAME_OFFSET: usize = core::mem::size_of::<MmVarCommAccessVariable>();
}

/// Payload of `GET_NEXT_VARIABLE_NAME`.
///
/// The fixed fields are followed by a UCS-2 name buffer of `namesize` bytes.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct MmVarCommGetNextVarName {
    pub guid: [u8; 16],
    /// Size of the returned name buffer.
    pub namesize: u64,
}

/// Reply of `GET_PAYLOAD_SIZE`.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct MmVarCommGetPayloadSize {
    pub var_payload_size: u64,
}

/// Variable Policy Communicate Header
///
/// Carried behind a communicate header addressed to the variable policy GUID.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C, packed)]
pub struct VarPolicyCommHeader {
    pub signature: u32,
    pub revision: u32,
    pub command: u32,
    pub result: u64,
}

/// MM Variable Protocol Function Codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u64)]
pub enum MmVarFunction {
    /// Payload is [`MmVarCommAccessVariable`].
    GetVariable = 1,
    /// Payload is [`MmVarCommGetNextVarName`].
    GetNextVariableName = 2,
    /// Payload is [`MmVarCommAccessVariable`].
    SetVariable = 3,
    QueryVariableInfo = 4,
    ReadyToBoot = 5,
    ExitBootService = 6,
    GetStatistics = 7,
    LockVariable = 8,
    VarCheckVariablePropertySet = 9,
    VarCheckVariablePropertyGet = 10,
    /// Payload is [`MmVarCommGetPayloadSize`].
    GetPayloadSize = 11,
    InitRuntimeVariableCacheContext = 12,
    SyncRuntimeCache = 13,
    GetRuntimeCacheInfo = 14,
}

impl TryFrom<u64> for MmVarFunction {
    type Error = u64;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Ok(match value {
            1 => Self::GetVariable,
            2 => Self::GetNextVariableName,
            3 => Self::SetVariable,
            4 => Self::QueryVariableInfo,
            5 => Self::ReadyToBoot,
            6 => Self::ExitBootService,
            7 => Self::GetStatistics,
            8 => Self::LockVariable,
            9 => Self::VarCheckVariablePropertySet,
            10 => Self::VarCheckVariablePropertyGet,
            11 => Self::GetPayloadSize,
            12 => Self::InitRuntimeVariableCacheContext,
            13 => Self::SyncRuntimeCache,
            14 => Self::GetRuntimeCacheInfo,
            other => return Err(other),
        })
    }
}
