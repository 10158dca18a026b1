//! MM Communication Wire Formats
//!
//! Packed binary layouts exchanged through the MM shared memory window and the RPMI request payload.
//!
//! Every structure here is decoded from untrusted bytes. Decoding is always performed with bounds-checked
//! `zerocopy` reads from a local copy of the data; a pointer is never cast over shared memory.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
pub mod comm;
pub mod guid;
pub mod variable;

pub use comm::{EfiMmCommunicateHeader, MmCommRequest, MAX_MESSAGE_SIZE, MM_COMM_HEADER_SIZE};
pub use guid::{classify, MmHeaderGuid};
pub use variable::{
    MmVarCommAccessVariable, MmVarCommGetNextVarName, MmVarCommGetPayloadSize, MmVarCommHeader, MmVarFunction,
    VarPolicyCommHeader, MAX_PAYLOAD_SIZE, MAX_VARINFO_SIZE, MM_VAR_COMM_HEADER_SIZE,
};
