//! MM Communicate Message Builder
//!
//! Builds and inspects MM communicate buffers the same way a less privileged caller would lay them out in shared
//! memory.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent

use patina_rpmi_mm::protocol::comm::{EfiMmCommunicateHeader, MM_COMM_HEADER_SIZE};
use patina_rpmi_mm::protocol::variable::{MmVarCommAccessVariable, MmVarCommHeader, MM_VAR_COMM_HEADER_SIZE};
use r_efi::efi;
use zerocopy::{FromBytes, IntoBytes};

/// Builds a communicate buffer addressed to `guid`.
pub fn comm_buffer(guid: &efi::Guid, body: &[u8]) -> Vec<u8> {
    let header = EfiMmCommunicateHeader { header_guid: *guid.as_bytes(), message_length: body.len() as u64 };
    let mut buffer = header.as_bytes().to_vec();
    buffer.extend_from_slice(body);
    buffer
}

/// Builds the body of a variable protocol message.
pub fn var_body(function: u64, payload: &[u8]) -> Vec<u8> {
    let mut body = MmVarCommHeader { function, return_status: 0 }.as_bytes().to_vec();
    body.extend_from_slice(payload);
    body
}

/// Builds an access payload with a null-terminated UCS-2 `name`.
pub fn access_payload(guid: &efi::Guid, name: &str, attributes: u32, data: &[u8]) -> Vec<u8> {
    let name: Vec<u8> = name.encode_utf16().chain(core::iter::once(0)).flat_map(|unit| unit.to_ne_bytes()).collect();
    let fixed = MmVarCommAccessVariable {
        guid: *guid.as_bytes(),
        datasize: data.len() as u64,
        namesize: name.len() as u64,
        attr: attributes,
    };
    let mut payload = fixed.as_bytes().to_vec();
    payload.extend_from_slice(&name);
    payload.extend_from_slice(data);
    payload
}

/// A parsed variable protocol reply.
#[derive(Debug)]
pub struct VarReply {
    pub function: u64,
    pub return_status: u64,
    pub payload: Vec<u8>,
}

/// Parses a variable protocol reply from a full communicate buffer.
pub fn parse_var_reply(buffer: &[u8]) -> VarReply {
    let body = &buffer[MM_COMM_HEADER_SIZE..];
    let (header, payload) = MmVarCommHeader::read_from_prefix(body).expect("reply has a variable header");
    assert!(body.len() >= MM_VAR_COMM_HEADER_SIZE);
    VarReply { function: header.function, return_status: header.return_status, payload: payload.to_vec() }
}
