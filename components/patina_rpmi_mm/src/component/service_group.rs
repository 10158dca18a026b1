//! RPMI Management Mode (MM) Service Group
//!
//! Implements the RPMI MM service group. A less privileged actor places an MM communicate buffer in the shared
//! memory window and sends a `COMMUNICATE` request carrying the offsets of the input and output data inside that
//! window. The service group copies the message into a private buffer, routes it on the header GUID, lets the
//! addressed handler update the private copy and writes the result back to the output offset.
//!
//! Shared memory is only touched through [`SharedMemory`]. Every size derived from the message is checked against
//! the private buffer before it is used.
//!
//! ## Logging
//!
//! Detailed logging is available for this component using the `rpmi_mm` log target.
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

use crate::component::variable_service::MmVariableService;
use crate::config::{pack_version, MmAttributes, MmServiceGroupConfig};
use crate::error::RpmiError;
use crate::protocol::comm::{EfiMmCommunicateHeader, MmCommRequest, MAX_MESSAGE_SIZE, MM_COMM_HEADER_SIZE};
use crate::protocol::guid::{classify, MmHeaderGuid, GUID_LENGTH};
use crate::service::shared_memory::SharedMemory;
use crate::service::variable_store::VariableStore;
use crate::transport::RpmiTransport;

/// RPMI service group identifier of the MM service group.
pub const RPMI_SRVGRP_MANAGEMENT_MODE: u16 = 0x000B;

/// RPMI specification major version implemented by this service group.
pub const RPMI_SPEC_VERSION_MAJOR: u32 = 1;
/// RPMI specification minor version implemented by this service group.
pub const RPMI_SPEC_VERSION_MINOR: u32 = 0;

/// Privilege level bit for M-mode.
pub const RPMI_PRIVILEGE_M_MODE_MASK: u32 = 1 << 1;

/// Number of service ids, including the reserved id 0.
pub const RPMI_MM_SRV_ID_MAX: u8 = 4;

/// Size of a `COMMUNICATE` response: status and length words.
const COMMUNICATE_RESPONSE_SIZE: usize = 2 * core::mem::size_of::<u32>();

/// RPMI MM Service Ids
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MmServiceId {
    EnableNotification = 1,
    GetAttributes = 2,
    Communicate = 3,
}

/// Handler invoked for an A2P (application processor to platform) request.
///
/// Returns the number of response bytes written.
pub type MmServiceHandler = fn(&mut MmServiceGroup, &RpmiTransport, Option<&[u8]>, &mut [u8]) -> Result<u16, RpmiError>;

/// A single entry of the service table.
#[derive(Clone, Copy)]
pub struct RpmiService {
    pub service_id: u8,
    /// Minimum request length in bytes. Requests that are present but shorter are rejected.
    pub min_a2p_request_datalen: u16,
    /// `None` if the service is declared but not implemented.
    pub process_a2p_request: Option<MmServiceHandler>,
}

impl Debug for RpmiService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RpmiService")
            .field("service_id", &self.service_id)
            .field("min_a2p_request_datalen", &self.min_a2p_request_datalen)
            .field("implemented", &self.process_a2p_request.is_some())
            .finish()
    }
}

/// Service table of the MM service group, ordered by service id.
pub static MM_SERVICES: [RpmiService; 3] = [
    RpmiService {
        service_id: MmServiceId::EnableNotification as u8,
        min_a2p_request_datalen: 0,
        process_a2p_request: None,
    },
    RpmiService {
        service_id: MmServiceId::GetAttributes as u8,
        min_a2p_request_datalen: 0,
        process_a2p_request: Some(MmServiceGroup::get_attributes as MmServiceHandler),
    },
    RpmiService {
        service_id: MmServiceId::Communicate as u8,
        min_a2p_request_datalen: 4,
        process_a2p_request: Some(MmServiceGroup::communicate as MmServiceHandler),
    },
];

/// Static description of the MM service group as registered with an RPMI context.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmServiceGroupInfo {
    pub name: &'static str,
    pub servicegroup_id: u16,
    pub servicegroup_version: u32,
    pub privilege_level_bitmap: u32,
    pub max_service_id: u8,
}

/// Registration info of the MM service group.
pub static MM_SERVICE_GROUP_INFO: MmServiceGroupInfo = MmServiceGroupInfo {
    name: "mm",
    servicegroup_id: RPMI_SRVGRP_MANAGEMENT_MODE,
    servicegroup_version: pack_version(RPMI_SPEC_VERSION_MAJOR, RPMI_SPEC_VERSION_MINOR),
    privilege_level_bitmap: RPMI_PRIVILEGE_M_MODE_MASK,
    max_service_id: RPMI_MM_SRV_ID_MAX,
};

/// RPMI MM Service Group
///
/// Owns the private message buffer and the variable service. Requests are processed one at a time.
pub struct MmServiceGroup {
    attributes: MmAttributes,
    shmem: Box<dyn SharedMemory>,
    message_buffer: Box<[u8]>,
    variable_service: MmVariableService,
}

impl MmServiceGroup {
    /// Creates a new MM service group with a [`NullVariableStore`](crate::service::NullVariableStore).
    pub fn new(config: MmServiceGroupConfig, shmem: Box<dyn SharedMemory>) -> Self {
        Self::from_parts(config, shmem, MmVariableService::default())
    }

    /// Creates a new MM service group forwarding validated variable requests to `store`.
    pub fn with_variable_store(
        config: MmServiceGroupConfig,
        shmem: Box<dyn SharedMemory>,
        store: Box<dyn VariableStore>,
    ) -> Self {
        Self::from_parts(config, shmem, MmVariableService::with_store(store))
    }

    fn from_parts(
        config: MmServiceGroupConfig,
        shmem: Box<dyn SharedMemory>,
        variable_service: MmVariableService,
    ) -> Self {
        let attributes = MmAttributes::from(config);
        log::info!(target: "rpmi_mm", "Creating MM service group: {:?}", attributes);

        Self { attributes, shmem, message_buffer: vec![0u8; MAX_MESSAGE_SIZE].into_boxed_slice(), variable_service }
    }

    /// Returns the registration info of the service group.
    pub fn info(&self) -> &'static MmServiceGroupInfo {
        &MM_SERVICE_GROUP_INFO
    }

    /// Returns the service table of the service group.
    pub fn services(&self) -> &'static [RpmiService] {
        &MM_SERVICES
    }

    /// Returns the attributes reported by `GET_ATTRIBUTES`.
    pub fn attributes(&self) -> &MmAttributes {
        &self.attributes
    }

    /// Dispatches an A2P request to the service identified by `service_id`.
    ///
    /// ## Errors
    ///
    /// - [`RpmiError::NotSupported`]: the id is unknown or the service has no handler.
    /// - [`RpmiError::InvalidParam`]: the request is present but shorter than the service minimum.
    /// - Any error returned by the handler itself.
    pub fn process_a2p_request(
        &mut self,
        service_id: u8,
        transport: &RpmiTransport,
        request: Option<&[u8]>,
        response: &mut [u8],
    ) -> Result<u16, RpmiError> {
        let Some(service) = MM_SERVICES.iter().find(|service| service.service_id == service_id) else {
            log::warn!(target: "rpmi_mm", "Unknown MM service id: {}", service_id);
            return Err(RpmiError::NotSupported);
        };

        if let Some(data) = request {
            if data.len() < usize::from(service.min_a2p_request_datalen) {
                log::warn!(
                    target: "rpmi_mm",
                    "Request too short for service {}: len={}, min={}",
                    service_id,
                    data.len(),
                    service.min_a2p_request_datalen
                );
                return Err(RpmiError::InvalidParam);
            }
        }

        let Some(handler) = service.process_a2p_request else {
            log::debug!(target: "rpmi_mm", "MM service {} is not implemented", service_id);
            return Err(RpmiError::NotSupported);
        };

        handler(self, transport, request, response)
    }

    /// `GET_ATTRIBUTES` handler.
    ///
    /// Writes `[status, version, shmem_addr_lo, shmem_addr_hi, shmem_size]` in transport byte order. If the response
    /// buffer cannot hold all five words only a [`RpmiError::NoData`] status word is written.
    pub fn get_attributes(
        &mut self,
        transport: &RpmiTransport,
        _request: Option<&[u8]>,
        response: &mut [u8],
    ) -> Result<u16, RpmiError> {
        let [version, shmem_addr_lo, shmem_addr_hi, shmem_size] = self.attributes.as_words();
        let words = [RpmiError::Success.as_word(), version, shmem_addr_lo, shmem_addr_hi, shmem_size];

        match transport.write_words(response, &words) {
            Some(len) => response_len(len),
            None => {
                log::warn!(target: "rpmi_mm", "Response buffer too small for attributes: len={}", response.len());
                write_response(transport, response, &[RpmiError::NoData.as_word()])
            }
        }
    }

    /// `COMMUNICATE` handler.
    ///
    /// The request is `[idata_off, idata_len, odata_off, odata_len]`, offsets relative to the shared memory base.
    /// Missing trailing words are treated as zero. The response is always `[status, bytes_written]`.
    ///
    /// A response buffer that cannot hold both words is rejected with [`RpmiError::InvalidParam`] before shared
    /// memory is accessed.
    pub fn communicate(
        &mut self,
        transport: &RpmiTransport,
        request: Option<&[u8]>,
        response: &mut [u8],
    ) -> Result<u16, RpmiError> {
        if response.len() < COMMUNICATE_RESPONSE_SIZE {
            log::error!(target: "rpmi_mm", "COMMUNICATE response buffer too small: len={}", response.len());
            return Err(RpmiError::InvalidParam);
        }

        let (status, length) = match request {
            None => {
                log::warn!(target: "rpmi_mm", "COMMUNICATE request without data");
                (RpmiError::NoData, 0)
            }
            Some(data) => {
                let request = MmCommRequest::decode(transport, data);
                log::debug!(target: "rpmi_mm", "COMMUNICATE: {:?}", request);
                match self.process_communicate(&request) {
                    Ok(length) => (RpmiError::Success, length),
                    Err(status) => (status, 0),
                }
            }
        };

        log::trace!(target: "rpmi_mm", "COMMUNICATE complete: status={:?}, length={}", status, length);
        write_response(transport, response, &[status.as_word(), length])
    }

    fn process_communicate(&mut self, request: &MmCommRequest) -> Result<u32, RpmiError> {
        let base = self.attributes.shmem_base();
        let source = base.checked_add(u64::from(request.idata_off)).ok_or_else(|| {
            log::warn!(target: "rpmi_mm", "Input address overflow: base=0x{:X}, offset=0x{:X}", base, request.idata_off);
            RpmiError::InvalidAddr
        })?;

        let message: &mut [u8] = &mut self.message_buffer;
        message.fill(0);

        self.shmem.read_bytes(source, &mut message[..MM_COMM_HEADER_SIZE]).map_err(|err| {
            log::error!(target: "rpmi_mm", "Failed to read communicate header at 0x{:X}: {:?}", source, err);
            RpmiError::InvalidAddr
        })?;

        let header = EfiMmCommunicateHeader::read(message).ok_or(RpmiError::InvalidParam)?;
        let message_length = header.message_length;
        let total = header.total_size().filter(|total| *total <= message.len()).ok_or_else(|| {
            log::warn!(target: "rpmi_mm", "Communicate message too large: message_length=0x{:X}", message_length);
            RpmiError::InvalidParam
        })?;

        // The length used from here on comes from the first read only.
        self.shmem.read_bytes(source, &mut message[..total]).map_err(|err| {
            log::error!(target: "rpmi_mm", "Failed to read communicate message at 0x{:X}: {:?}", source, err);
            RpmiError::InvalidAddr
        })?;

        match classify(&message[..GUID_LENGTH]) {
            MmHeaderGuid::VarProtocol => {
                self.variable_service.handle(&mut message[MM_COMM_HEADER_SIZE..total]);
            }
            MmHeaderGuid::VarPolicy => {
                log::debug!(target: "rpmi_mm", "Variable policy message accepted without processing");
                return Ok(0);
            }
            route @ (MmHeaderGuid::None
            | MmHeaderGuid::EndOfDxe
            | MmHeaderGuid::ReadyToBoot
            | MmHeaderGuid::ExitBootService) => {
                log::debug!(target: "rpmi_mm", "No MM handler for message route {:?}", route);
                return Err(RpmiError::NoData);
            }
        }

        let written = total.min(request.odata_len as usize);
        if written == 0 {
            return Ok(0);
        }

        let dest = base.checked_add(u64::from(request.odata_off)).ok_or_else(|| {
            log::warn!(target: "rpmi_mm", "Output address overflow: base=0x{:X}, offset=0x{:X}", base, request.odata_off);
            RpmiError::InvalidAddr
        })?;

        self.shmem.write_bytes(dest, &message[..written]).map_err(|err| {
            log::error!(target: "rpmi_mm", "Failed to write communicate message to 0x{:X}: {:?}", dest, err);
            RpmiError::InvalidAddr
        })?;

        u32::try_from(written).map_err(|_| RpmiError::BadRange)
    }
}

fn response_len(len: usize) -> Result<u16, RpmiError> {
    u16::try_from(len).map_err(|_| RpmiError::BadRange)
}

fn write_response(transport: &RpmiTransport, response: &mut [u8], words: &[u32]) -> Result<u16, RpmiError> {
    match transport.write_words(response, words) {
        Some(len) => response_len(len),
        None => {
            log::error!(target: "rpmi_mm", "Response buffer too small: len={}, words={}", response.len(), words.len());
            Err(RpmiError::InvalidParam)
        }
    }
}

impl Debug for MmServiceGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "MmServiceGroup {{")?;
        writeln!(f, "  attributes: {:?}", self.attributes)?;
        writeln!(f, "  message_buffer: 0x{:X} bytes", self.message_buffer.len())?;
        writeln!(f, "  variable_service: {:?}", self.variable_service)?;
        write!(f, "}}")
    }
}
