//! MM Communicate Header GUIDs
//!
//! The well-known GUIDs that may appear in the header of an MM communication buffer and the router that maps a
//! header GUID to the handler identity responsible for the message.
//!
//! ## License
//!
//! Copyright (C) Microsoft Corporation.
//!
//! SPDX-License-Identifier: BSD-2-Clause-Patent
//!
use r_efi::efi;

/// Length of a GUID in bytes.
pub const GUID_LENGTH: usize = 16;

/// Handler identity of an MM communication buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MmHeaderGuid {
    /// No known handler. Also used for unsupported GUIDs.
    None,
    VarProtocol,
    VarPolicy,
    EndOfDxe,
    ReadyToBoot,
    ExitBootService,
}

impl MmHeaderGuid {
    /// Alias of [`MmHeaderGuid::None`] for GUIDs with no handler.
    pub const UNSUPPORTED: Self = Self::None;
}

/// MM Variable Protocol GUID
///
/// (`ED32D533-99E6-4209-9CC0-2D72CDD998A7`)
pub const MM_VARIABLE_PROTOCOL: efi::Guid =
    efi::Guid::from_fields(0xed32d533, 0x99e6, 0x4209, 0x9c, 0xc0, &[0x2d, 0x72, 0xcd, 0xd9, 0x98, 0xa7]);

/// Variable Policy Protocol GUID
///
/// (`DA1B0D11-D1A7-46C4-9DC9-F3714875C6EB`)
pub const VARIABLE_POLICY_PROTOCOL: efi::Guid =
    efi::Guid::from_fields(0xda1b0d11, 0xd1a7, 0x46c4, 0x9d, 0xc9, &[0xf3, 0x71, 0x48, 0x75, 0xc6, 0xeb]);

/// End of DXE event group GUID
///
/// (`02CE967A-DD7E-4FFC-9EE7-810CF0470880`)
pub const EVENT_GROUP_END_OF_DXE: efi::Guid =
    efi::Guid::from_fields(0x2ce967a, 0xdd7e, 0x4ffc, 0x9e, 0xe7, &[0x81, 0x0c, 0xf0, 0x47, 0x08, 0x80]);

/// Ready to Boot event group GUID
///
/// (`7CE88FB3-4BD7-4679-87A8-A8D8DEE50D2B`)
pub const EVENT_GROUP_READY_TO_BOOT: efi::Guid =
    efi::Guid::from_fields(0x7ce88fb3, 0x4bd7, 0x4679, 0x87, 0xa8, &[0xa8, 0xd8, 0xde, 0xe5, 0x0d, 0x2b]);

/// Exit Boot Services event group GUID
///
/// (`27ABF055-B1B8-4C26-8048-748F37BAA2DF`)
pub const EVENT_GROUP_EXIT_BOOT_SERVICES: efi::Guid =
    efi::Guid::from_fields(0x27abf055, 0xb1b8, 0x4c26, 0x80, 0x48, &[0x74, 0x8f, 0x37, 0xba, 0xa2, 0xdf]);

/// An entry of the header GUID lookup table.
#[derive(Debug, Clone, Copy)]
pub struct GuidRoute {
    pub name: MmHeaderGuid,
    pub guid: efi::Guid,
}

/// Header GUID lookup table. Index 0 is reserved for [`MmHeaderGuid::None`] and never matched.
pub const MM_GUID_ROUTES: [GuidRoute; 6] = [
    GuidRoute { name: MmHeaderGuid::None, guid: efi::Guid::from_fields(0, 0, 0, 0, 0, &[0; 6]) },
    GuidRoute { name: MmHeaderGuid::VarProtocol, guid: MM_VARIABLE_PROTOCOL },
    GuidRoute { name: MmHeaderGuid::VarPolicy, guid: VARIABLE_POLICY_PROTOCOL },
    GuidRoute { name: MmHeaderGuid::EndOfDxe, guid: EVENT_GROUP_END_OF_DXE },
    GuidRoute { name: MmHeaderGuid::ReadyToBoot, guid: EVENT_GROUP_READY_TO_BOOT },
    GuidRoute { name: MmHeaderGuid::ExitBootService, guid: EVENT_GROUP_EXIT_BOOT_SERVICES },
];

/// Classifies the GUID bytes of an MM communicate header.
///
/// Comparison is an exact byte match against every routed GUID. A slice that is not exactly
/// [`GUID_LENGTH`] bytes long, or that matches no entry, classifies as [`MmHeaderGuid::None`].
pub fn classify(guid_bytes: &[u8]) -> MmHeaderGuid {
    if guid_bytes.len() != GUID_LENGTH {
        return MmHeaderGuid::None;
    }

    MM_GUID_ROUTES
        .iter()
        .skip(1)
        .find(|route| route.guid.as_bytes().as_slice() == guid_bytes)
        .map_or(MmHeaderGuid::None, |route| route.name)
}
