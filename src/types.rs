// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Brume Systems

//! Common types for the link-layer security engine
//!
//! Sizes follow the link-layer security frame format of the surrounding
//! mesh stack: 128-bit keys, 13-byte CCM* nonces, MIC lengths of
//! 0/4/8/16 bytes, payload and header bounded at 255 bytes per frame.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Symmetric key length in bytes
pub const KEY_LEN: usize = 16;

/// AES block length in bytes
pub const BLOCK_LEN: usize = 16;

/// CCM* nonce length in bytes
pub const NONCE_LEN: usize = 13;

/// Largest MIC the engine produces or consumes
pub const MAX_MIC_LEN: usize = 16;

/// Per-frame payload bound of this profile
pub const MAX_PAYLOAD_LEN: usize = 255;

/// Per-frame associated-data bound of this profile
pub const MAX_AAD_LEN: usize = 255;

/// 128-bit link-layer key
///
/// Caller-owned; the engine only ever reads it. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct LinkKey([u8; KEY_LEN]);

impl LinkKey {
    /// Create a key from bytes
    #[must_use]
    pub const fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from slice
    ///
    /// Returns `None` if the slice is not exactly 16 bytes.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != KEY_LEN {
            return None;
        }
        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(slice);
        Some(Self(bytes))
    }

    /// Raw key bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }
}

/// Location in dedicated hardware key RAM
///
/// Distinct from general memory. The engine pins a single area
/// ([`KeySlot::DEFAULT`]) for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeySlot(u8);

impl KeySlot {
    /// The key area used by the single-slot cache policy
    pub const DEFAULT: Self = Self(0);

    /// Create a slot for a given key RAM area
    #[must_use]
    pub const fn new(area: u8) -> Self {
        Self(area)
    }

    /// Key RAM area index
    #[must_use]
    pub const fn area(self) -> u8 {
        self.0
    }
}

/// 13-byte CCM* nonce
///
/// Must be unique per (key, direction) pair. The engine does not enforce
/// uniqueness; that invariant belongs to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CcmNonce([u8; NONCE_LEN]);

impl CcmNonce {
    /// Create a nonce from bytes
    #[must_use]
    pub const fn new(bytes: [u8; NONCE_LEN]) -> Self {
        Self(bytes)
    }

    /// Create from slice
    ///
    /// Returns `None` if the slice is not exactly 13 bytes.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() != NONCE_LEN {
            return None;
        }
        let mut bytes = [0u8; NONCE_LEN];
        bytes.copy_from_slice(slice);
        Some(Self(bytes))
    }

    /// Raw nonce bytes
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; NONCE_LEN] {
        &self.0
    }
}

/// Authentication-tag (MIC) length
///
/// Determines both the tag appended on encryption and the tag consumed
/// and verified on decryption. [`MicLen::None`] is a valid configuration:
/// encryption-only CCM* with no authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MicLen {
    /// No MIC
    None = 0,
    /// 4-byte MIC
    Mic4 = 4,
    /// 8-byte MIC
    Mic8 = 8,
    /// 16-byte MIC
    Mic16 = 16,
}

impl MicLen {
    /// MIC size in bytes
    #[must_use]
    pub const fn bytes(self) -> usize {
        self as usize
    }

    /// Parse a MIC length from a byte count
    ///
    /// Returns `None` for sizes outside {0, 4, 8, 16}.
    #[must_use]
    pub const fn from_bytes(bytes: usize) -> Option<Self> {
        match bytes {
            0 => Some(Self::None),
            4 => Some(Self::Mic4),
            8 => Some(Self::Mic8),
            16 => Some(Self::Mic16),
            _ => None,
        }
    }
}

/// Parameters of one combined authenticate-and-encrypt operation
#[derive(Debug, Clone, Copy)]
pub struct CcmConfig {
    /// Whether the payload undergoes the confidentiality transform.
    /// False for all-AAD frames, which still carry a MIC.
    pub transform_payload: bool,
    /// Authentication-tag length
    pub mic: MicLen,
    /// Width of the length field in the CCM counter block, per the
    /// caller's frame format
    pub len_field: u8,
}
