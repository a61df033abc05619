// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Brume Systems

//! Error types for the link-layer security engine
//!
//! Two layers of error exist on purpose. `HwError` lives at the hardware
//! seam and distinguishes rejection causes for the driver below us.
//! `SecError` is what the protocol layers above us see: a single opaque
//! rejection value. A forged frame and a faulted accelerator must be
//! indistinguishable to the caller, which treats every failure as
//! "drop this frame, trust no partial output".

use core::fmt;

/// Error type for the cipher accelerator interface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwError {
    /// Peripheral has not been reset and enabled
    NotEnabled,
    /// An operation is already in flight
    Busy,
    /// Parameter rejected by the hardware interface
    InvalidParameter,
    /// Key RAM write failed
    KeyWriteFailed,
    /// Authentication tag mismatch on decryption
    AuthFailed,
}

impl HwError {
    /// Get error code for debugging
    #[must_use]
    pub const fn code(&self) -> u16 {
        match self {
            Self::NotEnabled => 0x0201,
            Self::Busy => 0x0202,
            Self::InvalidParameter => 0x0203,
            Self::KeyWriteFailed => 0x0204,
            Self::AuthFailed => 0x0205,
        }
    }

    /// Get error description
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::NotEnabled => "peripheral not enabled",
            Self::Busy => "operation already in flight",
            Self::InvalidParameter => "parameter rejected",
            Self::KeyWriteFailed => "key RAM write failed",
            Self::AuthFailed => "authentication failed",
        }
    }
}

impl fmt::Display for HwError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[0x{:04X}] {}", self.code(), self.description())
    }
}

/// Result type for hardware operations
pub type HwResult<T> = Result<T, HwError>;

/// Opaque frame-rejection error returned by every engine operation
///
/// Carries no cause. Key-load rejection, start rejection, a non-success
/// completion status and a tag mismatch all collapse into this one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecError;

impl fmt::Display for SecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("frame rejected")
    }
}

impl From<HwError> for SecError {
    fn from(_: HwError) -> Self {
        Self
    }
}

/// Result type for engine operations
pub type SecResult<T> = Result<T, SecError>;
