// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Brume Systems

//! Single-slot key cache
//!
//! Key RAM loads are a relatively expensive hardware transaction, and
//! link-layer traffic tends to run long bursts under one key. The cache
//! remembers the last key written to the pinned slot and skips the reload
//! when the requested key is byte-identical.

use crate::error::{SecError, SecResult};
use crate::traits::CipherHardware;
use crate::types::{KeySlot, LinkKey, KEY_LEN};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Cache of the key currently resident in the engine's key RAM slot
///
/// Constructed empty: the first request is always a miss. The record is
/// only committed after the hardware confirms the load, so a failed load
/// leaves the cache consistent with key RAM and the next identical
/// request retries the hardware.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyCache {
    key: [u8; KEY_LEN],
    #[zeroize(skip)]
    loaded: bool,
    #[zeroize(skip)]
    slot: KeySlot,
}

impl KeyCache {
    /// Create an empty cache pinned to the default key RAM area
    #[must_use]
    pub const fn new() -> Self {
        Self {
            key: [0u8; KEY_LEN],
            loaded: false,
            slot: KeySlot::DEFAULT,
        }
    }

    /// Make `key` resident in key RAM and return its slot
    ///
    /// Fast path: a byte-exact match against the cached record returns
    /// the slot without touching hardware. Miss: the key is loaded into
    /// the pinned slot and cached on success.
    ///
    /// # Errors
    ///
    /// Returns [`SecError`] if the hardware rejects the key load; the
    /// cache record is left untouched.
    pub fn ensure_loaded<H: CipherHardware>(
        &mut self,
        hw: &mut H,
        key: &LinkKey,
    ) -> SecResult<KeySlot> {
        if self.loaded && &self.key == key.as_bytes() {
            return Ok(self.slot);
        }

        hw.load_key(key.as_bytes(), self.slot).map_err(SecError::from)?;

        self.key.copy_from_slice(key.as_bytes());
        self.loaded = true;
        Ok(self.slot)
    }

    /// Forget the cached key
    ///
    /// Called after a peripheral re-reset, which wipes key RAM; the next
    /// request must reload regardless of which key it carries.
    pub fn invalidate(&mut self) {
        self.key.zeroize();
        self.loaded = false;
    }
}

impl Default for KeyCache {
    fn default() -> Self {
        Self::new()
    }
}
