// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Brume Systems

//! The link-layer security engine
//!
//! [`SecEngine`] owns the cipher accelerator and the key cache, both
//! exclusively held, process-wide resources, and implements the
//! [`CryptoEngine`] capability table on top of them. One logical thread
//! of control drives the engine; a multi-threaded host must wrap every
//! operation in a mutex to preserve the single-in-flight invariant.

use crate::cache::KeyCache;
use crate::error::{SecError, SecResult};
use crate::traits::{CipherHardware, CryptoEngine};
use crate::types::{CcmNonce, LinkKey, MicLen, BLOCK_LEN};
use crate::{ccm, modes};
use heapless::Vec;

/// Link-layer security engine over a cipher accelerator
pub struct SecEngine<H: CipherHardware> {
    hw: H,
    cache: KeyCache,
}

impl<H: CipherHardware> SecEngine<H> {
    /// Create an engine over `hw`
    ///
    /// The cache starts empty; [`CryptoEngine::init`] must run before any
    /// cipher operation.
    #[must_use]
    pub fn new(hw: H) -> Self {
        Self {
            hw,
            cache: KeyCache::new(),
        }
    }

    /// Borrow the hardware unit
    pub fn hardware(&self) -> &H {
        &self.hw
    }

    /// Mutably borrow the hardware unit
    ///
    /// For test hooks and bring-up code; must not be used while an
    /// operation is in flight.
    pub fn hardware_mut(&mut self) -> &mut H {
        &mut self.hw
    }
}

impl<H: CipherHardware> CryptoEngine for SecEngine<H> {
    fn init(&mut self) -> SecResult<()> {
        self.hw.enable().map_err(SecError::from)?;
        // The reset wiped key RAM; the cached record must not claim
        // otherwise.
        self.cache.invalidate();
        Ok(())
    }

    fn ccm_encrypt<const N: usize>(
        &mut self,
        aad: &[u8],
        message: &mut Vec<u8, N>,
        nonce: &CcmNonce,
        len_field: u8,
        key: &LinkKey,
        mic: MicLen,
    ) -> SecResult<()> {
        ccm::encrypt(&mut self.hw, &mut self.cache, aad, message, nonce, len_field, key, mic)
    }

    fn ccm_decrypt<const N: usize>(
        &mut self,
        aad: &[u8],
        message: &mut Vec<u8, N>,
        nonce: &CcmNonce,
        len_field: u8,
        key: &LinkKey,
        mic: MicLen,
    ) -> SecResult<()> {
        ccm::decrypt(&mut self.hw, &mut self.cache, aad, message, nonce, len_field, key, mic)
    }

    fn cbc_encrypt(
        &mut self,
        data: &mut [u8],
        iv: &[u8; BLOCK_LEN],
        key: &LinkKey,
    ) -> SecResult<()> {
        modes::cbc_encrypt(&mut self.hw, &mut self.cache, data, iv, key)
    }

    fn ctr_encrypt(
        &mut self,
        data: &mut [u8],
        counter: &[u8; BLOCK_LEN],
        key: &LinkKey,
    ) -> SecResult<()> {
        modes::ctr_encrypt(&mut self.hw, &mut self.cache, data, counter, key)
    }

    fn ecb_encrypt(&mut self, block: &mut [u8; BLOCK_LEN], key: &LinkKey) -> SecResult<()> {
        modes::ecb_encrypt(&mut self.hw, &mut self.cache, block, key)
    }
}
