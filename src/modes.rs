// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Brume Systems

//! Single-direction ECB, CBC and CTR modes
//!
//! Each mode is the same thin sequence: make the key resident, start the
//! mode-specific operation, run the completion protocol, write the result
//! back in place. Chaining and keystream generation belong to the
//! hardware; length constraints are whatever the hardware interface
//! enforces.

use crate::cache::KeyCache;
use crate::completion;
use crate::error::SecResult;
use crate::traits::CipherHardware;
use crate::types::{LinkKey, BLOCK_LEN};

/// Encrypt one block in place with the raw cipher.
pub(crate) fn ecb_encrypt<H: CipherHardware>(
    hw: &mut H,
    cache: &mut KeyCache,
    block: &mut [u8; BLOCK_LEN],
    key: &LinkKey,
) -> SecResult<()> {
    let slot = cache.ensure_loaded(hw, key)?;
    completion::run(
        hw,
        block,
        |hw, io| hw.ecb_encrypt_start(slot, io),
        |hw, io| hw.cipher_result(io),
    )
}

/// CBC-encrypt `data` in place.
pub(crate) fn cbc_encrypt<H: CipherHardware>(
    hw: &mut H,
    cache: &mut KeyCache,
    data: &mut [u8],
    iv: &[u8; BLOCK_LEN],
    key: &LinkKey,
) -> SecResult<()> {
    let slot = cache.ensure_loaded(hw, key)?;
    completion::run(
        hw,
        data,
        |hw, io| hw.cbc_encrypt_start(slot, iv, io),
        |hw, io| hw.cipher_result(io),
    )
}

/// CTR-encrypt `data` in place.
pub(crate) fn ctr_encrypt<H: CipherHardware>(
    hw: &mut H,
    cache: &mut KeyCache,
    data: &mut [u8],
    counter: &[u8; BLOCK_LEN],
    key: &LinkKey,
) -> SecResult<()> {
    let slot = cache.ensure_loaded(hw, key)?;
    completion::run(
        hw,
        data,
        |hw, io| hw.ctr_encrypt_start(slot, counter, io),
        |hw, io| hw.cipher_result(io),
    )
}
