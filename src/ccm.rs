// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Brume Systems

//! CCM* authenticated encryption over the cipher accelerator
//!
//! Counter-mode encryption of the payload combined with a CBC-based MAC
//! over (associated data ‖ payload), producing a truncated tag carried at
//! the frame tail. The hardware performs the whole combined operation;
//! this module gets the nonce, tag-length and length bookkeeping exactly
//! right, because any deviation silently breaks interoperability.

use crate::cache::KeyCache;
use crate::completion;
use crate::error::{SecError, SecResult};
use crate::traits::CipherHardware;
use crate::types::{CcmConfig, CcmNonce, LinkKey, MicLen, MAX_MIC_LEN};
use heapless::Vec;

/// Authenticate and encrypt `message` in place, appending the tag.
pub(crate) fn encrypt<H: CipherHardware, const N: usize>(
    hw: &mut H,
    cache: &mut KeyCache,
    aad: &[u8],
    message: &mut Vec<u8, N>,
    nonce: &CcmNonce,
    len_field: u8,
    key: &LinkKey,
    mic: MicLen,
) -> SecResult<()> {
    let mic_len = mic.bytes();

    // Checked before any hardware interaction so a failure leaves no
    // partial result in the buffer.
    if message.capacity() - message.len() < mic_len {
        return Err(SecError);
    }

    let cfg = CcmConfig {
        // An all-AAD frame still computes a tag but performs no
        // confidentiality transform.
        transform_payload: !message.is_empty(),
        mic,
        len_field,
    };

    let slot = cache.ensure_loaded(hw, key)?;

    let mut tag = [0u8; MAX_MIC_LEN];
    completion::run(
        hw,
        message,
        |hw, io| hw.ccm_encrypt_start(&cfg, slot, nonce, aad, io),
        |hw, io| hw.ccm_encrypt_result(io, &mut tag[..mic_len]),
    )?;

    message
        .extend_from_slice(&tag[..mic_len])
        .map_err(|()| SecError)?;
    Ok(())
}

/// Verify and decrypt `message` in place, stripping the tag.
pub(crate) fn decrypt<H: CipherHardware, const N: usize>(
    hw: &mut H,
    cache: &mut KeyCache,
    aad: &[u8],
    message: &mut Vec<u8, N>,
    nonce: &CcmNonce,
    len_field: u8,
    key: &LinkKey,
    mic: MicLen,
) -> SecResult<()> {
    let mic_len = mic.bytes();
    let payload_len = message.len().checked_sub(mic_len).ok_or(SecError)?;

    let cfg = CcmConfig {
        transform_payload: payload_len > 0,
        mic,
        len_field,
    };

    let slot = cache.ensure_loaded(hw, key)?;

    // The expected tag is lifted into scratch before the operation
    // starts; the tail of the buffer cannot be assumed stable during
    // in-place decryption.
    let mut expected = [0u8; MAX_MIC_LEN];
    expected[..mic_len].copy_from_slice(&message[payload_len..]);

    completion::run(
        hw,
        message,
        |hw, io| hw.ccm_decrypt_start(&cfg, slot, nonce, aad, &io[..payload_len], &expected[..mic_len]),
        |hw, io| hw.ccm_decrypt_result(&mut io[..payload_len]),
    )?;

    message.truncate(payload_len);
    Ok(())
}
