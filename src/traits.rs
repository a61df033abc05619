// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Brume Systems

//! Interface definitions for the link-layer security engine
//!
//! [`CipherHardware`] is the downstream seam: the block-cipher
//! accelerator as this engine consumes it. A register-level driver
//! implements it on target; the `sim` module implements it in software
//! for host builds and tests.
//!
//! [`CryptoEngine`] is the upstream seam: the fixed capability table the
//! protocol layers call, so they stay hardware-agnostic.

use crate::error::{HwResult, SecResult};
use crate::types::{CcmConfig, CcmNonce, KeySlot, LinkKey, MicLen, BLOCK_LEN, KEY_LEN};
use heapless::Vec;

/// Block-cipher accelerator capability
///
/// The accelerator runs asynchronously relative to the CPU. Every
/// operation follows the same shape: a `*_start` call hands it the
/// parameters and returns immediately, the caller spins on
/// [`poll_ready`](Self::poll_ready), and a `*_result` call fetches the
/// outcome. The hardware serializes operations and never reorders
/// completions; exactly one operation may be in flight.
pub trait CipherHardware {
    /// Reset and enable the cipher peripheral
    ///
    /// # Errors
    ///
    /// Returns [`HwError`](crate::error::HwError) if the peripheral
    /// cannot be brought up.
    fn enable(&mut self) -> HwResult<()>;

    /// Load a key into the given key RAM area
    ///
    /// # Errors
    ///
    /// Returns `HwError::KeyWriteFailed` if the key RAM rejects the write.
    fn load_key(&mut self, key: &[u8; KEY_LEN], slot: KeySlot) -> HwResult<()>;

    /// Begin a combined authenticate-and-encrypt operation
    ///
    /// `payload` is read now; the ciphertext and tag are fetched through
    /// [`ccm_encrypt_result`](Self::ccm_encrypt_result).
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected; no polling is
    /// required after a rejected start.
    fn ccm_encrypt_start(
        &mut self,
        cfg: &CcmConfig,
        slot: KeySlot,
        nonce: &CcmNonce,
        aad: &[u8],
        payload: &[u8],
    ) -> HwResult<()>;

    /// Begin a combined verify-and-decrypt operation
    ///
    /// `expected_tag` is the tag stripped from the frame tail, already
    /// copied out of the message buffer by the engine.
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    fn ccm_decrypt_start(
        &mut self,
        cfg: &CcmConfig,
        slot: KeySlot,
        nonce: &CcmNonce,
        aad: &[u8],
        payload: &[u8],
        expected_tag: &[u8],
    ) -> HwResult<()>;

    /// Begin a single-block ECB encryption
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    fn ecb_encrypt_start(&mut self, slot: KeySlot, block: &[u8; BLOCK_LEN]) -> HwResult<()>;

    /// Begin a CBC encryption over `data`
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    fn cbc_encrypt_start(&mut self, slot: KeySlot, iv: &[u8; BLOCK_LEN], data: &[u8])
        -> HwResult<()>;

    /// Begin a CTR encryption over `data`
    ///
    /// # Errors
    ///
    /// Returns an error if the request is rejected.
    fn ctr_encrypt_start(
        &mut self,
        slot: KeySlot,
        counter: &[u8; BLOCK_LEN],
        data: &[u8],
    ) -> HwResult<()>;

    /// Completion flag for the operation in flight
    fn poll_ready(&mut self) -> bool;

    /// Fetch the outcome of a completed authenticate-and-encrypt
    ///
    /// Writes the ciphertext into `payload` and the truncated tag into
    /// `tag`, whose length selects the truncation.
    ///
    /// # Errors
    ///
    /// Returns an error on a non-success completion status.
    fn ccm_encrypt_result(&mut self, payload: &mut [u8], tag: &mut [u8]) -> HwResult<()>;

    /// Fetch the outcome of a completed verify-and-decrypt
    ///
    /// Writes the recovered plaintext into `payload`.
    ///
    /// # Errors
    ///
    /// Returns `HwError::AuthFailed` when the recomputed tag does not
    /// match the supplied one, or another error on a cipher-level fault.
    fn ccm_decrypt_result(&mut self, payload: &mut [u8]) -> HwResult<()>;

    /// Fetch the outcome of a completed ECB/CBC/CTR operation
    ///
    /// # Errors
    ///
    /// Returns an error on a non-success completion status.
    fn cipher_result(&mut self, out: &mut [u8]) -> HwResult<()>;
}

/// The engine capability table exposed to protocol layers
///
/// Exactly five operations plus `init`. Buffers are mutated in place;
/// each call is synchronous and returns a binary accept/reject result.
pub trait CryptoEngine {
    /// Reset and enable the cipher peripheral
    ///
    /// Must be called once before any other operation. Calling it again
    /// re-resets the peripheral and invalidates the cached key, so the
    /// next operation reloads key RAM.
    ///
    /// # Errors
    ///
    /// Returns [`SecError`](crate::error::SecError) if bring-up fails.
    fn init(&mut self) -> SecResult<()>;

    /// CCM* authenticated encryption, in place
    ///
    /// On success the tag is appended and `message` grows by
    /// `mic.bytes()`. `message` must have capacity for the tag; an
    /// all-AAD frame (`message` empty) is authentication-only.
    ///
    /// # Errors
    ///
    /// Returns [`SecError`](crate::error::SecError) on any rejection;
    /// `message` is unchanged on failure.
    fn ccm_encrypt<const N: usize>(
        &mut self,
        aad: &[u8],
        message: &mut Vec<u8, N>,
        nonce: &CcmNonce,
        len_field: u8,
        key: &LinkKey,
        mic: MicLen,
    ) -> SecResult<()>;

    /// CCM* verify-and-decrypt, in place
    ///
    /// `message` holds ciphertext followed by the tag. On success the tag
    /// is stripped and `message` shrinks by `mic.bytes()`, exposing only
    /// the verified plaintext.
    ///
    /// # Errors
    ///
    /// Returns [`SecError`](crate::error::SecError) on any rejection.
    /// A forged frame and a hardware fault are indistinguishable.
    fn ccm_decrypt<const N: usize>(
        &mut self,
        aad: &[u8],
        message: &mut Vec<u8, N>,
        nonce: &CcmNonce,
        len_field: u8,
        key: &LinkKey,
        mic: MicLen,
    ) -> SecResult<()>;

    /// AES-CBC encryption of `data` in place
    ///
    /// # Errors
    ///
    /// Returns [`SecError`](crate::error::SecError) on any rejection.
    fn cbc_encrypt(&mut self, data: &mut [u8], iv: &[u8; BLOCK_LEN], key: &LinkKey)
        -> SecResult<()>;

    /// AES-CTR encryption of `data` in place
    ///
    /// # Errors
    ///
    /// Returns [`SecError`](crate::error::SecError) on any rejection.
    fn ctr_encrypt(
        &mut self,
        data: &mut [u8],
        counter: &[u8; BLOCK_LEN],
        key: &LinkKey,
    ) -> SecResult<()>;

    /// Stand-alone AES encryption of a single block, in place
    ///
    /// # Errors
    ///
    /// Returns [`SecError`](crate::error::SecError) on any rejection.
    fn ecb_encrypt(&mut self, block: &mut [u8; BLOCK_LEN], key: &LinkKey) -> SecResult<()>;
}
