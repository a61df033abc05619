// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Brume Systems

//! Software model of the cipher accelerator
//!
//! Host builds and tests have no key RAM or AES peripheral, so this
//! module implements [`CipherHardware`] in software over the RustCrypto
//! `aes` block cipher. It mirrors the accelerator's observable behavior:
//! one operation in flight, a completion flag that goes ready after a
//! configurable number of polls, per-area key RAM, and the CCM* profile
//! of the link layer (13-byte nonce, 2-byte length field).
//!
//! Test hooks: [`key_loads`](SimCipherUnit::key_loads) counts successful
//! key RAM writes, [`fail_next_key_load`](SimCipherUnit::fail_next_key_load)
//! and [`fail_next_start`](SimCipherUnit::fail_next_start) inject
//! rejections, [`set_latency`](SimCipherUnit::set_latency) tunes how many
//! polls an operation stays busy.

use crate::error::{HwError, HwResult};
use crate::traits::CipherHardware;
use crate::types::{
    CcmConfig, CcmNonce, KeySlot, BLOCK_LEN, KEY_LEN, MAX_AAD_LEN, MAX_MIC_LEN, MAX_PAYLOAD_LEN,
    NONCE_LEN,
};
use aes::cipher::{BlockEncrypt, KeyInit};
use aes::{Aes128, Block};
use heapless::Vec;

/// Number of key RAM areas the modeled accelerator provides
pub const KEY_SLOTS: usize = 8;

/// Polls an operation stays busy before the flag goes ready
const DEFAULT_LATENCY: u8 = 2;

/// Length-field width of this link-layer profile
const LEN_FIELD: u8 = 2;

enum Pending {
    Ccm {
        payload: Vec<u8, MAX_PAYLOAD_LEN>,
        tag: [u8; MAX_MIC_LEN],
        mic_len: usize,
        auth_ok: bool,
    },
    Cipher {
        out: Vec<u8, MAX_PAYLOAD_LEN>,
    },
}

/// Simulated cipher accelerator
pub struct SimCipherUnit {
    enabled: bool,
    key_ram: [Option<[u8; KEY_LEN]>; KEY_SLOTS],
    pending: Option<Pending>,
    polls_left: u8,
    latency: u8,
    key_loads: usize,
    fail_next_key_load: bool,
    fail_next_start: bool,
}

impl SimCipherUnit {
    /// Create a unit in the powered-down state
    #[must_use]
    pub const fn new() -> Self {
        Self {
            enabled: false,
            key_ram: [None; KEY_SLOTS],
            pending: None,
            polls_left: 0,
            latency: DEFAULT_LATENCY,
            key_loads: 0,
            fail_next_key_load: false,
            fail_next_start: false,
        }
    }

    /// Number of successful key RAM writes so far
    #[must_use]
    pub const fn key_loads(&self) -> usize {
        self.key_loads
    }

    /// Set how many polls an operation stays busy
    pub fn set_latency(&mut self, polls: u8) {
        self.latency = polls;
    }

    /// Reject the next key RAM write
    pub fn fail_next_key_load(&mut self) {
        self.fail_next_key_load = true;
    }

    /// Reject the next operation start
    pub fn fail_next_start(&mut self) {
        self.fail_next_start = true;
    }

    fn cipher_for(&self, slot: KeySlot) -> HwResult<Aes128> {
        let key = self
            .key_ram
            .get(slot.area() as usize)
            .copied()
            .flatten()
            .ok_or(HwError::InvalidParameter)?;
        Aes128::new_from_slice(&key).map_err(|_| HwError::InvalidParameter)
    }

    fn check_start(&mut self) -> HwResult<()> {
        if !self.enabled {
            return Err(HwError::NotEnabled);
        }
        if self.pending.is_some() {
            return Err(HwError::Busy);
        }
        if self.fail_next_start {
            self.fail_next_start = false;
            return Err(HwError::Busy);
        }
        Ok(())
    }

    fn check_ccm_params(cfg: &CcmConfig, aad: &[u8], payload: &[u8]) -> HwResult<()> {
        if cfg.len_field != LEN_FIELD {
            return Err(HwError::InvalidParameter);
        }
        if aad.len() > MAX_AAD_LEN || payload.len() > MAX_PAYLOAD_LEN {
            return Err(HwError::InvalidParameter);
        }
        Ok(())
    }

    fn commit(&mut self, op: Pending) {
        self.pending = Some(op);
        self.polls_left = self.latency;
    }

    fn take_ccm(&mut self) -> HwResult<(Vec<u8, MAX_PAYLOAD_LEN>, [u8; MAX_MIC_LEN], usize, bool)> {
        match self.pending.take() {
            Some(Pending::Ccm {
                payload,
                tag,
                mic_len,
                auth_ok,
            }) => Ok((payload, tag, mic_len, auth_ok)),
            other => {
                self.pending = other;
                Err(HwError::InvalidParameter)
            }
        }
    }
}

impl Default for SimCipherUnit {
    fn default() -> Self {
        Self::new()
    }
}

impl CipherHardware for SimCipherUnit {
    fn enable(&mut self) -> HwResult<()> {
        // Peripheral reset wipes key RAM and any in-flight operation.
        self.enabled = true;
        self.key_ram = [None; KEY_SLOTS];
        self.pending = None;
        self.polls_left = 0;
        Ok(())
    }

    fn load_key(&mut self, key: &[u8; KEY_LEN], slot: KeySlot) -> HwResult<()> {
        if !self.enabled {
            return Err(HwError::NotEnabled);
        }
        if self.fail_next_key_load {
            self.fail_next_key_load = false;
            return Err(HwError::KeyWriteFailed);
        }
        let area = self
            .key_ram
            .get_mut(slot.area() as usize)
            .ok_or(HwError::InvalidParameter)?;
        *area = Some(*key);
        self.key_loads += 1;
        Ok(())
    }

    fn ccm_encrypt_start(
        &mut self,
        cfg: &CcmConfig,
        slot: KeySlot,
        nonce: &CcmNonce,
        aad: &[u8],
        payload: &[u8],
    ) -> HwResult<()> {
        self.check_start()?;
        Self::check_ccm_params(cfg, aad, payload)?;
        let cipher = self.cipher_for(slot)?;

        let mic_len = cfg.mic.bytes();
        // The MAC is computed over the plaintext, before the
        // confidentiality transform.
        let tag = if mic_len == 0 {
            [0u8; MAX_MIC_LEN]
        } else {
            auth_tag(&cipher, nonce.as_bytes(), aad, payload, mic_len)
        };

        let mut out: Vec<u8, MAX_PAYLOAD_LEN> =
            Vec::from_slice(payload).map_err(|()| HwError::InvalidParameter)?;
        if cfg.transform_payload {
            ccm_ctr_transform(&cipher, nonce.as_bytes(), &mut out);
        }

        self.commit(Pending::Ccm {
            payload: out,
            tag,
            mic_len,
            auth_ok: true,
        });
        Ok(())
    }

    fn ccm_decrypt_start(
        &mut self,
        cfg: &CcmConfig,
        slot: KeySlot,
        nonce: &CcmNonce,
        aad: &[u8],
        payload: &[u8],
        expected_tag: &[u8],
    ) -> HwResult<()> {
        self.check_start()?;
        Self::check_ccm_params(cfg, aad, payload)?;
        let mic_len = cfg.mic.bytes();
        if expected_tag.len() != mic_len {
            return Err(HwError::InvalidParameter);
        }
        let cipher = self.cipher_for(slot)?;

        let mut out: Vec<u8, MAX_PAYLOAD_LEN> =
            Vec::from_slice(payload).map_err(|()| HwError::InvalidParameter)?;
        if cfg.transform_payload {
            ccm_ctr_transform(&cipher, nonce.as_bytes(), &mut out);
        }

        let auth_ok = if mic_len == 0 {
            true
        } else {
            let tag = auth_tag(&cipher, nonce.as_bytes(), aad, &out, mic_len);
            tags_match(&tag[..mic_len], expected_tag)
        };

        self.commit(Pending::Ccm {
            payload: out,
            tag: [0u8; MAX_MIC_LEN],
            mic_len,
            auth_ok,
        });
        Ok(())
    }

    fn ecb_encrypt_start(&mut self, slot: KeySlot, block: &[u8; BLOCK_LEN]) -> HwResult<()> {
        self.check_start()?;
        let cipher = self.cipher_for(slot)?;

        let mut out = *block;
        aes_encrypt(&cipher, &mut out);
        let out = Vec::from_slice(&out).map_err(|()| HwError::InvalidParameter)?;
        self.commit(Pending::Cipher { out });
        Ok(())
    }

    fn cbc_encrypt_start(
        &mut self,
        slot: KeySlot,
        iv: &[u8; BLOCK_LEN],
        data: &[u8],
    ) -> HwResult<()> {
        self.check_start()?;
        if data.len() % BLOCK_LEN != 0 || data.len() > MAX_PAYLOAD_LEN {
            return Err(HwError::InvalidParameter);
        }
        let cipher = self.cipher_for(slot)?;

        let mut out: Vec<u8, MAX_PAYLOAD_LEN> =
            Vec::from_slice(data).map_err(|()| HwError::InvalidParameter)?;
        let mut prev = *iv;
        for chunk in out.chunks_mut(BLOCK_LEN) {
            for (b, p) in chunk.iter_mut().zip(prev.iter()) {
                *b ^= p;
            }
            let mut block = [0u8; BLOCK_LEN];
            block.copy_from_slice(chunk);
            aes_encrypt(&cipher, &mut block);
            chunk.copy_from_slice(&block);
            prev = block;
        }

        self.commit(Pending::Cipher { out });
        Ok(())
    }

    fn ctr_encrypt_start(
        &mut self,
        slot: KeySlot,
        counter: &[u8; BLOCK_LEN],
        data: &[u8],
    ) -> HwResult<()> {
        self.check_start()?;
        if data.len() > MAX_PAYLOAD_LEN {
            return Err(HwError::InvalidParameter);
        }
        let cipher = self.cipher_for(slot)?;

        let mut out: Vec<u8, MAX_PAYLOAD_LEN> =
            Vec::from_slice(data).map_err(|()| HwError::InvalidParameter)?;
        let mut ctr = *counter;
        for chunk in out.chunks_mut(BLOCK_LEN) {
            let mut keystream = ctr;
            aes_encrypt(&cipher, &mut keystream);
            for (b, k) in chunk.iter_mut().zip(keystream.iter()) {
                *b ^= k;
            }
            increment_be(&mut ctr);
        }

        self.commit(Pending::Cipher { out });
        Ok(())
    }

    fn poll_ready(&mut self) -> bool {
        if self.pending.is_none() {
            return true;
        }
        if self.polls_left > 0 {
            self.polls_left -= 1;
            return false;
        }
        true
    }

    fn ccm_encrypt_result(&mut self, payload: &mut [u8], tag: &mut [u8]) -> HwResult<()> {
        let (out, computed, mic_len, _) = self.take_ccm()?;
        if payload.len() != out.len() || tag.len() != mic_len {
            return Err(HwError::InvalidParameter);
        }
        payload.copy_from_slice(&out);
        tag.copy_from_slice(&computed[..mic_len]);
        Ok(())
    }

    fn ccm_decrypt_result(&mut self, payload: &mut [u8]) -> HwResult<()> {
        let (out, _, _, auth_ok) = self.take_ccm()?;
        if payload.len() != out.len() {
            return Err(HwError::InvalidParameter);
        }
        if !auth_ok {
            return Err(HwError::AuthFailed);
        }
        payload.copy_from_slice(&out);
        Ok(())
    }

    fn cipher_result(&mut self, out: &mut [u8]) -> HwResult<()> {
        match self.pending.take() {
            Some(Pending::Cipher { out: data }) => {
                if out.len() != data.len() {
                    return Err(HwError::InvalidParameter);
                }
                out.copy_from_slice(&data);
                Ok(())
            }
            other => {
                self.pending = other;
                Err(HwError::InvalidParameter)
            }
        }
    }
}

fn aes_encrypt(cipher: &Aes128, block: &mut [u8; BLOCK_LEN]) {
    let mut b = Block::clone_from_slice(block);
    cipher.encrypt_block(&mut b);
    block.copy_from_slice(&b);
}

/// A_i counter block of the CCM* profile: flags (L - 1), nonce, counter.
fn counter_block(nonce: &[u8; NONCE_LEN], counter: u16) -> [u8; BLOCK_LEN] {
    let mut a = [0u8; BLOCK_LEN];
    a[0] = LEN_FIELD - 1;
    a[1..1 + NONCE_LEN].copy_from_slice(nonce);
    a[14..16].copy_from_slice(&counter.to_be_bytes());
    a
}

/// XOR the payload with the keystream of counters 1.. (counter 0 is
/// reserved for masking the tag).
fn ccm_ctr_transform(cipher: &Aes128, nonce: &[u8; NONCE_LEN], payload: &mut [u8]) {
    for (i, chunk) in payload.chunks_mut(BLOCK_LEN).enumerate() {
        let mut keystream = counter_block(nonce, (i + 1) as u16);
        aes_encrypt(cipher, &mut keystream);
        for (b, k) in chunk.iter_mut().zip(keystream.iter()) {
            *b ^= k;
        }
    }
}

fn chain(cipher: &Aes128, x: &mut [u8; BLOCK_LEN], block: &[u8; BLOCK_LEN]) {
    for (a, b) in x.iter_mut().zip(block.iter()) {
        *a ^= b;
    }
    aes_encrypt(cipher, x);
}

/// CBC-MAC over B0, the encoded associated data and the plaintext,
/// masked with S0. Returns the untruncated 16-byte tag.
fn auth_tag(
    cipher: &Aes128,
    nonce: &[u8; NONCE_LEN],
    aad: &[u8],
    plaintext: &[u8],
    mic_len: usize,
) -> [u8; MAX_MIC_LEN] {
    let adata = u8::from(!aad.is_empty());
    let m_prime = ((mic_len as u8) - 2) / 2;

    let mut b0 = [0u8; BLOCK_LEN];
    b0[0] = (adata << 6) | (m_prime << 3) | (LEN_FIELD - 1);
    b0[1..1 + NONCE_LEN].copy_from_slice(nonce);
    b0[14..16].copy_from_slice(&(plaintext.len() as u16).to_be_bytes());

    let mut x = b0;
    aes_encrypt(cipher, &mut x);

    if !aad.is_empty() {
        // First block carries the 2-byte length encoding of the
        // associated data.
        let mut block = [0u8; BLOCK_LEN];
        block[..2].copy_from_slice(&(aad.len() as u16).to_be_bytes());
        let head = aad.len().min(BLOCK_LEN - 2);
        block[2..2 + head].copy_from_slice(&aad[..head]);
        chain(cipher, &mut x, &block);

        for chunk in aad[head..].chunks(BLOCK_LEN) {
            let mut block = [0u8; BLOCK_LEN];
            block[..chunk.len()].copy_from_slice(chunk);
            chain(cipher, &mut x, &block);
        }
    }

    for chunk in plaintext.chunks(BLOCK_LEN) {
        let mut block = [0u8; BLOCK_LEN];
        block[..chunk.len()].copy_from_slice(chunk);
        chain(cipher, &mut x, &block);
    }

    let mut s0 = counter_block(nonce, 0);
    aes_encrypt(cipher, &mut s0);

    let mut tag = [0u8; MAX_MIC_LEN];
    for i in 0..MAX_MIC_LEN {
        tag[i] = x[i] ^ s0[i];
    }
    tag
}

fn tags_match(a: &[u8], b: &[u8]) -> bool {
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

fn increment_be(block: &mut [u8; BLOCK_LEN]) {
    for b in block.iter_mut().rev() {
        let (v, carry) = b.overflowing_add(1);
        *b = v;
        if !carry {
            break;
        }
    }
}
