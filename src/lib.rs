// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Brume Systems

//! Link-layer security engine for the Brume mesh stack
//!
//! This crate protects frames before radio transmission and verifies
//! them on reception, driving a hardware block-cipher accelerator
//! through a synchronous, polled completion protocol. It exposes a small
//! capability set: CCM* authenticated encryption/decryption plus
//! single-direction ECB, CBC and CTR.
//!
//! # Architecture
//!
//! - [`traits::CipherHardware`]: the accelerator as consumed here —
//!   load key, start operation, poll completion, fetch result
//! - [`cache::KeyCache`]: single-slot key residency policy
//! - [`engine::SecEngine`]: the [`traits::CryptoEngine`] capability
//!   table protocol layers call
//! - `sim` (feature `sim`, default on): software accelerator model for
//!   host builds and tests
//!
//! # Invariants the caller owns
//!
//! - Nonce uniqueness per (key, direction) pair
//! - Room for the authentication tag in the message buffer before
//!   encrypting
//! - One operation in flight: a single execution context drives the
//!   engine; no internal locking exists
//!
//! # Security
//!
//! - Key material is zeroized on drop and never logged
//! - A forged frame and a hardware fault are indistinguishable to
//!   callers; every failure means "drop this frame"
//!
//! # Example
//!
//! ```
//! use brume_lsec::engine::SecEngine;
//! use brume_lsec::sim::SimCipherUnit;
//! use brume_lsec::traits::CryptoEngine;
//! use brume_lsec::types::{CcmNonce, LinkKey, MicLen};
//! use heapless::Vec;
//!
//! let mut engine = SecEngine::new(SimCipherUnit::new());
//! engine.init().unwrap();
//!
//! let key = LinkKey::new([0u8; 16]);
//! let nonce = CcmNonce::new([0u8; 13]);
//! let mut frame: Vec<u8, 64> = Vec::from_slice(b"HELLO").unwrap();
//!
//! engine.ccm_encrypt(&[], &mut frame, &nonce, 2, &key, MicLen::Mic8).unwrap();
//! assert_eq!(frame.len(), 13);
//!
//! engine.ccm_decrypt(&[], &mut frame, &nonce, 2, &key, MicLen::Mic8).unwrap();
//! assert_eq!(&frame[..], b"HELLO");
//! ```

#![no_std]
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod cache;
pub mod engine;
pub mod error;
pub mod traits;
pub mod types;

mod ccm;
mod completion;
mod modes;

#[cfg(feature = "sim")]
pub mod sim;

pub use engine::SecEngine;
pub use error::{HwError, HwResult, SecError, SecResult};
pub use traits::{CipherHardware, CryptoEngine};
pub use types::{CcmConfig, CcmNonce, KeySlot, LinkKey, MicLen};
