// SPDX-License-Identifier: Apache-2.0
// Copyright 2025-2026 Brume Systems

//! Blocking completion protocol over the cipher accelerator
//!
//! Every cipher mode drives the hardware through the same discipline:
//! start, spin on the completion flag, fetch. Synchrony comes purely from
//! the busy-wait; no scheduler exists to yield to. There is deliberately
//! no timeout: the accelerator completes in bounded, short time, and a
//! wedged accelerator that never raises the flag hangs the caller, an
//! accepted risk on this class of device.

use crate::error::{HwResult, SecError, SecResult};
use crate::traits::CipherHardware;

/// Run one hardware operation to completion.
///
/// `io` is the caller-owned buffer the operation works on: `start` reads
/// it, `fetch` overwrites it with the result. If `start` is rejected the
/// error is returned at once and the flag is never polled.
pub(crate) fn run<H, B, T, S, F>(hw: &mut H, io: &mut B, start: S, fetch: F) -> SecResult<T>
where
    H: CipherHardware,
    B: ?Sized,
    S: FnOnce(&mut H, &B) -> HwResult<()>,
    F: FnOnce(&mut H, &mut B) -> HwResult<T>,
{
    start(hw, io)?;

    while !hw.poll_ready() {
        core::hint::spin_loop();
    }

    fetch(hw, io).map_err(SecError::from)
}
