// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 itsakeyfut
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Emotion Engine Interrupt Controller (INTC)
//!
//! Peripherals raise bits in a shared interrupt-status word; the guest reads
//! and acknowledges them through two memory-mapped registers. The core never
//! clears status on its own.
//!
//! ## Registers
//!
//! - **INTC_STAT** (0x1000F000): Interrupt status register (R/W)
//!   - Reading returns current interrupt flags
//!   - Writing 1 to a bit acknowledges that interrupt (clears the bit)
//!   - Writing 0 to a bit has no effect
//!
//! - **INTC_MASK** (0x1000F010): Interrupt mask register (R/W)
//!   - Writing 1 to a bit toggles it, writing 0 leaves it unchanged
//!
//! ## Interrupt Sources (Bit Positions)
//!
//! ```text
//! Bit  | Source        | Description
//! -----|---------------|----------------------------------
//! 0    | GS            | Graphics synthesizer
//! 1    | SBUS          | Sub-bus (IOP link)
//! 2    | VBLANK_START  | Vertical blank start
//! 3    | VBLANK_END    | Vertical blank end
//! 4    | VIF0          | VIF0 stall/error
//! 5    | VIF1          | VIF1 stall/error
//! 6    | VU0           | VU0 program end
//! 7    | VU1           | VU1 program end
//! 8    | IPU           | Image processing unit
//! 9    | TIMER0        | Timer 0 compare
//! 10   | TIMER1        | Timer 1 compare
//! 11   | TIMER2        | Timer 2 compare
//! 12   | TIMER3        | Timer 3 compare
//! 13   | SFIFO         | SIF FIFO error
//! 14   | VU0_WATCHDOG  | VU0 watchdog
//! ```
//!
//! Only the timer bits are raised by this core; the rest are reserved for
//! sources modeled elsewhere.

use bincode::{Decode, Encode};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::core::memory::IODevice;

#[cfg(test)]
mod tests;

bitflags! {
    /// Interrupt source bits of INTC_STAT / INTC_MASK
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Interrupt: u32 {
        const GS = 1 << 0;
        const SBUS = 1 << 1;
        const VBLANK_START = 1 << 2;
        const VBLANK_END = 1 << 3;
        const VIF0 = 1 << 4;
        const VIF1 = 1 << 5;
        const VU0 = 1 << 6;
        const VU1 = 1 << 7;
        const IPU = 1 << 8;
        const TIMER0 = 1 << 9;
        const TIMER1 = 1 << 10;
        const TIMER2 = 1 << 11;
        const TIMER3 = 1 << 12;
        const SFIFO = 1 << 13;
        const VU0_WATCHDOG = 1 << 14;
    }
}

impl Interrupt {
    /// Compare interrupt of timer `index` (0-3)
    ///
    /// # Example
    ///
    /// ```
    /// use ps2rx::core::interrupt::Interrupt;
    ///
    /// assert_eq!(Interrupt::timer(2), Interrupt::TIMER2);
    /// assert_eq!(Interrupt::timer(3).bits(), 1 << 12);
    /// ```
    pub fn timer(index: usize) -> Interrupt {
        Interrupt::from_bits_truncate(Interrupt::TIMER0.bits() << (index & 0x3))
    }
}

/// INTC_STAT register address
pub const INTC_STAT: u32 = 0x1000F000;

/// INTC_MASK register address
pub const INTC_MASK: u32 = 0x1000F010;

/// Emotion Engine Interrupt Controller
///
/// # Example
///
/// ```
/// use ps2rx::core::interrupt::{Interrupt, InterruptController};
///
/// let mut ic = InterruptController::new();
///
/// ic.request(Interrupt::TIMER0);
/// // Enable TIMER0 (mask writes toggle)
/// ic.write_mask(Interrupt::TIMER0.bits());
/// assert!(ic.is_pending());
///
/// // Acknowledge the interrupt (write 1 to clear)
/// ic.write_status(Interrupt::TIMER0.bits());
/// assert!(!ic.is_pending());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct InterruptController {
    /// INTC_STAT: one bit per pending source
    status: u32,

    /// INTC_MASK: 1 = source enabled
    mask: u32,
}

impl InterruptController {
    /// Create a new interrupt controller with nothing pending and all sources masked
    pub fn new() -> Self {
        Self { status: 0, mask: 0 }
    }

    pub fn reset(&mut self) {
        self.status = 0;
        self.mask = 0;
    }

    /// Raise interrupt source(s)
    ///
    /// Bits stay set until acknowledged.
    pub fn request(&mut self, interrupt: Interrupt) {
        self.status |= interrupt.bits();
        log::trace!(
            "IRQ requested: {:?}, status=0x{:08X}",
            interrupt,
            self.status
        );
    }

    /// Clear the status bits set in `value`
    pub fn acknowledge(&mut self, value: u32) {
        self.status &= !value;
        log::trace!("IRQ acknowledged, status=0x{:08X}", self.status);
    }

    /// Whether any unmasked source is pending
    pub fn is_pending(&self) -> bool {
        (self.status & self.mask) != 0
    }

    /// Pending sources as flags
    pub fn pending(&self) -> Interrupt {
        Interrupt::from_bits_truncate(self.status)
    }

    /// Read INTC_STAT
    pub fn read_status(&self) -> u32 {
        self.status
    }

    /// Write INTC_STAT (write 1 to clear)
    pub fn write_status(&mut self, value: u32) {
        self.acknowledge(value);
    }

    /// Read INTC_MASK
    pub fn read_mask(&self) -> u32 {
        self.mask
    }

    /// Write INTC_MASK (write 1 to toggle)
    pub fn write_mask(&mut self, value: u32) {
        self.mask ^= value & Interrupt::all().bits();
        log::trace!("INTC_MASK = 0x{:08X}", self.mask);
    }
}

impl IODevice for InterruptController {
    fn address_range(&self) -> (u32, u32) {
        (INTC_STAT, INTC_STAT + 0x1F)
    }

    fn read_register(&self, addr: u32) -> u32 {
        match addr {
            INTC_STAT => self.read_status(),
            INTC_MASK => self.read_mask(),
            _ => 0,
        }
    }

    fn write_register(&mut self, addr: u32, value: u32) {
        match addr {
            INTC_STAT => self.write_status(value),
            INTC_MASK => self.write_mask(value),
            _ => log::trace!("Ignored INTC write 0x{:08X} to 0x{:08X}", value, addr),
        }
    }

    fn name(&self) -> &str {
        "INTC"
    }
}
