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

//! I/O Device trait for memory-mapped peripherals
//!
//! Every register block reachable by guest loads and stores (DMA, timers,
//! interrupt controller, SIF) implements [`IODevice`]. The system bus asks
//! each device whether it claims an address and falls back to the
//! [`AddressSpace`](super::AddressSpace) otherwise.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              System Bus                     │
//! ├─────────────────────────────────────────────┤
//! │  read32(addr) {                             │
//! │    for device in [timers, dma, intc, sif] { │
//! │      if device.contains(addr) {             │
//! │        return device.read_register(addr)    │
//! │      }                                      │
//! │    }                                        │
//! │    address_space.read32(addr)               │
//! │  }                                          │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use ps2rx::core::memory::IODevice;
//!
//! struct Mailbox {
//!     value: u32,
//! }
//!
//! impl IODevice for Mailbox {
//!     fn address_range(&self) -> (u32, u32) {
//!         (0x1000F800, 0x1000F80F)
//!     }
//!
//!     fn read_register(&self, addr: u32) -> u32 {
//!         if addr == 0x1000F800 { self.value } else { 0 }
//!     }
//!
//!     fn write_register(&mut self, addr: u32, value: u32) {
//!         if addr == 0x1000F800 {
//!             self.value = value;
//!         }
//!     }
//! }
//!
//! let mut mailbox = Mailbox { value: 0 };
//! assert!(mailbox.contains(0x1000F804));
//! mailbox.write_register(0x1000F800, 7);
//! assert_eq!(mailbox.read_register(0x1000F800), 7);
//! ```

/// Trait for memory-mapped I/O devices
///
/// Register accesses are 32-bit and take the full physical address, since
/// the register blocks of this machine decode absolute addresses (channel
/// bases, timer blocks). Unknown registers inside a claimed range read 0 and
/// ignore writes; register access never fails.
pub trait IODevice {
    /// Get the address range this device responds to
    ///
    /// # Returns
    ///
    /// `(start, end)` - Start and end physical addresses (inclusive)
    fn address_range(&self) -> (u32, u32);

    /// Check if this device claims the given address
    ///
    /// Devices with registers outside their main window override this.
    fn contains(&self, addr: u32) -> bool {
        let (start, end) = self.address_range();
        (start..=end).contains(&addr)
    }

    /// Read a 32-bit register
    ///
    /// # Arguments
    ///
    /// * `addr` - Physical register address
    fn read_register(&self, addr: u32) -> u32;

    /// Write a 32-bit register
    ///
    /// # Arguments
    ///
    /// * `addr` - Physical register address
    /// * `value` - 32-bit value to write
    fn write_register(&mut self, addr: u32, value: u32);

    /// Device name for debugging
    fn name(&self) -> &str {
        "Unknown Device"
    }
}
