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

//! System bus
//!
//! Routes CPU loads and stores to the memory-mapped register blocks and
//! falls back to the address space for every other address.
//!
//! | Address Range           | Device |
//! |-------------------------|--------|
//! | 0x10000000-0x10001FFF   | Timers |
//! | 0x10008000-0x1000E03F   | DMAC   |
//! | 0x1000F000-0x1000F01F   | INTC   |
//! | 0x1000F200-0x1000F23F   | SIF    |
//! | 0x1D000010              | SIF    |

use crate::core::dma::Dma;
use crate::core::interrupt::InterruptController;
use crate::core::memory::{AddressSpace, IODevice, Memory};
use crate::core::sif::Sif;
use crate::core::timer::Timers;

/// Borrowed view of everything the CPU can address during one step
pub struct Bus<'a> {
    memory: &'a mut AddressSpace,
    dma: &'a mut Dma,
    timers: &'a mut Timers,
    intc: &'a mut InterruptController,
    sif: &'a mut Sif,
}

impl<'a> Bus<'a> {
    pub fn new(
        memory: &'a mut AddressSpace,
        dma: &'a mut Dma,
        timers: &'a mut Timers,
        intc: &'a mut InterruptController,
        sif: &'a mut Sif,
    ) -> Self {
        Self {
            memory,
            dma,
            timers,
            intc,
            sif,
        }
    }

    /// Register block claiming `addr`, if any
    fn device(&self, addr: u32) -> Option<&dyn IODevice> {
        let devices: [&dyn IODevice; 4] = [&*self.timers, &*self.dma, &*self.intc, &*self.sif];
        devices.into_iter().find(|device| device.contains(addr))
    }

    fn device_mut(&mut self, addr: u32) -> Option<&mut dyn IODevice> {
        if self.timers.contains(addr) {
            Some(&mut *self.timers)
        } else if self.dma.contains(addr) {
            Some(&mut *self.dma)
        } else if self.intc.contains(addr) {
            Some(&mut *self.intc)
        } else if self.sif.contains(addr) {
            Some(&mut *self.sif)
        } else {
            None
        }
    }
}

impl Memory for Bus<'_> {
    fn read32(&self, addr: u32) -> u32 {
        match self.device(addr) {
            Some(device) => {
                let value = device.read_register(addr);
                log::trace!("{} read 0x{:08X} -> 0x{:08X}", device.name(), addr, value);
                value
            }
            None => self.memory.read32(addr),
        }
    }

    fn write32(&mut self, addr: u32, value: u32) {
        match self.device_mut(addr) {
            Some(device) => {
                log::trace!("{} write 0x{:08X} <- 0x{:08X}", device.name(), addr, value);
                device.write_register(addr, value);
            }
            None => self.memory.write32(addr, value),
        }
    }
}
