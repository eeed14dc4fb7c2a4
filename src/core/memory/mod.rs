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

//! Emotion Engine address space
//!
//! The address space holds main RAM and the read-only firmware images. It has
//! no notion of memory-mapped registers; those are routed by the system bus,
//! which falls back to the address space for every other address.
//!
//! # Memory Map
//!
//! | Address Range            | Region            | Access |
//! |--------------------------|-------------------|--------|
//! | 0x00000000-(ram_size-1)  | Main RAM          | R/W    |
//! | caller-chosen bases      | Firmware images   | R only |
//!
//! Reads check RAM first, then the image regions; an address backed by
//! neither reads 0. Writes only ever reach RAM. Words are little-endian.
//!
//! # Example
//!
//! ```
//! use ps2rx::core::memory::{AddressSpace, Memory};
//!
//! let mut mem = AddressSpace::default();
//! mem.write32(0x00000100, 0x12345678);
//! assert_eq!(mem.read32(0x00000100), 0x12345678);
//!
//! // Unbacked addresses read 0 and ignore writes
//! mem.write32(0x70000000, 0xFFFFFFFF);
//! assert_eq!(mem.read32(0x70000000), 0);
//! ```

use std::collections::BTreeMap;

use crate::core::error::{EmulatorError, Result};

mod io_device;
mod region;

#[cfg(test)]
mod tests;

pub use io_device::IODevice;
pub use region::{nvm_mac_address, ImageKind, ImageRegion};

/// Default main RAM size (2MB)
pub const DEFAULT_RAM_SIZE: usize = 2 * 1024 * 1024;

/// Word-addressed memory as seen by the CPU
///
/// Implemented by the plain [`AddressSpace`] and by the system bus, which adds
/// peripheral registers on top of it. Accesses never fail; alignment is the
/// caller's responsibility.
pub trait Memory {
    /// Read a 32-bit word
    fn read32(&self, addr: u32) -> u32;

    /// Write a 32-bit word
    fn write32(&mut self, addr: u32, value: u32);
}

/// Main RAM plus mapped firmware images
pub struct AddressSpace {
    /// Main RAM, claims addresses `[0, ram.len())`
    ram: Vec<u8>,

    /// `ram.len() - 1`, used for index wrapping
    ram_mask: u32,

    /// Image regions and aliases keyed by base address
    images: BTreeMap<u32, ImageRegion>,

    /// Named images kept without a mapping
    unmapped: BTreeMap<ImageKind, ImageRegion>,
}

impl AddressSpace {
    /// Create an address space with `ram_size` bytes of zeroed RAM
    ///
    /// # Errors
    ///
    /// `InvalidRamSize` unless `ram_size` is a non-zero power of two that
    /// fits the 32-bit address space.
    pub fn new(ram_size: usize) -> Result<Self> {
        if !ram_size.is_power_of_two() || ram_size > (1usize << 31) {
            return Err(EmulatorError::InvalidRamSize { size: ram_size });
        }

        Ok(Self {
            ram: vec![0u8; ram_size],
            ram_mask: (ram_size - 1) as u32,
            images: BTreeMap::new(),
            unmapped: BTreeMap::new(),
        })
    }

    /// Clear RAM
    ///
    /// Images and aliases are kept.
    pub fn reset(&mut self) {
        self.ram.fill(0);
    }

    pub fn ram_size(&self) -> usize {
        self.ram.len()
    }

    pub fn ram_mask(&self) -> u32 {
        self.ram_mask
    }

    pub fn ram(&self) -> &[u8] {
        &self.ram
    }

    pub fn ram_mut(&mut self) -> &mut [u8] {
        &mut self.ram
    }

    /// Bulk-write `bytes` into RAM starting at `addr`
    ///
    /// The copy is clipped at the end of RAM; an `addr` outside RAM writes
    /// nothing.
    ///
    /// # Returns
    ///
    /// Number of bytes actually written
    pub fn copy_block(&mut self, addr: u32, bytes: &[u8]) -> usize {
        let start = addr as usize;
        if start >= self.ram.len() {
            return 0;
        }

        let len = bytes.len().min(self.ram.len() - start);
        self.ram[start..start + len].copy_from_slice(&bytes[..len]);

        if len < bytes.len() {
            log::debug!(
                "Block copy at 0x{:08X} clipped from {} to {} bytes",
                addr,
                bytes.len(),
                len
            );
        }
        len
    }

    /// Offset of a whole word in RAM, if `addr..addr+4` lies inside it
    #[inline(always)]
    fn ram_offset(&self, addr: u32) -> Option<usize> {
        let offset = addr as usize;
        (offset + 4 <= self.ram.len()).then_some(offset)
    }
}

impl Memory for AddressSpace {
    #[inline]
    fn read32(&self, addr: u32) -> u32 {
        if let Some(offset) = self.ram_offset(addr) {
            let bytes = &self.ram[offset..offset + 4];
            return u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        }

        self.read_image32(addr).unwrap_or(0)
    }

    #[inline]
    fn write32(&mut self, addr: u32, value: u32) {
        match self.ram_offset(addr) {
            Some(offset) => {
                self.ram[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
            }
            None => log::trace!(
                "Ignored write of 0x{:08X} to unbacked address 0x{:08X}",
                value,
                addr
            ),
        }
    }
}

impl Default for AddressSpace {
    fn default() -> Self {
        Self {
            ram: vec![0u8; DEFAULT_RAM_SIZE],
            ram_mask: (DEFAULT_RAM_SIZE - 1) as u32,
            images: BTreeMap::new(),
            unmapped: BTreeMap::new(),
        }
    }
}
