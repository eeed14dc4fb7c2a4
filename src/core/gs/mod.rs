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

//! Graphics Synthesizer stand-in
//!
//! The DMA engine hands GIF packets to a [`PacketSink`]. The GS itself is not
//! modeled here: [`GsStub`] records what it receives and keeps a plain
//! register bank so the rest of the system has something to talk to.

/// One 128-bit DMA transfer unit, as four little-endian words
pub type Quadword = [u32; 4];

/// Number of registers in the stub's register bank
pub const GS_REG_COUNT: usize = 256;

/// Downstream consumer of GIF-channel DMA packets
///
/// Delivery is fire-and-forget: the slice is only borrowed for the call and
/// nothing is returned to the DMA engine.
pub trait PacketSink {
    /// Receive one packet of `quadwords.len()` quadwords
    fn consume(&mut self, quadwords: &[Quadword]);
}

/// Recording GS stub
///
/// # Example
///
/// ```
/// use ps2rx::core::gs::{GsStub, PacketSink};
///
/// let mut gs = GsStub::new();
/// gs.consume(&[[1, 2, 3, 4], [5, 6, 7, 8]]);
///
/// assert_eq!(gs.packet_count(), 1);
/// assert_eq!(gs.quadword_count(), 2);
/// assert_eq!(gs.last_packet(), &[[1, 2, 3, 4], [5, 6, 7, 8]]);
/// ```
pub struct GsStub {
    regs: [u32; GS_REG_COUNT],
    packets: u64,
    quadwords: u64,
    last_packet: Vec<Quadword>,
    debug: String,
}

impl GsStub {
    pub fn new() -> Self {
        Self {
            regs: [0; GS_REG_COUNT],
            packets: 0,
            quadwords: 0,
            last_packet: Vec::new(),
            debug: String::from("GS stub initialized"),
        }
    }

    /// Clear registers, counters and the recorded packet
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Write a register of the bank
    ///
    /// Out-of-range indices are ignored and noted in the debug string.
    pub fn set_reg(&mut self, index: usize, value: u32) {
        match self.regs.get_mut(index) {
            Some(reg) => {
                *reg = value;
                self.debug = format!("GS reg[{}] = 0x{:08X}", index, value);
            }
            None => {
                log::trace!("GS register write out of bounds: {}", index);
                self.debug = String::from("GS reg write out of bounds");
            }
        }
    }

    /// Read a register of the bank (0 for out-of-range indices)
    pub fn reg(&self, index: usize) -> u32 {
        self.regs.get(index).copied().unwrap_or(0)
    }

    /// Number of packets received since reset
    pub fn packet_count(&self) -> u64 {
        self.packets
    }

    /// Total quadwords received since reset
    pub fn quadword_count(&self) -> u64 {
        self.quadwords
    }

    /// Copy of the most recent packet
    pub fn last_packet(&self) -> &[Quadword] {
        &self.last_packet
    }

    /// Description of the last event
    pub fn debug_string(&self) -> &str {
        &self.debug
    }
}

impl PacketSink for GsStub {
    fn consume(&mut self, quadwords: &[Quadword]) {
        self.packets += 1;
        self.quadwords += quadwords.len() as u64;
        self.last_packet.clear();
        self.last_packet.extend_from_slice(quadwords);
        self.debug = format!("GIF packet received | qwc={}", quadwords.len());
        log::trace!("GS: {}", self.debug);
    }
}

impl Default for GsStub {
    fn default() -> Self {
        Self::new()
    }
}
