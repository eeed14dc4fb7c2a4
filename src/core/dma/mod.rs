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

//! DMA (Direct Memory Access) Controller
//!
//! This module implements the Emotion Engine DMA controller (DMAC). Only the
//! GIF channel moves data: when started, it reads its quadword count from
//! main RAM and hands the whole block to the graphics packet sink in one
//! step. The other channels hold their registers but never transfer.
//!
//! # DMA Channels
//!
//! | Channel | Device   | Base Address |
//! |---------|----------|--------------|
//! | 0       | VIF0     | 0x10008000   |
//! | 1       | VIF1     | 0x10009000   |
//! | 2       | GIF      | 0x1000A000   |
//! | 3       | fromIPU  | 0x1000B000   |
//! | 4       | toIPU    | 0x1000B400   |
//! | 5       | SIF0     | 0x1000C000   |
//! | 6       | SIF1     | 0x1000C400   |
//! | 7       | SIF2     | 0x1000C800   |
//! | 8       | fromSPR  | 0x1000D000   |
//! | 9       | toSPR    | 0x1000D400   |
//!
//! # Channel Registers
//!
//! - **CHCR** (+0x00): Channel control, bit 8 (STR) starts the channel
//! - **MADR** (+0x10): Memory address
//! - **QWC** (+0x20): Quadword count (16 bits)
//! - **TADR** (+0x30): Tag address
//!
//! # Global Registers
//!
//! - **D_CTRL** (0x1000E000), **D_STAT** (0x1000E010),
//!   **D_PCR** (0x1000E020), **D_SQWC** (0x1000E030)

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::core::gs::{PacketSink, Quadword};
use crate::core::memory::{AddressSpace, IODevice};

#[cfg(test)]
mod tests;

/// Number of DMA channels
pub const CHANNEL_COUNT: usize = 10;

/// Register window base of each channel
pub const CHANNEL_BASES: [u32; CHANNEL_COUNT] = [
    0x10008000, 0x10009000, 0x1000A000, 0x1000B000, 0x1000B400, 0x1000C000, 0x1000C400,
    0x1000C800, 0x1000D000, 0x1000D400,
];

const CHANNEL_NAMES: [&str; CHANNEL_COUNT] = [
    "VIF0", "VIF1", "GIF", "fromIPU", "toIPU", "SIF0", "SIF1", "SIF2", "fromSPR", "toSPR",
];

/// DMA control register
pub const D_CTRL: u32 = 0x1000E000;
/// DMA status register
pub const D_STAT: u32 = 0x1000E010;
/// DMA priority control register
pub const D_PCR: u32 = 0x1000E020;
/// DMA skip quadword register
pub const D_SQWC: u32 = 0x1000E030;

/// Channel register offsets
const REG_CHCR: u32 = 0x00;
const REG_MADR: u32 = 0x10;
const REG_QWC: u32 = 0x20;
const REG_TADR: u32 = 0x30;

/// Size of one quadword in bytes
const QUADWORD_BYTES: u32 = 16;

/// QWC is a 16-bit field
const QWC_MASK: u32 = 0xFFFF;

/// Single DMA channel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct DmaChannel {
    /// Memory Address Register (MADR)
    madr: u32,

    /// Tag Address Register (TADR)
    tadr: u32,

    /// Quadword count (QWC), 16 bits
    qwc: u32,

    /// Channel Control Register (CHCR)
    chcr: u32,
}

impl DmaChannel {
    /// Start/busy flag (bit 8 of CHCR)
    pub const CHCR_STR: u32 = 1 << 8;

    pub fn new() -> Self {
        Self::default()
    }

    /// Check if channel is active (bit 8 of CHCR)
    #[inline(always)]
    pub fn is_active(&self) -> bool {
        (self.chcr & Self::CHCR_STR) != 0
    }

    pub fn madr(&self) -> u32 {
        self.madr
    }

    pub fn tadr(&self) -> u32 {
        self.tadr
    }

    pub fn qwc(&self) -> u32 {
        self.qwc
    }

    pub fn chcr(&self) -> u32 {
        self.chcr
    }

    pub fn write_madr(&mut self, value: u32) {
        self.madr = value;
    }

    pub fn write_tadr(&mut self, value: u32) {
        self.tadr = value;
    }

    pub fn write_qwc(&mut self, value: u32) {
        self.qwc = value & QWC_MASK;
    }

    pub fn write_chcr(&mut self, value: u32) {
        self.chcr = value;
    }

    /// Deactivate the channel (clear STR)
    fn deactivate(&mut self) {
        self.chcr &= !Self::CHCR_STR;
    }
}

/// DMA Controller with 10 channels
///
/// # Example
///
/// ```
/// use ps2rx::core::dma::{Dma, DmaChannel};
/// use ps2rx::core::gs::GsStub;
/// use ps2rx::core::memory::{AddressSpace, Memory};
///
/// let mut mem = AddressSpace::default();
/// mem.write32(0x1000, 0xAABBCCDD);
///
/// let mut dma = Dma::new();
/// let gif = dma.channel_mut(Dma::CH_GIF);
/// gif.write_madr(0x1000);
/// gif.write_qwc(2);
/// gif.write_chcr(DmaChannel::CHCR_STR);
///
/// let mut gs = GsStub::new();
/// assert_eq!(dma.step(&mem, &mut gs), 2);
/// assert_eq!(gs.last_packet()[0][0], 0xAABBCCDD);
/// assert!(!dma.channel(Dma::CH_GIF).is_active());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Dma {
    channels: [DmaChannel; CHANNEL_COUNT],

    /// D_CTRL (0x1000E000)
    ctrl: u32,

    /// D_STAT (0x1000E010)
    stat: u32,

    /// D_PCR (0x1000E020)
    pcr: u32,

    /// D_SQWC (0x1000E030)
    sqwc: u32,
}

impl Dma {
    pub const CH_VIF0: usize = 0;
    pub const CH_VIF1: usize = 1;
    /// Channel 2: GIF (graphics packets)
    pub const CH_GIF: usize = 2;
    pub const CH_FROM_IPU: usize = 3;
    pub const CH_TO_IPU: usize = 4;
    pub const CH_SIF0: usize = 5;
    pub const CH_SIF1: usize = 6;
    pub const CH_SIF2: usize = 7;
    pub const CH_FROM_SPR: usize = 8;
    pub const CH_TO_SPR: usize = 9;

    /// Create a new DMA controller with every channel idle
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Human-readable channel name
    pub fn channel_name(index: usize) -> &'static str {
        CHANNEL_NAMES.get(index).copied().unwrap_or("?")
    }

    /// # Panics
    ///
    /// Panics if `index >= CHANNEL_COUNT`.
    pub fn channel(&self, index: usize) -> &DmaChannel {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut DmaChannel {
        &mut self.channels[index]
    }

    /// Run the GIF channel
    ///
    /// If the GIF channel is active with a non-zero count, QWC quadwords are
    /// read from RAM starting at `MADR & ram_mask` (wrapping within RAM) and
    /// delivered to `sink` as one packet. The channel then ends with
    /// `MADR += QWC * 16`, `QWC = 0` and STR cleared. An active channel with
    /// QWC = 0 stays active and transfers nothing.
    ///
    /// # Arguments
    ///
    /// * `mem` - Address space whose RAM is the transfer source
    /// * `sink` - Consumer of the GIF packet
    ///
    /// # Returns
    ///
    /// Number of quadwords transferred
    pub fn step<S: PacketSink + ?Sized>(&mut self, mem: &AddressSpace, sink: &mut S) -> u32 {
        let channel = &mut self.channels[Self::CH_GIF];
        // A restored save state may carry bits above the 16-bit field
        let qwc = channel.qwc & QWC_MASK;
        if !channel.is_active() || qwc == 0 {
            return 0;
        }

        let packet = read_quadwords(mem.ram(), mem.ram_mask(), channel.madr, qwc);

        log::debug!(
            "DMA GIF transfer: madr=0x{:08X} qwc={} chcr=0x{:08X}",
            channel.madr,
            qwc,
            channel.chcr
        );

        sink.consume(&packet);

        channel.madr = channel.madr.wrapping_add(qwc.wrapping_mul(QUADWORD_BYTES));
        channel.qwc = 0;
        channel.deactivate();
        log::trace!("DMA channel GIF deactivated");

        qwc
    }

    /// Locate the channel whose register window holds `addr`
    fn channel_register(addr: u32) -> Option<(usize, u32)> {
        let base = addr & !0x3FF;
        CHANNEL_BASES
            .iter()
            .position(|&b| b == base)
            .map(|index| (index, addr & 0x3FF))
    }
}

/// Gather `qwc` quadwords starting at `madr`, wrapping each word address by `ram_mask`
fn read_quadwords(ram: &[u8], ram_mask: u32, madr: u32, qwc: u32) -> Vec<Quadword> {
    let read_word = |addr: u32| {
        let offset = (addr & ram_mask & !0x3) as usize;
        ram.get(offset..offset + 4)
            .map(|b| u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
            .unwrap_or(0)
    };

    (0..qwc)
        .map(|q| {
            let addr = madr.wrapping_add(q.wrapping_mul(QUADWORD_BYTES));
            [
                read_word(addr),
                read_word(addr.wrapping_add(4)),
                read_word(addr.wrapping_add(8)),
                read_word(addr.wrapping_add(12)),
            ]
        })
        .collect()
}

impl IODevice for Dma {
    fn address_range(&self) -> (u32, u32) {
        (CHANNEL_BASES[0], D_SQWC + 0xF)
    }

    fn read_register(&self, addr: u32) -> u32 {
        match addr {
            D_CTRL => return self.ctrl,
            D_STAT => return self.stat,
            D_PCR => return self.pcr,
            D_SQWC => return self.sqwc,
            _ => {}
        }

        let Some((index, offset)) = Self::channel_register(addr) else {
            return 0;
        };
        let channel = &self.channels[index];

        match offset {
            REG_CHCR => channel.chcr,
            REG_MADR => channel.madr,
            REG_QWC => channel.qwc,
            REG_TADR => channel.tadr,
            _ => 0,
        }
    }

    fn write_register(&mut self, addr: u32, value: u32) {
        match addr {
            D_CTRL => self.ctrl = value,
            D_STAT => self.stat = value,
            D_PCR => self.pcr = value,
            D_SQWC => self.sqwc = value,
            _ => {
                let Some((index, offset)) = Self::channel_register(addr) else {
                    log::trace!("Ignored DMA write 0x{:08X} to 0x{:08X}", value, addr);
                    return;
                };
                let channel = &mut self.channels[index];

                match offset {
                    REG_CHCR => {
                        channel.write_chcr(value);
                        if channel.is_active() {
                            log::debug!(
                                "DMA {} started: madr=0x{:08X} qwc={}",
                                Self::channel_name(index),
                                channel.madr,
                                channel.qwc
                            );
                        }
                    }
                    REG_MADR => channel.write_madr(value),
                    REG_QWC => channel.write_qwc(value),
                    REG_TADR => channel.write_tadr(value),
                    _ => log::trace!("Ignored DMA write 0x{:08X} to 0x{:08X}", value, addr),
                }
            }
        }
    }

    fn name(&self) -> &str {
        "DMAC"
    }
}
