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

//! DMA controller tests
//!
//! - `registers`: channel windows and controller registers
//! - `transfers`: GIF transfers into a packet sink

use super::*;
use crate::core::gs::GsStub;
use crate::core::memory::Memory;


/// GIF channel register window
const GIF_BASE: u32 = 0x1000A000;

/// Fill `qwc` quadwords at `addr` with an incrementing word pattern
fn fill_pattern(mem: &mut AddressSpace, addr: u32, qwc: u32) {
    for i in 0..qwc * 4 {
        mem.write32(addr + i * 4, 0x1000 + i);
    }
}

/// Program and start the GIF channel
fn start_gif(dma: &mut Dma, madr: u32, qwc: u32) {
    let gif = dma.channel_mut(Dma::CH_GIF);
    gif.write_madr(madr);
    gif.write_qwc(qwc);
    gif.write_chcr(DmaChannel::CHCR_STR);
}
