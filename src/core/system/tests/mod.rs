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

//! System tests
//!
//! - `basic`: construction, reset, image loading and status text
//! - `execution`: guest programs run through ticks, exceptions and halting
//! - `dma_integration`: GIF transfers started by guest register writes
//! - `timer_integration`: timer compare events observed through the INTC

use super::*;

mod execution;

/// Physical base of the boot ROM
const ROM_BASE: u32 = 0x1FC00000;

/// KSEG1 view of the boot ROM, where execution starts
const ROM_KSEG1: u32 = 0xBFC00000;

const NOP: u32 = 0;

fn i_type(op: u32, rs: u32, rt: u32, imm: u16) -> u32 {
    (op << 26) | (rs << 21) | (rt << 16) | imm as u32
}

fn addiu(rt: u32, rs: u32, imm: i16) -> u32 {
    i_type(0x09, rs, rt, imm as u16)
}

fn ori(rt: u32, rs: u32, imm: u16) -> u32 {
    i_type(0x0D, rs, rt, imm)
}

fn lui(rt: u32, imm: u16) -> u32 {
    i_type(0x0F, 0, rt, imm)
}

fn lw(rt: u32, offset: i16, base: u32) -> u32 {
    i_type(0x23, base, rt, offset as u16)
}

fn sw(rt: u32, offset: i16, base: u32) -> u32 {
    i_type(0x2B, base, rt, offset as u16)
}

fn j(target: u32) -> u32 {
    (0x02 << 26) | ((target >> 2) & 0x03FFFFFF)
}

/// Encode a program as little-endian bytes
fn image(program: &[u32]) -> Arc<[u8]> {
    program
        .iter()
        .flat_map(|word| word.to_le_bytes())
        .collect::<Vec<u8>>()
        .into()
}

/// Map `program` as the boot ROM and alias it at the reset vector
fn boot(program: &[u32]) -> System {
    let mut system = System::new();
    map_boot_rom(&mut system, program);
    system
}

fn map_boot_rom(system: &mut System, program: &[u32]) {
    let rom = image(program);
    let size = rom.len() as u32;
    system.map_image(ImageKind::Rom0, ROM_BASE, rom);
    assert!(system.alias_image(ROM_KSEG1, ROM_BASE, size));
}
