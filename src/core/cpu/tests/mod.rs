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

//! CPU test modules
//!
//! Tests are organized into the following categories:
//! - `basic`: CPU initialization, reset, register access, PC handling
//! - `decode`: Instruction field extraction
//! - `instructions`: Instruction execution results
//! - `delay_slot`: Branch/jump sequencing through the delay slot
//! - `exceptions`: Misaligned access handling
//! - `disassembler`: Disassembly text

use super::*;
use crate::core::memory::{AddressSpace, Memory};

mod delay_slot;

/// Address programs are loaded at
const BASE: u32 = 0x00001000;

/// Encode an R-type (SPECIAL) instruction
fn r_type(rs: u8, rt: u8, rd: u8, sa: u8, funct: u8) -> u32 {
    ((rs as u32) << 21) | ((rt as u32) << 16) | ((rd as u32) << 11) | ((sa as u32) << 6) | funct as u32
}

/// Encode an I-type instruction
fn i_type(op: u8, rs: u8, rt: u8, imm: u16) -> u32 {
    ((op as u32) << 26) | ((rs as u32) << 21) | ((rt as u32) << 16) | imm as u32
}

/// Encode a J-type instruction
fn j_type(op: u8, target: u32) -> u32 {
    ((op as u32) << 26) | (target & 0x03FFFFFF)
}

fn addiu(rt: u8, rs: u8, imm: i16) -> u32 {
    i_type(0x09, rs, rt, imm as u16)
}

/// Load `program` at [`BASE`] and point a fresh CPU at it
fn setup(program: &[u32]) -> (CPU, AddressSpace) {
    let mut mem = AddressSpace::default();
    for (i, word) in program.iter().enumerate() {
        mem.write32(BASE + (i as u32) * 4, *word);
    }
    (CPU::with_reset_pc(BASE), mem)
}

/// Fetch and execute one instruction at the current PC
fn step(cpu: &mut CPU, mem: &mut AddressSpace) -> crate::core::error::Result<()> {
    let instruction = cpu.fetch(mem)?;
    cpu.step(mem, instruction)
}

/// Execute `n` instructions, panicking on any exception
fn run(cpu: &mut CPU, mem: &mut AddressSpace, n: usize) {
    for _ in 0..n {
        step(cpu, mem).unwrap();
    }
}
