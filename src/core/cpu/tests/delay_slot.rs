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

use super::super::*;
use super::{addiu, i_type, j_type, r_type, run, setup, BASE};

/// Encoded `j` to an absolute address in the same 256 MiB segment
fn j(addr: u32) -> u32 {
    j_type(0x02, addr >> 2)
}

fn beq(rs: u8, rt: u8, words: i16) -> u32 {
    i_type(0x04, rs, rt, words as u16)
}

fn bne(rs: u8, rt: u8, words: i16) -> u32 {
    i_type(0x05, rs, rt, words as u16)
}

#[test]
fn test_jump_executes_delay_slot_then_lands_on_target() {
    let (mut cpu, mut mem) = setup(&[
        j(BASE + 0x40),
        addiu(1, 0, 7), // delay slot
        addiu(2, 0, 9), // skipped
    ]);
    run(&mut cpu, &mut mem, 1);

    assert_eq!(cpu.reg(1), 7);
    assert_eq!(cpu.reg(2), 0);
    assert_eq!(cpu.pc(), BASE + 0x40);
    assert_eq!(cpu.next_pc(), BASE + 0x44);
}

#[test]
fn test_jump_keeps_pc_segment() {
    let mut cpu = CPU::with_reset_pc(0x80001000);
    let mut mem = crate::core::memory::AddressSpace::default();
    // Executing from an unbacked address: the delay slot reads 0 (nop)
    cpu.step(&mut mem, j_type(0x02, 0x0000400)).unwrap();
    assert_eq!(cpu.pc(), 0x80001000);
}

#[test]
fn test_jal_links_past_delay_slot() {
    let (mut cpu, mut mem) = setup(&[j_type(0x03, (BASE + 0x100) >> 2), 0]);
    run(&mut cpu, &mut mem, 1);

    assert_eq!(cpu.reg(31), BASE + 8);
    assert_eq!(cpu.pc(), BASE + 0x100);
}

#[test]
fn test_jr_returns_through_register() {
    let (mut cpu, mut mem) = setup(&[r_type(31, 0, 0, 0, 0x08), addiu(4, 0, 1)]);
    cpu.set_reg(31, 0x00003000);
    run(&mut cpu, &mut mem, 1);

    assert_eq!(cpu.reg(4), 1);
    assert_eq!(cpu.pc(), 0x00003000);
}

#[test]
fn test_jalr_defaults_link_to_ra() {
    let (mut cpu, mut mem) = setup(&[r_type(5, 0, 0, 0, 0x09), 0]);
    cpu.set_reg(5, 0x00004000);
    run(&mut cpu, &mut mem, 1);

    assert_eq!(cpu.reg(31), BASE + 8);
    assert_eq!(cpu.pc(), 0x00004000);
}

#[test]
fn test_jalr_links_into_rd() {
    let (mut cpu, mut mem) = setup(&[r_type(5, 0, 6, 0, 0x09), 0]);
    cpu.set_reg(5, 0x00004000);
    run(&mut cpu, &mut mem, 1);

    assert_eq!(cpu.reg(6), BASE + 8);
    assert_eq!(cpu.reg(31), 0);
    assert_eq!(cpu.pc(), 0x00004000);
}

#[test]
fn test_jalr_same_register_uses_old_target() {
    let (mut cpu, mut mem) = setup(&[r_type(5, 0, 5, 0, 0x09), 0]);
    cpu.set_reg(5, 0x00004000);
    run(&mut cpu, &mut mem, 1);

    assert_eq!(cpu.pc(), 0x00004000);
    assert_eq!(cpu.reg(5), BASE + 8);
}

#[test]
fn test_beq_taken_target() {
    let (mut cpu, mut mem) = setup(&[beq(1, 2, 3), addiu(3, 0, 1)]);
    cpu.set_reg(1, 42);
    cpu.set_reg(2, 42);
    run(&mut cpu, &mut mem, 1);

    // PC + 4 + (3 << 2)
    assert_eq!(cpu.pc(), BASE + 16);
    assert_eq!(cpu.reg(3), 1);
}

#[test]
fn test_beq_not_taken_skips_nothing() {
    let (mut cpu, mut mem) = setup(&[beq(1, 2, 3), addiu(3, 0, 1)]);
    cpu.set_reg(1, 1);
    run(&mut cpu, &mut mem, 1);

    // Delay slot has not run yet; it is simply the next instruction
    assert_eq!(cpu.pc(), BASE + 4);
    assert_eq!(cpu.reg(3), 0);
}

#[test]
fn test_bne_backward_loop() {
    // r1 counts down from 3; the loop body is the delay slot
    let (mut cpu, mut mem) = setup(&[
        addiu(1, 0, 3),
        addiu(1, 1, -1), // loop:
        bne(1, 0, -2),   // bne r1, r0, loop
        addiu(2, 2, 1),  // delay slot: count iterations
    ]);
    run(&mut cpu, &mut mem, 1);

    for _ in 0..3 {
        run(&mut cpu, &mut mem, 2);
    }
    // Falling out of the loop: the slot runs once more as a plain instruction
    assert_eq!(cpu.pc(), BASE + 12);
    assert_eq!(cpu.reg(2), 2);
    run(&mut cpu, &mut mem, 1);

    assert_eq!(cpu.reg(1), 0);
    assert_eq!(cpu.reg(2), 3);
    assert_eq!(cpu.pc(), BASE + 16);
}

#[test]
fn test_blez_bgtz() {
    let (mut cpu, mut mem) = setup(&[i_type(0x06, 1, 0, 4), 0]);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.pc(), BASE + 20);

    let (mut cpu, mut mem) = setup(&[i_type(0x07, 1, 0, 4), 0]);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.pc(), BASE + 4);

    let (mut cpu, mut mem) = setup(&[i_type(0x07, 1, 0, 4), 0]);
    cpu.set_reg(1, 1);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.pc(), BASE + 20);
}

#[test]
fn test_regimm_branches() {
    // bltz taken for negative
    let (mut cpu, mut mem) = setup(&[i_type(0x01, 1, 0x00, 2), 0]);
    cpu.set_reg(1, 0x80000000);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.pc(), BASE + 12);

    // bgez taken for zero
    let (mut cpu, mut mem) = setup(&[i_type(0x01, 1, 0x01, 2), 0]);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.pc(), BASE + 12);
}

#[test]
fn test_bltzal_links_even_when_not_taken() {
    let (mut cpu, mut mem) = setup(&[i_type(0x01, 1, 0x10, 2), 0]);
    cpu.set_reg(1, 1);
    run(&mut cpu, &mut mem, 1);

    assert_eq!(cpu.reg(31), BASE + 8);
    assert_eq!(cpu.pc(), BASE + 4);
}

#[test]
fn test_bgezal_taken() {
    let (mut cpu, mut mem) = setup(&[i_type(0x01, 0, 0x11, 2), 0]);
    run(&mut cpu, &mut mem, 1);

    assert_eq!(cpu.reg(31), BASE + 8);
    assert_eq!(cpu.pc(), BASE + 12);
}

#[test]
fn test_branch_in_delay_slot_is_ignored() {
    let (mut cpu, mut mem) = setup(&[
        j(BASE + 0x40),
        j(BASE + 0x80), // delay slot: its jump is discarded
    ]);
    run(&mut cpu, &mut mem, 1);
    assert_eq!(cpu.pc(), BASE + 0x40);
}

#[test]
fn test_link_in_delay_slot_commits() {
    let (mut cpu, mut mem) = setup(&[
        j(BASE + 0x40),
        j_type(0x03, (BASE + 0x80) >> 2), // jal in the delay slot
    ]);
    run(&mut cpu, &mut mem, 1);

    // The register effect of the slot commits, linking past the slot itself
    assert_eq!(cpu.reg(31), BASE + 12);
    assert_eq!(cpu.pc(), BASE + 0x40);
}

#[test]
fn test_delay_slot_not_observable_between_steps() {
    let (mut cpu, mut mem) = setup(&[j(BASE + 0x40), 0]);
    run(&mut cpu, &mut mem, 1);
    assert!(!cpu.in_delay_slot());
}
