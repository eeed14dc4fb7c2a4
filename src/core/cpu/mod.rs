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

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::core::error::{EmulatorError, Result};
use crate::core::memory::Memory;

/// Emotion Engine integer core emulation
///
/// # Specifications
/// - Architecture: MIPS (32-bit integer subset of the R5900)
/// - Registers: 32 general-purpose registers + HI/LO
/// - Branches: one architectural delay slot, executed within the same step
///
/// # Example
/// ```
/// use ps2rx::core::cpu::CPU;
///
/// let mut cpu = CPU::new();
/// cpu.reset();
/// assert_eq!(cpu.reg(0), 0); // r0 is always 0
/// assert_eq!(cpu.pc(), 0xBFC00000);
/// ```
pub struct CPU {
    /// General purpose registers (r0-r31)
    ///
    /// r0 is hardwired to always return 0
    regs: [u32; 32],

    /// Program counter
    pc: u32,

    /// Successor of `pc` (always `pc + 4` between steps)
    next_pc: u32,

    /// HI register (multiplication/division result upper 32 bits)
    hi: u32,

    /// LO register (multiplication/division result lower 32 bits)
    lo: u32,

    /// Address the CPU returns to on reset
    reset_pc: u32,

    /// Target recorded by a taken branch or jump during the current instruction
    branch_target: Option<u32>,

    /// Whether the instruction currently executing sits in a delay slot
    in_delay_slot: bool,

    /// Current instruction (for debugging)
    current_instruction: u32,
}

/// Exception cause codes
///
/// Values match the ExcCode field of the MIPS CAUSE register. Only address
/// errors are raised by this core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u32)]
pub enum ExceptionCause {
    /// Address error on load or instruction fetch
    AddressErrorLoad = 4,
    /// Address error on store
    AddressErrorStore = 5,
}

/// Serializable snapshot of the CPU register file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct CpuState {
    pub regs: [u32; 32],
    pub pc: u32,
    pub next_pc: u32,
    pub hi: u32,
    pub lo: u32,
}

// Module declarations
mod decode;
mod disassembler;
mod instructions;
#[cfg(test)]
mod tests;

// Re-exports
pub use decode::{decode, DecodedInstruction};
pub use disassembler::Disassembler;

/// Default reset vector (KSEG1 view of the boot ROM)
pub const RESET_VECTOR: u32 = 0xBFC00000;

/// Conventional register names used by status output and the disassembler
pub const REG_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3", "t0", "t1", "t2", "t3", "t4", "t5", "t6",
    "t7", "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "t8", "t9", "k0", "k1", "gp", "sp",
    "fp", "ra",
];

impl CPU {
    /// Create a new CPU instance starting at the default reset vector
    ///
    /// The CPU is initialized with the following state:
    /// - All general purpose registers, HI and LO: 0
    /// - PC: 0xBFC00000 (boot ROM entry point)
    /// - next_pc: 0xBFC00004
    pub fn new() -> Self {
        Self::with_reset_pc(RESET_VECTOR)
    }

    /// Create a new CPU instance that resets to `reset_pc`
    ///
    /// # Arguments
    /// - `reset_pc`: Address of the first instruction after reset
    pub fn with_reset_pc(reset_pc: u32) -> Self {
        Self {
            regs: [0u32; 32],
            pc: reset_pc,
            next_pc: reset_pc.wrapping_add(4),
            hi: 0,
            lo: 0,
            reset_pc,
            branch_target: None,
            in_delay_slot: false,
            current_instruction: 0,
        }
    }

    /// Reset CPU to initial state
    ///
    /// Clears every register and returns the PC to the reset address.
    pub fn reset(&mut self) {
        self.regs = [0u32; 32];
        self.pc = self.reset_pc;
        self.next_pc = self.reset_pc.wrapping_add(4);
        self.hi = 0;
        self.lo = 0;
        self.branch_target = None;
        self.in_delay_slot = false;
        self.current_instruction = 0;
    }

    /// Read from general purpose register
    ///
    /// # Arguments
    /// - `index`: Register number (0-31)
    ///
    /// # Returns
    /// Register value. r0 always returns 0.
    ///
    /// # Example
    /// ```
    /// use ps2rx::core::cpu::CPU;
    ///
    /// let cpu = CPU::new();
    /// assert_eq!(cpu.reg(0), 0);
    /// ```
    #[inline(always)]
    pub fn reg(&self, index: u8) -> u32 {
        if index == 0 {
            0
        } else {
            self.regs[(index & 0x1F) as usize]
        }
    }

    /// Write to general purpose register
    ///
    /// # Arguments
    /// - `index`: Register number (0-31)
    /// - `value`: Value to write
    ///
    /// # Note
    /// Writes to r0 are ignored (r0 is always 0).
    ///
    /// # Example
    /// ```
    /// use ps2rx::core::cpu::CPU;
    ///
    /// let mut cpu = CPU::new();
    /// cpu.set_reg(1, 0x12345678);
    /// assert_eq!(cpu.reg(1), 0x12345678);
    ///
    /// // Writes to r0 are ignored
    /// cpu.set_reg(0, 0xDEADBEEF);
    /// assert_eq!(cpu.reg(0), 0);
    /// ```
    #[inline(always)]
    pub fn set_reg(&mut self, index: u8, value: u32) {
        if index != 0 {
            self.regs[(index & 0x1F) as usize] = value;
        }
    }

    /// Get current PC value
    pub fn pc(&self) -> u32 {
        self.pc
    }

    /// Get the successor of the current PC
    pub fn next_pc(&self) -> u32 {
        self.next_pc
    }

    /// Move execution to `pc`
    ///
    /// Any pending branch is dropped and `next_pc` becomes `pc + 4`.
    pub fn set_pc(&mut self, pc: u32) {
        self.pc = pc;
        self.next_pc = pc.wrapping_add(4);
        self.branch_target = None;
    }

    pub fn hi(&self) -> u32 {
        self.hi
    }

    pub fn lo(&self) -> u32 {
        self.lo
    }

    /// Last instruction word handed to [`CPU::step`]
    pub fn current_instruction(&self) -> u32 {
        self.current_instruction
    }

    /// Check if currently executing a branch delay slot
    ///
    /// Only observable from inside instruction handlers; always false between steps.
    pub fn in_delay_slot(&self) -> bool {
        self.in_delay_slot
    }

    /// Fetch the instruction word at the current PC
    ///
    /// # Errors
    ///
    /// A PC that is not word aligned raises `AddressErrorLoad`.
    pub fn fetch<M: Memory + ?Sized>(&self, bus: &M) -> Result<u32> {
        if self.pc & 0x3 != 0 {
            return Err(self.address_error(ExceptionCause::AddressErrorLoad, self.pc));
        }
        Ok(bus.read32(self.pc))
    }

    /// Execute one instruction, including its delay slot when it branches
    ///
    /// The instruction at `pc` is executed first. If it resolves to a taken
    /// branch or jump, the instruction at `pc + 4` runs immediately with its
    /// own branch effects discarded, then execution continues at the target.
    /// Otherwise `pc` advances by 4.
    ///
    /// # Arguments
    ///
    /// * `bus` - Memory used for loads, stores and the delay-slot fetch
    /// * `instruction` - The word fetched from the current PC
    ///
    /// # Errors
    ///
    /// A misaligned load or store in either instruction aborts the step.
    /// Register and memory effects already committed are kept, but `pc` is
    /// restored to the faulting step's address and `next_pc` to `pc + 4`.
    ///
    /// # Example
    ///
    /// ```
    /// use ps2rx::core::cpu::CPU;
    /// use ps2rx::core::memory::AddressSpace;
    ///
    /// let mut cpu = CPU::with_reset_pc(0x0000_1000);
    /// let mut mem = AddressSpace::default();
    ///
    /// // addiu r1, r0, 5
    /// cpu.step(&mut mem, 0x24010005).unwrap();
    /// assert_eq!(cpu.reg(1), 5);
    /// assert_eq!(cpu.pc(), 0x0000_1004);
    /// ```
    pub fn step<M: Memory + ?Sized>(&mut self, bus: &mut M, instruction: u32) -> Result<()> {
        let pc = self.pc;
        self.branch_target = None;
        self.in_delay_slot = false;

        let result = self.execute_with_delay_slot(bus, pc, instruction);

        self.branch_target = None;
        self.in_delay_slot = false;

        match result {
            Ok(new_pc) => {
                self.pc = new_pc;
                self.next_pc = new_pc.wrapping_add(4);
                Ok(())
            }
            Err(e) => {
                self.pc = pc;
                self.next_pc = pc.wrapping_add(4);
                log::trace!("Step aborted at PC=0x{:08X}: {}", pc, e);
                Err(e)
            }
        }
    }

    /// Run the instruction at `pc` and, if it branched, its delay slot
    ///
    /// Returns the address of the next instruction to execute.
    fn execute_with_delay_slot<M: Memory + ?Sized>(
        &mut self,
        bus: &mut M,
        pc: u32,
        instruction: u32,
    ) -> Result<u32> {
        self.current_instruction = instruction;
        self.execute_instruction(bus, instruction)?;

        let Some(target) = self.branch_target.take() else {
            return Ok(pc.wrapping_add(4));
        };

        let slot_pc = pc.wrapping_add(4);
        self.pc = slot_pc;
        self.next_pc = slot_pc.wrapping_add(4);
        self.in_delay_slot = true;

        let slot_instruction = bus.read32(slot_pc);
        self.current_instruction = slot_instruction;
        self.execute_instruction(bus, slot_instruction)?;

        // A branch inside the delay slot has no effect
        if let Some(ignored) = self.branch_target.take() {
            log::trace!(
                "Ignoring branch to 0x{:08X} in delay slot at PC=0x{:08X}",
                ignored,
                slot_pc
            );
        }

        Ok(target)
    }

    /// Record a taken branch or jump for the current instruction
    #[inline(always)]
    pub(super) fn take_branch(&mut self, target: u32) {
        self.branch_target = Some(target);
    }

    /// Build an address error for the instruction at the current PC
    pub(super) fn address_error(&self, cause: ExceptionCause, address: u32) -> EmulatorError {
        EmulatorError::CpuException {
            cause,
            pc: self.pc,
            address,
        }
    }

    /// Capture the register file
    pub fn state(&self) -> CpuState {
        CpuState {
            regs: self.regs,
            pc: self.pc,
            next_pc: self.next_pc,
            hi: self.hi,
            lo: self.lo,
        }
    }

    /// Restore a register file captured by [`CPU::state`]
    pub fn restore(&mut self, state: &CpuState) {
        self.regs = state.regs;
        self.regs[0] = 0;
        self.pc = state.pc;
        self.next_pc = state.next_pc;
        self.hi = state.hi;
        self.lo = state.lo;
        self.branch_target = None;
        self.in_delay_slot = false;
    }

    /// Format all CPU registers for debugging
    ///
    /// Produces PC/next PC, HI/LO and the 32 general-purpose registers in
    /// rows of four.
    pub fn dump_registers(&self) -> String {
        let mut out = format!(
            "PC: 0x{:08X}  Next PC: 0x{:08X}\nHI: 0x{:08X}  LO: 0x{:08X}\n",
            self.pc, self.next_pc, self.hi, self.lo
        );
        for row in 0..8u8 {
            let line: Vec<String> = (0..4u8)
                .map(|col| {
                    let i = row * 4 + col;
                    format!("{:>4}: 0x{:08X}", REG_NAMES[i as usize], self.reg(i))
                })
                .collect();
            out.push_str(&line.join("  "));
            out.push('\n');
        }
        out
    }
}

impl Default for CPU {
    fn default() -> Self {
        Self::new()
    }
}
