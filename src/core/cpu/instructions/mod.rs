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

//! CPU instruction implementations
//!
//! This module contains the integer instruction set of the Emotion Engine
//! core, organized by instruction type. Opcodes outside the implemented set
//! execute as no-ops.

use super::decode::decode;
use super::CPU;
use crate::core::error::Result;
use crate::core::memory::Memory;

// Instruction modules organized by type
mod arithmetic;
mod branch;
mod jump;
mod load;
mod logical;
mod multiply;
mod shift;
mod store;

impl CPU {
    /// Decode and execute a single instruction word
    ///
    /// This method dispatches the instruction to the appropriate handler
    /// based on its primary opcode. Branches and jumps only record their
    /// target; delay-slot sequencing is handled by [`CPU::step`].
    ///
    /// # Arguments
    ///
    /// * `bus` - Memory for loads and stores
    /// * `instruction` - The 32-bit instruction word
    ///
    /// # Returns
    ///
    /// Ok(()) on success, or an address error for a misaligned access
    pub(super) fn execute_instruction<M: Memory + ?Sized>(
        &mut self,
        bus: &mut M,
        instruction: u32,
    ) -> Result<()> {
        let d = decode(instruction);

        match d.op {
            0x00 => self.execute_special(instruction),
            0x01 => self.execute_regimm(d),
            0x02 => self.op_j(d),         // J
            0x03 => self.op_jal(d),       // JAL
            0x04 => self.op_beq(d),       // BEQ
            0x05 => self.op_bne(d),       // BNE
            0x06 => self.op_blez(d),      // BLEZ
            0x07 => self.op_bgtz(d),      // BGTZ
            0x08 => self.op_addi(d),      // ADDI
            0x09 => self.op_addiu(d),     // ADDIU
            0x0A => self.op_slti(d),      // SLTI
            0x0B => self.op_sltiu(d),     // SLTIU
            0x0C => self.op_andi(d),      // ANDI
            0x0D => self.op_ori(d),       // ORI
            0x0E => self.op_xori(d),      // XORI
            0x0F => self.op_lui(d),       // LUI
            0x23 => self.op_lw(d, bus),   // LW
            0x2B => self.op_sw(d, bus),   // SW
            _ => {
                log::trace!(
                    "Unimplemented opcode: 0x{:02X} at PC=0x{:08X}",
                    d.op,
                    self.pc
                );
                Ok(())
            }
        }
    }

    /// Handle SPECIAL instructions (opcode 0x00)
    ///
    /// SPECIAL instructions use the lower 6 bits (funct field) to determine
    /// the specific operation.
    pub(super) fn execute_special(&mut self, instruction: u32) -> Result<()> {
        let d = decode(instruction);
        let (rs, rt, rd, sa) = (d.rs, d.rt, d.rd, d.sa);

        match d.funct {
            0x00 => self.op_sll(rt, rd, sa), // SLL
            0x02 => self.op_srl(rt, rd, sa), // SRL
            0x03 => self.op_sra(rt, rd, sa), // SRA
            0x04 => self.op_sllv(rs, rt, rd), // SLLV
            0x06 => self.op_srlv(rs, rt, rd), // SRLV
            0x07 => self.op_srav(rs, rt, rd), // SRAV
            0x08 => self.op_jr(rs),           // JR
            0x09 => self.op_jalr(rs, rd),     // JALR
            0x10 => self.op_mfhi(rd),         // MFHI
            0x11 => self.op_mthi(rs),         // MTHI
            0x12 => self.op_mflo(rd),         // MFLO
            0x13 => self.op_mtlo(rs),         // MTLO
            0x18 => self.op_mult(rs, rt),     // MULT
            0x19 => self.op_multu(rs, rt),    // MULTU
            0x1A => self.op_div(rs, rt),      // DIV
            0x1B => self.op_divu(rs, rt),     // DIVU
            0x20 => self.op_add(rs, rt, rd),  // ADD
            0x21 => self.op_addu(rs, rt, rd), // ADDU
            0x22 => self.op_sub(rs, rt, rd),  // SUB
            0x23 => self.op_subu(rs, rt, rd), // SUBU
            0x24 => self.op_and(rs, rt, rd),  // AND
            0x25 => self.op_or(rs, rt, rd),   // OR
            0x26 => self.op_xor(rs, rt, rd),  // XOR
            0x27 => self.op_nor(rs, rt, rd),  // NOR
            0x2A => self.op_slt(rs, rt, rd),  // SLT
            0x2B => self.op_sltu(rs, rt, rd), // SLTU
            _ => {
                log::trace!(
                    "Unimplemented SPECIAL function: 0x{:02X} at PC=0x{:08X}",
                    d.funct,
                    self.pc
                );
                Ok(())
            }
        }
    }
}
