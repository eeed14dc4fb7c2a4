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

use super::super::decode::DecodedInstruction;
use super::super::CPU;
use crate::core::error::Result;

impl CPU {
    // === Arithmetic Instructions ===
    //
    // Overflow traps are not modeled: ADD, ADDI and SUB wrap like their
    // unsigned counterparts.

    /// ADD: Add
    ///
    /// Format: add rd, rs, rt
    /// Operation: rd = rs + rt (wrapping)
    pub(crate) fn op_add(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        self.op_addu(rs, rt, rd)
    }

    /// ADDU: Add Unsigned
    ///
    /// Adds two registers without overflow detection.
    /// Overflow wraps around (modulo 2^32).
    ///
    /// Format: addu rd, rs, rt
    /// Operation: rd = rs + rt
    ///
    /// # Arguments
    ///
    /// * `rs` - First source register
    /// * `rt` - Second source register
    /// * `rd` - Destination register
    pub(crate) fn op_addu(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = self.reg(rs).wrapping_add(self.reg(rt));
        self.set_reg(rd, result);
        Ok(())
    }

    /// SUB: Subtract
    ///
    /// Format: sub rd, rs, rt
    /// Operation: rd = rs - rt (wrapping)
    pub(crate) fn op_sub(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        self.op_subu(rs, rt, rd)
    }

    /// SUBU: Subtract Unsigned
    ///
    /// Format: subu rd, rs, rt
    /// Operation: rd = rs - rt
    pub(crate) fn op_subu(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = self.reg(rs).wrapping_sub(self.reg(rt));
        self.set_reg(rd, result);
        Ok(())
    }

    /// ADDI: Add Immediate
    ///
    /// Format: addi rt, rs, imm
    /// Operation: rt = rs + sign_extend(imm) (wrapping)
    pub(crate) fn op_addi(&mut self, d: DecodedInstruction) -> Result<()> {
        self.op_addiu(d)
    }

    /// ADDIU: Add Immediate Unsigned
    ///
    /// Adds a sign-extended immediate value to a register without overflow detection.
    /// Despite the name "unsigned", the immediate is sign-extended.
    ///
    /// Format: addiu rt, rs, imm
    /// Operation: rt = rs + sign_extend(imm)
    ///
    /// # Arguments
    ///
    /// * `d` - Decoded instruction (rs, rt, imm)
    pub(crate) fn op_addiu(&mut self, d: DecodedInstruction) -> Result<()> {
        let result = self.reg(d.rs).wrapping_add(d.imm_se());
        self.set_reg(d.rt, result);
        Ok(())
    }

    /// SLT: Set on Less Than (signed)
    ///
    /// Format: slt rd, rs, rt
    /// Operation: rd = (rs < rt) ? 1 : 0
    pub(crate) fn op_slt(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = ((self.reg(rs) as i32) < (self.reg(rt) as i32)) as u32;
        self.set_reg(rd, result);
        Ok(())
    }

    /// SLTU: Set on Less Than Unsigned
    ///
    /// Format: sltu rd, rs, rt
    /// Operation: rd = (rs < rt) ? 1 : 0
    pub(crate) fn op_sltu(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        let result = (self.reg(rs) < self.reg(rt)) as u32;
        self.set_reg(rd, result);
        Ok(())
    }

    /// SLTI: Set on Less Than Immediate (signed)
    ///
    /// Format: slti rt, rs, imm
    /// Operation: rt = (rs < sign_extend(imm)) ? 1 : 0
    pub(crate) fn op_slti(&mut self, d: DecodedInstruction) -> Result<()> {
        let result = ((self.reg(d.rs) as i32) < (d.imm_se() as i32)) as u32;
        self.set_reg(d.rt, result);
        Ok(())
    }

    /// SLTIU: Set on Less Than Immediate Unsigned
    ///
    /// The immediate is sign-extended, then compared as unsigned.
    ///
    /// Format: sltiu rt, rs, imm
    /// Operation: rt = (rs < sign_extend(imm)) ? 1 : 0
    pub(crate) fn op_sltiu(&mut self, d: DecodedInstruction) -> Result<()> {
        let result = (self.reg(d.rs) < d.imm_se()) as u32;
        self.set_reg(d.rt, result);
        Ok(())
    }
}
