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
    // === Logical Instructions ===

    /// AND: Bitwise AND
    ///
    /// Format: and rd, rs, rt
    /// Operation: rd = rs & rt
    pub(crate) fn op_and(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        self.set_reg(rd, self.reg(rs) & self.reg(rt));
        Ok(())
    }

    /// OR: Bitwise OR
    ///
    /// Format: or rd, rs, rt
    /// Operation: rd = rs | rt
    pub(crate) fn op_or(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        self.set_reg(rd, self.reg(rs) | self.reg(rt));
        Ok(())
    }

    /// XOR: Bitwise XOR
    ///
    /// Format: xor rd, rs, rt
    /// Operation: rd = rs ^ rt
    pub(crate) fn op_xor(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        self.set_reg(rd, self.reg(rs) ^ self.reg(rt));
        Ok(())
    }

    /// NOR: Bitwise NOR
    ///
    /// Format: nor rd, rs, rt
    /// Operation: rd = !(rs | rt)
    pub(crate) fn op_nor(&mut self, rs: u8, rt: u8, rd: u8) -> Result<()> {
        self.set_reg(rd, !(self.reg(rs) | self.reg(rt)));
        Ok(())
    }

    /// ANDI: AND Immediate
    ///
    /// Format: andi rt, rs, imm
    /// Operation: rt = rs & zero_extend(imm)
    pub(crate) fn op_andi(&mut self, d: DecodedInstruction) -> Result<()> {
        self.set_reg(d.rt, self.reg(d.rs) & d.imm_ze());
        Ok(())
    }

    /// ORI: OR Immediate
    ///
    /// Performs bitwise OR between a register and a zero-extended immediate.
    ///
    /// Format: ori rt, rs, imm
    /// Operation: rt = rs | zero_extend(imm)
    ///
    /// # Arguments
    ///
    /// * `d` - Decoded instruction (rs, rt, imm)
    pub(crate) fn op_ori(&mut self, d: DecodedInstruction) -> Result<()> {
        self.set_reg(d.rt, self.reg(d.rs) | d.imm_ze());
        Ok(())
    }

    /// XORI: XOR Immediate
    ///
    /// Format: xori rt, rs, imm
    /// Operation: rt = rs ^ zero_extend(imm)
    pub(crate) fn op_xori(&mut self, d: DecodedInstruction) -> Result<()> {
        self.set_reg(d.rt, self.reg(d.rs) ^ d.imm_ze());
        Ok(())
    }

    /// LUI: Load Upper Immediate
    ///
    /// Loads the immediate into the upper 16 bits of a register, clearing the
    /// lower 16 bits.
    ///
    /// Format: lui rt, imm
    /// Operation: rt = imm << 16
    pub(crate) fn op_lui(&mut self, d: DecodedInstruction) -> Result<()> {
        self.set_reg(d.rt, d.imm_ze() << 16);
        Ok(())
    }
}
