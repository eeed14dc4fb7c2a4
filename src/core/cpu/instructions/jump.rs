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
    // === Jump Instructions ===

    /// J: Jump
    ///
    /// Unconditional jump to target address.
    /// The target address is formed by combining the upper 4 bits of PC
    /// with the 26-bit target field shifted left by 2.
    ///
    /// Format: j target
    /// Operation: PC = (PC & 0xF0000000) | (target << 2)
    ///
    /// # Arguments
    ///
    /// * `d` - Decoded instruction (target)
    pub(crate) fn op_j(&mut self, d: DecodedInstruction) -> Result<()> {
        let pc_high = self.pc & 0xF0000000;
        self.take_branch(pc_high | (d.target << 2));
        Ok(())
    }

    /// JAL: Jump and Link
    ///
    /// Unconditional jump to target address, saving return address in r31.
    /// The return address is the address of the instruction after the delay slot.
    ///
    /// Format: jal target
    /// Operation: r31 = PC + 8; PC = (PC & 0xF0000000) | (target << 2)
    pub(crate) fn op_jal(&mut self, d: DecodedInstruction) -> Result<()> {
        self.set_reg(31, self.pc.wrapping_add(8));
        self.op_j(d)
    }

    /// JR: Jump Register
    ///
    /// Format: jr rs
    /// Operation: PC = rs
    pub(crate) fn op_jr(&mut self, rs: u8) -> Result<()> {
        self.take_branch(self.reg(rs));
        Ok(())
    }

    /// JALR: Jump And Link Register
    ///
    /// Unconditional jump to address in register, saving return address.
    /// The target is read before the link is written, so `jalr rs, rs`
    /// still jumps to the old value.
    ///
    /// Format: jalr rd, rs
    /// Operation: rd = PC + 8; PC = rs
    ///
    /// # Arguments
    ///
    /// * `rs` - Source register containing target address
    /// * `rd` - Destination register for return address (r31 if 0)
    pub(crate) fn op_jalr(&mut self, rs: u8, rd: u8) -> Result<()> {
        let target = self.reg(rs);
        let link = if rd == 0 { 31 } else { rd };
        self.set_reg(link, self.pc.wrapping_add(8));
        self.take_branch(target);
        Ok(())
    }
}
