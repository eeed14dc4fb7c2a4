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
    // === Branch Instructions ===

    /// Handle REGIMM instructions (opcode 0x01)
    ///
    /// REGIMM instructions include BLTZ, BGEZ, BLTZAL, and BGEZAL.
    /// The rt field determines which specific branch instruction it is.
    /// The linking forms write PC + 8 to r31 whether or not the branch is taken.
    ///
    /// # Arguments
    ///
    /// * `d` - Decoded instruction (rs, rt, imm)
    pub(in crate::core::cpu) fn execute_regimm(&mut self, d: DecodedInstruction) -> Result<()> {
        match d.rt {
            0x00 | 0x01 | 0x10 | 0x11 => {}
            _ => {
                log::trace!(
                    "Unimplemented REGIMM function: 0x{:02X} at PC=0x{:08X}",
                    d.rt,
                    self.pc
                );
                return Ok(());
            }
        }

        // Bit 0: BGEZ (1) vs BLTZ (0)
        // Bit 4: link (1) vs no link (0)
        let is_bgez = (d.rt & 0x01) != 0;
        let is_link = (d.rt & 0x10) != 0;

        let test = (self.reg(d.rs) as i32) >= 0;
        let should_branch = if is_bgez { test } else { !test };

        if is_link {
            self.set_reg(31, self.pc.wrapping_add(8));
        }

        if should_branch {
            self.branch(d);
        }

        Ok(())
    }

    /// BEQ: Branch on Equal
    ///
    /// Conditional branch if two registers are equal.
    ///
    /// Format: beq rs, rt, offset
    /// Operation: if (rs == rt) PC = PC + 4 + (sign_extend(offset) << 2)
    ///
    /// # Arguments
    ///
    /// * `d` - Decoded instruction (rs, rt, imm)
    pub(in crate::core::cpu) fn op_beq(&mut self, d: DecodedInstruction) -> Result<()> {
        if self.reg(d.rs) == self.reg(d.rt) {
            self.branch(d);
        }
        Ok(())
    }

    /// BNE: Branch on Not Equal
    ///
    /// Format: bne rs, rt, offset
    /// Operation: if (rs != rt) PC = PC + 4 + (sign_extend(offset) << 2)
    pub(in crate::core::cpu) fn op_bne(&mut self, d: DecodedInstruction) -> Result<()> {
        if self.reg(d.rs) != self.reg(d.rt) {
            self.branch(d);
        }
        Ok(())
    }

    /// BLEZ: Branch on Less Than or Equal to Zero (signed)
    pub(in crate::core::cpu) fn op_blez(&mut self, d: DecodedInstruction) -> Result<()> {
        if (self.reg(d.rs) as i32) <= 0 {
            self.branch(d);
        }
        Ok(())
    }

    /// BGTZ: Branch on Greater Than Zero (signed)
    pub(in crate::core::cpu) fn op_bgtz(&mut self, d: DecodedInstruction) -> Result<()> {
        if (self.reg(d.rs) as i32) > 0 {
            self.branch(d);
        }
        Ok(())
    }

    /// Take a PC-relative branch
    ///
    /// The target is relative to the delay slot: (PC + 4) + (imm_se << 2),
    /// where PC is the address of the branch itself.
    fn branch(&mut self, d: DecodedInstruction) {
        let target = self
            .pc
            .wrapping_add(4)
            .wrapping_add(d.imm_se() << 2);
        self.take_branch(target);
    }
}
