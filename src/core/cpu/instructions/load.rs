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
use super::super::{ExceptionCause, CPU};
use crate::core::error::Result;
use crate::core::memory::Memory;

impl CPU {
    // === Load Instructions ===

    /// LW: Load Word (32-bit)
    ///
    /// Loads a 32-bit word from memory. The address must be 4-byte aligned.
    ///
    /// Format: lw rt, offset(rs)
    /// Operation: rt = memory[rs + sign_extend(offset)]
    ///
    /// # Arguments
    ///
    /// * `d` - Decoded instruction (rs, rt, imm)
    /// * `bus` - Memory for reading
    ///
    /// # Returns
    ///
    /// Ok(()) on success, `AddressErrorLoad` on misalignment (rt unchanged)
    pub(crate) fn op_lw<M: Memory + ?Sized>(
        &mut self,
        d: DecodedInstruction,
        bus: &mut M,
    ) -> Result<()> {
        let addr = self.reg(d.rs).wrapping_add(d.imm_se());

        if addr & 0x3 != 0 {
            return Err(self.address_error(ExceptionCause::AddressErrorLoad, addr));
        }

        let value = bus.read32(addr);
        self.set_reg(d.rt, value);
        Ok(())
    }
}
