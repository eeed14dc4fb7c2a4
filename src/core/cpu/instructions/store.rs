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
    // === Store Instructions ===

    /// SW: Store Word (32-bit)
    ///
    /// Stores a 32-bit word to memory. The address must be 4-byte aligned.
    ///
    /// Format: sw rt, offset(rs)
    /// Operation: memory[rs + sign_extend(offset)] = rt
    ///
    /// # Returns
    ///
    /// Ok(()) on success, `AddressErrorStore` on misalignment (memory untouched)
    pub(crate) fn op_sw<M: Memory + ?Sized>(
        &mut self,
        d: DecodedInstruction,
        bus: &mut M,
    ) -> Result<()> {
        let addr = self.reg(d.rs).wrapping_add(d.imm_se());

        if addr & 0x3 != 0 {
            return Err(self.address_error(ExceptionCause::AddressErrorStore, addr));
        }

        bus.write32(addr, self.reg(d.rt));
        Ok(())
    }
}
