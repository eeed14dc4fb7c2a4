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

use super::super::CPU;
use crate::core::error::Result;

impl CPU {
    /// Split a 64-bit product into HI (upper word) and LO (lower word)
    fn write_hilo(&mut self, product: u64) {
        self.hi = (product >> 32) as u32;
        self.lo = product as u32;
    }

    /// MULT: signed 32x32 -> 64 multiply into HI/LO
    pub(crate) fn op_mult(&mut self, rs: u8, rt: u8) -> Result<()> {
        let product = i64::from(self.reg(rs) as i32) * i64::from(self.reg(rt) as i32);
        self.write_hilo(product as u64);
        Ok(())
    }

    /// MULTU: unsigned 32x32 -> 64 multiply into HI/LO
    pub(crate) fn op_multu(&mut self, rs: u8, rt: u8) -> Result<()> {
        self.write_hilo(u64::from(self.reg(rs)) * u64::from(self.reg(rt)));
        Ok(())
    }

    /// DIV: signed divide, LO = quotient, HI = remainder
    ///
    /// Never traps. A zero divisor gives LO = 1 for a negative dividend and
    /// 0xFFFFFFFF otherwise, with HI = dividend. `i32::MIN / -1` gives
    /// LO = 0x80000000, HI = 0.
    pub(crate) fn op_div(&mut self, rs: u8, rt: u8) -> Result<()> {
        let dividend = self.reg(rs) as i32;
        let divisor = self.reg(rt) as i32;

        let (quotient, remainder) = match divisor {
            0 => (if dividend < 0 { 1 } else { -1 }, dividend),
            _ => (
                dividend.wrapping_div(divisor),
                dividend.wrapping_rem(divisor),
            ),
        };
        self.lo = quotient as u32;
        self.hi = remainder as u32;
        Ok(())
    }

    /// DIVU: unsigned divide; a zero divisor gives LO = 0xFFFFFFFF, HI = dividend
    pub(crate) fn op_divu(&mut self, rs: u8, rt: u8) -> Result<()> {
        let dividend = self.reg(rs);
        let divisor = self.reg(rt);

        (self.lo, self.hi) = dividend
            .checked_div(divisor)
            .zip(dividend.checked_rem(divisor))
            .unwrap_or((u32::MAX, dividend));
        Ok(())
    }

    pub(crate) fn op_mfhi(&mut self, rd: u8) -> Result<()> {
        self.set_reg(rd, self.hi);
        Ok(())
    }

    pub(crate) fn op_mthi(&mut self, rs: u8) -> Result<()> {
        self.hi = self.reg(rs);
        Ok(())
    }

    pub(crate) fn op_mflo(&mut self, rd: u8) -> Result<()> {
        self.set_reg(rd, self.lo);
        Ok(())
    }

    pub(crate) fn op_mtlo(&mut self, rs: u8) -> Result<()> {
        self.lo = self.reg(rs);
        Ok(())
    }
}
