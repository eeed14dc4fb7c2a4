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

/// Decoded MIPS instruction word
///
/// Every field is extracted at its fixed bit position regardless of the
/// instruction format, so the consumer picks whichever fields its opcode uses.
///
/// Format:
/// ```text
/// R-type: | op (6) | rs (5) | rt (5) | rd (5) | sa (5) | funct (6) |
/// I-type: | op (6) | rs (5) | rt (5) |       immediate (16)        |
/// J-type: | op (6) |                target (26)                    |
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodedInstruction {
    /// Primary opcode (bits 31..26)
    pub op: u8,
    /// Source register (bits 25..21)
    pub rs: u8,
    /// Target register (bits 20..16)
    pub rt: u8,
    /// Destination register (bits 15..11)
    pub rd: u8,
    /// Shift amount (bits 10..6)
    pub sa: u8,
    /// SPECIAL function field (bits 5..0)
    pub funct: u8,
    /// Raw 16-bit immediate (bits 15..0)
    pub imm: u16,
    /// Raw 26-bit jump target (bits 25..0)
    pub target: u32,
}

impl DecodedInstruction {
    /// Immediate sign-extended to 32 bits
    #[inline(always)]
    pub fn imm_se(&self) -> u32 {
        self.imm as i16 as i32 as u32
    }

    /// Immediate zero-extended to 32 bits
    #[inline(always)]
    pub fn imm_ze(&self) -> u32 {
        self.imm as u32
    }
}

/// Decode a raw instruction word
///
/// Pure bit masking: never fails and never looks at CPU state.
///
/// # Arguments
///
/// * `word` - The 32-bit instruction
///
/// # Example
///
/// ```
/// use ps2rx::core::cpu::decode;
///
/// // addiu r2, r1, -1
/// let d = decode(0x2422FFFF);
/// assert_eq!(d.op, 0x09);
/// assert_eq!(d.rs, 1);
/// assert_eq!(d.rt, 2);
/// assert_eq!(d.imm_se(), 0xFFFFFFFF);
/// assert_eq!(d.imm_ze(), 0x0000FFFF);
/// ```
#[inline(always)]
pub fn decode(word: u32) -> DecodedInstruction {
    DecodedInstruction {
        op: ((word >> 26) & 0x3F) as u8,
        rs: ((word >> 21) & 0x1F) as u8,
        rt: ((word >> 16) & 0x1F) as u8,
        rd: ((word >> 11) & 0x1F) as u8,
        sa: ((word >> 6) & 0x1F) as u8,
        funct: (word & 0x3F) as u8,
        imm: (word & 0xFFFF) as u16,
        target: word & 0x03FFFFFF,
    }
}
