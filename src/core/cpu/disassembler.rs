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

//! MIPS instruction disassembler for debugging
//!
//! Converts instruction words to assembly text using conventional register
//! names (`$ra`, `$sp`, ...). Branch and jump targets are printed as absolute
//! addresses.

use super::decode::{decode, DecodedInstruction};
use super::REG_NAMES;

/// Instruction disassembler
///
/// # Example
/// ```
/// use ps2rx::core::cpu::Disassembler;
///
/// assert_eq!(Disassembler::disassemble(0x00000000, 0xBFC00000), "nop");
/// assert_eq!(Disassembler::disassemble(0x3C011234, 0xBFC00000), "lui $at, 0x1234");
/// ```
pub struct Disassembler;

/// Register name with its `$` prefix
fn r(index: u8) -> String {
    format!("${}", REG_NAMES[(index & 0x1F) as usize])
}

/// Absolute target of a PC-relative branch at `pc`
fn branch_target(d: &DecodedInstruction, pc: u32) -> u32 {
    pc.wrapping_add(4).wrapping_add(d.imm_se() << 2)
}

impl Disassembler {
    /// Disassemble a single instruction
    ///
    /// # Arguments
    ///
    /// * `instruction` - The 32-bit instruction to disassemble
    /// * `pc` - Address of the instruction (used for branch and jump targets)
    ///
    /// Words outside the decoded set come back as `??? 0xXXXXXXXX`.
    pub fn disassemble(instruction: u32, pc: u32) -> String {
        let d = decode(instruction);
        let (rs, rt) = (r(d.rs), r(d.rt));
        let simm = d.imm as i16;

        match d.op {
            0x00 => Self::disasm_special(instruction, &d),
            0x01 => Self::disasm_regimm(instruction, &d, pc),
            0x02 | 0x03 => {
                let name = if d.op == 0x02 { "j" } else { "jal" };
                let addr = (pc & 0xF0000000) | (d.target << 2);
                format!("{} 0x{:08X}", name, addr)
            }
            0x04 => format!("beq {}, {}, 0x{:08X}", rs, rt, branch_target(&d, pc)),
            0x05 => format!("bne {}, {}, 0x{:08X}", rs, rt, branch_target(&d, pc)),
            0x06 => format!("blez {}, 0x{:08X}", rs, branch_target(&d, pc)),
            0x07 => format!("bgtz {}, 0x{:08X}", rs, branch_target(&d, pc)),
            0x08 => format!("addi {}, {}, {}", rt, rs, simm),
            0x09 => format!("addiu {}, {}, {}", rt, rs, simm),
            0x0A => format!("slti {}, {}, {}", rt, rs, simm),
            0x0B => format!("sltiu {}, {}, {}", rt, rs, simm),
            0x0C => format!("andi {}, {}, 0x{:04X}", rt, rs, d.imm),
            0x0D => format!("ori {}, {}, 0x{:04X}", rt, rs, d.imm),
            0x0E => format!("xori {}, {}, 0x{:04X}", rt, rs, d.imm),
            0x0F => format!("lui {}, 0x{:04X}", rt, d.imm),
            0x23 => format!("lw {}, {}({})", rt, simm, rs),
            0x2B => format!("sw {}, {}({})", rt, simm, rs),
            _ => format!("??? 0x{:08X}", instruction),
        }
    }

    /// Disassemble SPECIAL (opcode 0x00) instruction
    fn disasm_special(instruction: u32, d: &DecodedInstruction) -> String {
        let (rs, rt, rd) = (r(d.rs), r(d.rt), r(d.rd));

        let three_reg = |name: &str| format!("{} {}, {}, {}", name, rd, rs, rt);
        let shift_imm = |name: &str| format!("{} {}, {}, {}", name, rd, rt, d.sa);
        let shift_var = |name: &str| format!("{} {}, {}, {}", name, rd, rt, rs);

        match d.funct {
            0x00 if instruction == 0 => "nop".to_string(),
            0x00 => shift_imm("sll"),
            0x02 => shift_imm("srl"),
            0x03 => shift_imm("sra"),
            0x04 => shift_var("sllv"),
            0x06 => shift_var("srlv"),
            0x07 => shift_var("srav"),
            0x08 => format!("jr {}", rs),
            0x09 if d.rd == 0 || d.rd == 31 => format!("jalr {}", rs),
            0x09 => format!("jalr {}, {}", rd, rs),
            0x10 => format!("mfhi {}", rd),
            0x11 => format!("mthi {}", rs),
            0x12 => format!("mflo {}", rd),
            0x13 => format!("mtlo {}", rs),
            0x18 => format!("mult {}, {}", rs, rt),
            0x19 => format!("multu {}, {}", rs, rt),
            0x1A => format!("div {}, {}", rs, rt),
            0x1B => format!("divu {}, {}", rs, rt),
            0x20 => three_reg("add"),
            0x21 => three_reg("addu"),
            0x22 => three_reg("sub"),
            0x23 => three_reg("subu"),
            0x24 => three_reg("and"),
            0x25 => three_reg("or"),
            0x26 => three_reg("xor"),
            0x27 => three_reg("nor"),
            0x2A => three_reg("slt"),
            0x2B => three_reg("sltu"),
            _ => format!("??? 0x{:08X}", instruction),
        }
    }

    /// Disassemble REGIMM (opcode 0x01) instruction
    fn disasm_regimm(instruction: u32, d: &DecodedInstruction, pc: u32) -> String {
        let name = match d.rt {
            0x00 => "bltz",
            0x01 => "bgez",
            0x10 => "bltzal",
            0x11 => "bgezal",
            _ => return format!("??? 0x{:08X}", instruction),
        };
        format!("{} {}, 0x{:08X}", name, r(d.rs), branch_target(d, pc))
    }
}
