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

//! Small test programs

/// Test program: register arithmetic
#[allow(dead_code)]
pub fn test_program_basic_arithmetic() -> Vec<u32> {
    vec![
        0x24010005, // ADDIU $1, $0, 5      ; $1 = 5
        0x24220003, // ADDIU $2, $1, 3      ; $2 = 8
        0x00221821, // ADDU  $3, $1, $2     ; $3 = 13
        0x00000000, // NOP
    ]
}

/// Test program: load/store through RAM
#[allow(dead_code)]
pub fn test_program_load_store() -> Vec<u32> {
    vec![
        0x24010100, // ADDIU $1, $0, 0x100  ; $1 = 0x100
        0x240200AA, // ADDIU $2, $0, 0xAA   ; $2 = 0xAA
        0xAC220000, // SW    $2, 0($1)      ; Store to 0x100
        0x8C230000, // LW    $3, 0($1)      ; Load from 0x100
        0x00000000, // NOP
    ]
}

/// Test program: taken branch with a delay slot
#[allow(dead_code)]
pub fn test_program_branch() -> Vec<u32> {
    vec![
        0x24010001, // ADDIU $1, $0, 1      ; $1 = 1
        0x24020001, // ADDIU $2, $0, 1      ; $2 = 1
        0x10220002, // BEQ   $1, $2, +2     ; Branch if equal
        0x24050007, // ADDIU $5, $0, 7      ; Delay slot, executed
        0x24030042, // ADDIU $3, $0, 0x42   ; Skipped
        0x24040099, // ADDIU $4, $0, 0x99   ; Branch target
    ]
}

/// Test program: call and return through JAL/JR
#[allow(dead_code)]
pub fn test_program_call() -> Vec<u32> {
    vec![
        0x0FF00004, // JAL   0xBFC00010     ; call
        0x00000000, // NOP (delay slot)
        0x24060066, // ADDIU $6, $0, 0x66   ; after return
        0x00000000, // NOP
        0x24070077, // ADDIU $7, $0, 0x77   ; subroutine
        0x03E00008, // JR    $ra
        0x00000000, // NOP (delay slot)
    ]
}

/// Test program: GIF DMA kick-off of 2 quadwords at 0x100
#[allow(dead_code)]
pub fn test_program_gif_dma() -> Vec<u32> {
    vec![
        0x3C011000, // LUI   $1, 0x1000
        0x3421A000, // ORI   $1, $1, 0xA000 ; $1 = GIF channel
        0x24020100, // ADDIU $2, $0, 0x100
        0xAC220010, // SW    $2, 0x10($1)   ; MADR
        0x24020002, // ADDIU $2, $0, 2
        0xAC220020, // SW    $2, 0x20($1)   ; QWC
        0x24020100, // ADDIU $2, $0, 0x100
        0xAC220000, // SW    $2, 0($1)      ; CHCR.STR
    ]
}

/// Get boot ROM path from environment or default location
#[allow(dead_code)]
pub fn get_bios_path() -> Option<String> {
    std::env::var("PS2_BIOS_PATH").ok().or_else(|| {
        let default_path = "SCPH-70012.BIN";
        if std::path::Path::new(default_path).exists() {
            Some(default_path.to_string())
        } else {
            None
        }
    })
}
