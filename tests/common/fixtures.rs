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

//! Test fixtures for common test scenarios

use std::sync::Arc;

use ps2rx::core::memory::ImageKind;
use ps2rx::core::system::System;

/// Physical base of the boot ROM
#[allow(dead_code)]
pub const ROM0_BASE: u32 = 0x1FC00000;

/// Reset vector (KSEG1 view of the boot ROM)
#[allow(dead_code)]
pub const RESET_VECTOR: u32 = 0xBFC00000;

/// Encode a program as a little-endian image
#[allow(dead_code)]
pub fn program_image(program: &[u32]) -> Arc<[u8]> {
    program
        .iter()
        .flat_map(|word| word.to_le_bytes())
        .collect::<Vec<u8>>()
        .into()
}

/// Create a System booting `program` from the reset vector
#[allow(dead_code)]
pub fn boot_system(program: &[u32]) -> System {
    let image = program_image(program);
    let size = image.len() as u32;

    let mut system = System::new();
    system.map_image(ImageKind::Rom0, ROM0_BASE, image);
    system.alias_image(RESET_VECTOR, ROM0_BASE, size);
    system
}

/// Run `n` ticks, panicking with the status text on failure
#[allow(dead_code)]
pub fn run_ticks(system: &mut System, n: u64) {
    if let Err(e) = system.step_n(n) {
        panic!("tick failed: {}\n{}", e, system.status());
    }
}
