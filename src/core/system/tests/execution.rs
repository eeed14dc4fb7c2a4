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

use super::*;
use crate::core::cpu::ExceptionCause;
use crate::core::timer::TimerMode;

#[test]
fn test_two_instruction_program() {
    let mut system = boot(&[addiu(1, 0, 5), addiu(2, 1, 3)]);
    let start = system.pc();

    system.tick().unwrap();
    system.tick().unwrap();

    assert_eq!(system.cpu().reg(1), 5);
    assert_eq!(system.cpu().reg(2), 8);
    assert_eq!(system.pc(), start + 8);
    assert_eq!(system.tick_count(), 2);
}

#[test]
fn test_ram_program() {
    let config = Config {
        reset_pc: 0x00001000,
        ..Config::default()
    };
    let mut system = System::with_config(config).unwrap();
    let program = image(&[addiu(1, 0, 0x40), addiu(2, 0, 0x77), sw(2, 0, 1), lw(3, 0, 1)]);
    system.memory_mut().copy_block(0x1000, &program);

    system.step_n(4).unwrap();

    assert_eq!(system.memory().read32(0x40), 0x77);
    assert_eq!(system.cpu().reg(3), 0x77);
}

#[test]
fn test_jump_runs_delay_slot_in_same_tick() {
    let mut system = boot(&[
        j(ROM_KSEG1 + 16),
        addiu(1, 0, 1), // delay slot
        addiu(2, 0, 2), // skipped
        addiu(3, 0, 3), // skipped
        addiu(4, 0, 4),
    ]);

    system.tick().unwrap();

    assert_eq!(system.cpu().reg(1), 1);
    assert_eq!(system.pc(), ROM_KSEG1 + 16);
    assert_eq!(system.tick_count(), 1);

    system.tick().unwrap();
    assert_eq!(system.cpu().reg(2), 0);
    assert_eq!(system.cpu().reg(3), 0);
    assert_eq!(system.cpu().reg(4), 4);
}

#[test]
fn test_loop_in_rom() {
    // r1 counts down from 3 in a bne loop
    let mut system = boot(&[
        addiu(1, 0, 3),
        addiu(1, 1, -1),
        i_type(0x05, 1, 0, (-2i16) as u16), // bne r1, r0, -2
        NOP,
        addiu(2, 0, 0x55),
    ]);

    // Setup, three (addiu, bne+slot) iterations, then the slot NOP and
    // the final addiu once the branch falls through
    system.step_n(1 + 3 * 2 + 2).unwrap();

    assert_eq!(system.cpu().reg(1), 0);
    assert_eq!(system.cpu().reg(2), 0x55);
}

#[test]
fn test_misaligned_load_halts() {
    let mut system = boot(&[addiu(1, 0, 2), lw(2, 0, 1), NOP]);
    system.tick().unwrap();

    let err = system.tick().unwrap_err();
    assert!(matches!(
        err,
        EmulatorError::CpuException {
            cause: ExceptionCause::AddressErrorLoad,
            pc: 0xBFC00004,
            address: 2,
        }
    ));

    assert!(system.is_halted());
    assert_eq!(system.pc(), 0xBFC00004);
    assert_eq!(system.tick_count(), 1);
    assert!(system.status().contains("HALTED"));
    assert!(system.debug_log().last().contains("AddressErrorLoad"));

    assert!(matches!(
        system.tick(),
        Err(EmulatorError::Halted { pc: 0xBFC00004 })
    ));

    system.reset();
    assert!(!system.is_halted());
    system.tick().unwrap();
}

#[test]
fn test_exception_without_halt() {
    let config = Config {
        halt_on_exception: false,
        ..Config::default()
    };
    let mut system = System::with_config(config).unwrap();
    map_boot_rom(&mut system, &[addiu(1, 0, 1), sw(0, 0, 1)]);

    system.tick().unwrap();
    assert!(system.tick().unwrap_err().is_cpu_exception());
    assert!(!system.is_halted());

    // The faulting store is retried, and faults again
    assert!(matches!(
        system.tick(),
        Err(EmulatorError::CpuException {
            cause: ExceptionCause::AddressErrorStore,
            ..
        })
    ));
    assert_eq!(system.tick_count(), 1);
}

#[test]
fn test_exception_skips_devices() {
    let mut system = boot(&[addiu(1, 0, 1), lw(2, 0, 1)]);

    let timer = system.timers_mut().timer_mut(0);
    timer.write_target(100);
    timer.write_mode(TimerMode::START.bits());

    system.tick().unwrap();
    assert_eq!(system.timers().timer(0).count(), 1);

    assert!(system.tick().is_err());
    assert_eq!(system.timers().timer(0).count(), 1);
}

#[test]
fn test_rom_writes_are_ignored() {
    let mut system = boot(&[lui(1, 0xBFC0), addiu(2, 0, 0x66), sw(2, 0, 1)]);

    system.step_n(3).unwrap();

    assert_eq!(system.memory().read32(ROM_KSEG1), lui(1, 0xBFC0));
}
