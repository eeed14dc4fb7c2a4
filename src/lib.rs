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

//! PlayStation 2 Emotion Engine execution core
//!
//! This library models the EE integer core together with the pieces it
//! talks to every tick: main RAM and firmware images, the DMA controller,
//! the timers and the interrupt controller.
//!
//! # Example
//!
//! ```
//! use ps2rx::core::cpu::CPU;
//! use ps2rx::core::memory::{AddressSpace, Memory};
//!
//! let mut cpu = CPU::with_reset_pc(0x1000);
//! let mut mem = AddressSpace::default();
//! mem.write32(0x1000, 0x24010005); // addiu r1, r0, 5
//!
//! let instruction = cpu.fetch(&mem).unwrap();
//! cpu.step(&mut mem, instruction).unwrap();
//! assert_eq!(cpu.reg(1), 5);
//! ```

pub mod core;
