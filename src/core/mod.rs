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

//! Core emulation components
//!
//! This module contains the Emotion Engine execution core:
//! - CPU (MIPS integer core with branch delay slots)
//! - Address space (RAM and firmware images)
//! - DMA controller feeding the GS packet sink
//! - Timers and interrupt controller
//! - SIF mailbox
//! - System integration (tick orchestration, save states)

pub mod config;
pub mod cpu;
pub mod debug_log;
pub mod dma;
pub mod error;
pub mod gs;
pub mod interrupt;
pub mod memory;
pub mod save_state;
pub mod sif;
pub mod system;
pub mod timer;

// Re-export commonly used types
pub use config::Config;
pub use cpu::CPU;
pub use error::{EmulatorError, Result};
pub use memory::{AddressSpace, ImageKind};
pub use save_state::SaveState;
pub use system::System;
pub use timer::Timers;
