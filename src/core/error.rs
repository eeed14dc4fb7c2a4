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

/// Emulator error types
use thiserror::Error;

use super::cpu::ExceptionCause;

/// Result type for emulator operations
pub type Result<T> = std::result::Result<T, EmulatorError>;

/// Main error type for the emulator
#[derive(Error, Debug)]
pub enum EmulatorError {
    /// The only hard failure the CPU signals: a misaligned word access
    /// during fetch, load or store. The program counter is left unchanged.
    #[error("CPU exception: {cause:?} at PC=0x{pc:08X} (address 0x{address:08X})")]
    CpuException {
        cause: ExceptionCause,
        pc: u32,
        address: u32,
    },

    #[error("System halted at PC=0x{pc:08X}; reset required")]
    Halted { pc: u32 },

    #[error("Invalid RAM size: {size} bytes (must be a non-zero power of two)")]
    InvalidRamSize { size: usize },

    #[error("Firmware image not found: {0}")]
    ImageNotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Save state error: {0}")]
    SaveState(String),
}

impl EmulatorError {
    /// Whether this error is a guest-visible CPU exception
    pub fn is_cpu_exception(&self) -> bool {
        matches!(self, EmulatorError::CpuException { .. })
    }
}
