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

//! Save state serialization
//!
//! A save state captures everything a guest can observe: CPU registers,
//! main RAM and the register state of the DMA controller, timers, INTC and
//! SIF. Firmware images are not included; a state is applied to a system
//! that already has its images mapped.
//!
//! # Save State Format
//!
//! Save states are serialized with bincode (standard configuration) and
//! carry a version number. Loading a state with a different version fails.
//!
//! # Example
//!
//! ```no_run
//! use ps2rx::core::save_state::SaveState;
//! use ps2rx::core::System;
//!
//! let mut system = System::new();
//! system.step_n(100).unwrap();
//!
//! SaveState::from_system(&system).save_to_file("ps2rx.state").unwrap();
//!
//! let state = SaveState::load_from_file("ps2rx.state").unwrap();
//! state.apply_to(&mut system).unwrap();
//! ```

use bincode::{config, Decode, Encode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::core::cpu::CpuState;
use crate::core::dma::Dma;
use crate::core::error::{EmulatorError, Result};
use crate::core::interrupt::InterruptController;
use crate::core::sif::Sif;
use crate::core::system::System;
use crate::core::timer::Timers;

/// Save state version for compatibility checking
///
/// Incremented whenever the format changes incompatibly.
pub const SAVE_STATE_VERSION: u32 = 1;

/// Complete emulator save state
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
pub struct SaveState {
    /// Version number for compatibility checking
    pub version: u32,

    pub metadata: SaveStateMetadata,

    /// CPU registers
    pub cpu: CpuState,

    /// Main RAM contents
    pub ram: Vec<u8>,

    /// DMA channels and controller registers
    pub dma: Dma,

    /// Timers 0-3
    pub timers: Timers,

    /// INTC status and mask
    pub interrupts: InterruptController,

    /// SIF mailboxes
    pub sif: Sif,
}

/// When the save state was taken
#[derive(Debug, Clone, Serialize, Deserialize, Encode, Decode)]
#[bincode(encode_bounds = "", decode_bounds = "")]
pub struct SaveStateMetadata {
    /// Timestamp when the save state was created
    #[bincode(with_serde)]
    pub timestamp: DateTime<Utc>,

    /// Tick count at save time
    pub tick_count: u64,
}

impl SaveState {
    /// Capture the current state of `system`
    pub fn from_system(system: &System) -> Self {
        Self {
            version: SAVE_STATE_VERSION,
            metadata: SaveStateMetadata {
                timestamp: Utc::now(),
                tick_count: system.tick_count(),
            },
            cpu: system.cpu_state(),
            ram: system.memory().ram().to_vec(),
            dma: system.dma().clone(),
            timers: system.timers().clone(),
            interrupts: system.intc().clone(),
            sif: system.sif().clone(),
        }
    }

    /// Restore this state into `system`
    ///
    /// Mapped images are left untouched and a halted system resumes.
    ///
    /// # Errors
    ///
    /// Fails if the saved RAM size differs from the system's.
    pub fn apply_to(&self, system: &mut System) -> Result<()> {
        let ram = system.memory_mut().ram_mut();
        if ram.len() != self.ram.len() {
            return Err(EmulatorError::SaveState(format!(
                "RAM size mismatch: state has {} bytes, system has {}",
                self.ram.len(),
                ram.len()
            )));
        }
        ram.copy_from_slice(&self.ram);

        system.cpu_mut().restore(&self.cpu);
        *system.dma_mut() = self.dma.clone();
        *system.timers_mut() = self.timers.clone();
        *system.intc_mut() = self.interrupts.clone();
        *system.sif_mut() = self.sif.clone();
        system.restore_tick_count(self.metadata.tick_count);

        log::info!(
            "Save state applied (tick {}, saved {})",
            self.metadata.tick_count,
            self.metadata.timestamp
        );
        Ok(())
    }

    /// Save state to file
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be written or encoding fails.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let encoded = bincode::encode_to_vec(self, config::standard())
            .map_err(|e| EmulatorError::SaveState(e.to_string()))?;
        let mut file = File::create(path.as_ref())?;
        file.write_all(&encoded)?;

        log::info!(
            "Saved state to {} ({} bytes)",
            path.as_ref().display(),
            encoded.len()
        );
        Ok(())
    }

    /// Load state from file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be opened or read
    /// - Decoding fails
    /// - Version is incompatible
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path.as_ref())?;
        let mut buffer = Vec::new();
        file.read_to_end(&mut buffer)?;

        let (state, _): (SaveState, usize) =
            bincode::decode_from_slice(&buffer, config::standard())
                .map_err(|e| EmulatorError::SaveState(e.to_string()))?;

        if state.version != SAVE_STATE_VERSION {
            return Err(EmulatorError::SaveState(format!(
                "Incompatible save state version: expected {}, got {}",
                SAVE_STATE_VERSION, state.version
            )));
        }

        log::info!("Loaded state from {}", path.as_ref().display());
        Ok(state)
    }
}
