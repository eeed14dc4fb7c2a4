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

//! Emulator configuration
//!
//! Configuration is read from a TOML file. Every field is optional; missing
//! fields take their defaults.
//!
//! # Config File Format
//!
//! ```toml
//! # ps2rx.toml
//!
//! # Main RAM size in bytes (power of two)
//! ram_size = 2097152
//!
//! # First instruction after reset
//! reset_pc = 0xBFC00000
//!
//! # Cycles the timers advance per tick
//! cycles_per_tick = 1
//!
//! # Stop ticking after a CPU exception until reset
//! halt_on_exception = true
//!
//! # "always", or { mode_bit = 8 } to require a MODE bit
//! timer_irq_policy = "always"
//!
//! # Messages kept by the debug log
//! debug_log_capacity = 100
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::cpu::RESET_VECTOR;
use crate::core::debug_log::DEFAULT_DEBUG_LOG_CAPACITY;
use crate::core::error::{EmulatorError, Result};
use crate::core::memory::DEFAULT_RAM_SIZE;
use crate::core::timer::CompareIrqPolicy;

/// Largest supported RAM size (the RAM window must fit below 0x80000000)
const MAX_RAM_SIZE: usize = 1 << 31;

/// ps2rx configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Main RAM size in bytes
    pub ram_size: usize,

    /// Program counter after reset
    pub reset_pc: u32,

    /// Cycles the timers advance on every tick
    pub cycles_per_tick: u32,

    /// Halt the system after a CPU exception
    pub halt_on_exception: bool,

    /// When a timer compare raises its interrupt bit
    pub timer_irq_policy: CompareIrqPolicy,

    /// Capacity of the debug message log
    pub debug_log_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ram_size: DEFAULT_RAM_SIZE,
            reset_pc: RESET_VECTOR,
            cycles_per_tick: 1,
            halt_on_exception: true,
            timer_irq_policy: CompareIrqPolicy::Always,
            debug_log_capacity: DEFAULT_DEBUG_LOG_CAPACITY,
        }
    }
}

impl Config {
    /// Parse and validate a configuration from TOML text
    ///
    /// # Example
    ///
    /// ```
    /// use ps2rx::core::config::Config;
    /// use ps2rx::core::timer::CompareIrqPolicy;
    ///
    /// let config = Config::from_toml_str("timer_irq_policy = { mode_bit = 8 }").unwrap();
    /// assert_eq!(config.timer_irq_policy, CompareIrqPolicy::ModeBit(8));
    /// assert_eq!(config.cycles_per_tick, 1);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(text).map_err(|e| EmulatorError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Config` if it does not
    /// parse or fails validation.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)
            .map_err(|e| EmulatorError::Config(format!("{}: {}", path.display(), e)))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if !self.ram_size.is_power_of_two() || self.ram_size > MAX_RAM_SIZE {
            return Err(EmulatorError::InvalidRamSize {
                size: self.ram_size,
            });
        }
        if self.cycles_per_tick == 0 {
            return Err(EmulatorError::Config(
                "cycles_per_tick must be at least 1".to_string(),
            ));
        }
        if let CompareIrqPolicy::ModeBit(bit) = self.timer_irq_policy {
            if bit >= 32 {
                return Err(EmulatorError::Config(format!(
                    "timer_irq_policy mode_bit {} is out of range",
                    bit
                )));
            }
        }
        Ok(())
    }

    /// Render the configuration as TOML
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| EmulatorError::Config(e.to_string()))
    }
}
