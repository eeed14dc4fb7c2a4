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

//! Emotion Engine Timer/Counter Implementation
//!
//! Four timers advance by the cycles elapsed each tick and raise their bit in
//! the interrupt controller when their count reaches the compare target.
//!
//! ## Register Layout
//!
//! Timer `n` lives at `0x10000000 + n * 0x800`:
//! - `+0x00`: COUNT - counter value (R/W)
//! - `+0x10`: MODE - mode register (R/W)
//! - `+0x20`: COMP - compare target (R/W)
//! - `+0x30`: HOLD - not modeled (reads 0, writes ignored)
//!
//! ## Mode Register Format
//!
//! ```text
//! 9:  Overflow interrupt enable (not modeled)
//! 8:  Compare interrupt enable (see CompareIrqPolicy)
//! 7:  Start (1 = counting)
//! 6:  Clear count on compare
//! ```
//!
//! ## Compare Events
//!
//! A compare event happens when the count reaches or passes a non-zero target
//! during one advance, including when the count wraps. A count sitting at or
//! past its target does not fire again until it crosses the target anew.

use bincode::{Decode, Encode};
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::core::interrupt::{Interrupt, InterruptController};
use crate::core::memory::IODevice;

#[cfg(test)]
mod tests;

/// Number of timers
pub const TIMER_COUNT: usize = 4;

/// Base address of timer 0
pub const TIMER_BASE: u32 = 0x10000000;

/// Distance between timer blocks
pub const TIMER_STRIDE: u32 = 0x800;

/// Register offsets inside a timer block
const REG_COUNT: u32 = 0x00;
const REG_MODE: u32 = 0x10;
const REG_COMP: u32 = 0x20;
const REG_HOLD: u32 = 0x30;

bitflags! {
    /// Named bits of the MODE register
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct TimerMode: u32 {
        const CLEAR_ON_COMPARE = 1 << 6;
        const START = 1 << 7;
        const COMPARE_IRQ = 1 << 8;
        const OVERFLOW_IRQ = 1 << 9;
    }
}

/// When a compare event raises the timer's interrupt bit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Encode, Decode)]
#[serde(rename_all = "snake_case")]
pub enum CompareIrqPolicy {
    /// Every compare event raises the interrupt
    #[default]
    Always,
    /// Raise only when the given MODE bit is set
    ModeBit(u8),
}

impl CompareIrqPolicy {
    fn allows(self, mode: u32) -> bool {
        match self {
            CompareIrqPolicy::Always => true,
            CompareIrqPolicy::ModeBit(bit) => bit < 32 && mode & (1 << bit) != 0,
        }
    }
}

/// A single timer
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Timer {
    count: u32,
    mode: u32,
    target: u32,
    running: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline(always)]
    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn write_count(&mut self, value: u32) {
        self.count = value;
    }

    pub fn mode(&self) -> u32 {
        self.mode
    }

    pub fn target(&self) -> u32 {
        self.target
    }

    pub fn write_target(&mut self, value: u32) {
        self.target = value;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Write the MODE register
    ///
    /// The START bit decides whether the timer runs; stopping a timer also
    /// zeroes its count.
    pub fn write_mode(&mut self, value: u32) {
        self.mode = value;
        self.running = TimerMode::from_bits_retain(value).contains(TimerMode::START);
        if !self.running {
            self.count = 0;
        }
    }

    /// Advance by `cycles`
    ///
    /// # Returns
    ///
    /// `true` if a compare event happened during this advance
    pub fn advance(&mut self, cycles: u32) -> bool {
        if !self.running || cycles == 0 {
            return false;
        }

        let old = self.count;
        let (new, wrapped) = old.overflowing_add(cycles);
        self.count = new;

        let hit = self.target > 0
            && if wrapped {
                old < self.target || self.target <= new
            } else {
                old < self.target && self.target <= new
            };

        if hit && TimerMode::from_bits_retain(self.mode).contains(TimerMode::CLEAR_ON_COMPARE) {
            self.count = 0;
        }
        hit
    }
}

/// The four EE timers
///
/// # Example
///
/// ```
/// use ps2rx::core::interrupt::{Interrupt, InterruptController};
/// use ps2rx::core::timer::{TimerMode, Timers};
///
/// let mut timers = Timers::new();
/// let mut intc = InterruptController::new();
///
/// timers.timer_mut(1).write_target(100);
/// timers.timer_mut(1).write_mode((TimerMode::START | TimerMode::CLEAR_ON_COMPARE).bits());
///
/// timers.step(100, &mut intc);
/// assert_eq!(intc.pending(), Interrupt::TIMER1);
/// assert_eq!(timers.timer(1).count(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Timers {
    timers: [Timer; TIMER_COUNT],
    policy: CompareIrqPolicy,
}

impl Timers {
    pub fn new() -> Self {
        Self::with_policy(CompareIrqPolicy::default())
    }

    pub fn with_policy(policy: CompareIrqPolicy) -> Self {
        Self {
            timers: Default::default(),
            policy,
        }
    }

    /// Stop and clear every timer, keeping the interrupt policy
    pub fn reset(&mut self) {
        self.timers = Default::default();
    }

    pub fn policy(&self) -> CompareIrqPolicy {
        self.policy
    }

    /// # Panics
    ///
    /// Panics if `index >= TIMER_COUNT`.
    pub fn timer(&self, index: usize) -> &Timer {
        &self.timers[index]
    }

    pub fn timer_mut(&mut self, index: usize) -> &mut Timer {
        &mut self.timers[index]
    }

    /// Advance every running timer by `cycles`
    ///
    /// Compare events set the matching INTC bit when the policy allows it.
    ///
    /// # Returns
    ///
    /// The interrupt bits raised during this step
    pub fn step(&mut self, cycles: u32, intc: &mut InterruptController) -> Interrupt {
        let mut raised = Interrupt::empty();

        for (i, timer) in self.timers.iter_mut().enumerate() {
            if !timer.advance(cycles) {
                continue;
            }

            if self.policy.allows(timer.mode) {
                log::trace!("Timer {} compare event (target 0x{:08X})", i, timer.target);
                raised |= Interrupt::timer(i);
            } else {
                log::trace!("Timer {} compare event masked by mode 0x{:08X}", i, timer.mode);
            }
        }

        if !raised.is_empty() {
            intc.request(raised);
        }
        raised
    }

    /// Split a register address into (timer index, block offset)
    #[inline(always)]
    fn decode_address(addr: u32) -> (usize, u32) {
        let index = ((addr & 0x1FFF) >> 11) as usize;
        (index, addr & (TIMER_STRIDE - 1))
    }
}

impl Default for Timers {
    fn default() -> Self {
        Self::new()
    }
}

impl IODevice for Timers {
    fn address_range(&self) -> (u32, u32) {
        (TIMER_BASE, TIMER_BASE + TIMER_STRIDE * TIMER_COUNT as u32 - 1)
    }

    fn read_register(&self, addr: u32) -> u32 {
        let (index, offset) = Self::decode_address(addr);
        let timer = &self.timers[index];

        match offset {
            REG_COUNT => timer.count,
            REG_MODE => timer.mode,
            REG_COMP => timer.target,
            _ => 0,
        }
    }

    fn write_register(&mut self, addr: u32, value: u32) {
        let (index, offset) = Self::decode_address(addr);
        let timer = &mut self.timers[index];

        match offset {
            REG_COUNT => {
                timer.write_count(value);
                log::trace!("Timer {} count = 0x{:08X}", index, value);
            }
            REG_MODE => {
                timer.write_mode(value);
                log::debug!(
                    "Timer {} mode = 0x{:08X} (running={}, clear_on_compare={})",
                    index,
                    value,
                    timer.running,
                    value & TimerMode::CLEAR_ON_COMPARE.bits() != 0
                );
            }
            REG_COMP => {
                timer.write_target(value);
                log::trace!("Timer {} target = 0x{:08X}", index, value);
            }
            REG_HOLD => {}
            _ => log::trace!("Ignored timer write 0x{:08X} to 0x{:08X}", value, addr),
        }
    }

    fn name(&self) -> &str {
        "Timers"
    }
}
