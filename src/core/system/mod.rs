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

//! System integration module
//!
//! This module ties together the emulator components (CPU, address space,
//! DMA, timers, INTC, SIF, GS stub) and drives them one tick at a time.
//!
//! # Tick
//!
//! Every tick runs, in this order:
//!
//! 1. Fetch the instruction word at PC
//! 2. Execute it (and its delay slot when it branches)
//! 3. Step the DMA controller
//! 4. Advance the timers, raising INTC bits on compare events
//!
//! A CPU exception aborts the tick before DMA and timers run.

mod bus;

#[cfg(test)]
mod tests;

pub use bus::Bus;

use std::path::Path;
use std::sync::Arc;

use super::config::Config;
use super::cpu::{CpuState, Disassembler, CPU};
use super::debug_log::DebugLog;
use super::dma::Dma;
use super::error::{EmulatorError, Result};
use super::gs::GsStub;
use super::interrupt::InterruptController;
use super::memory::{AddressSpace, ImageKind, ImageRegion, Memory};
use super::sif::Sif;
use super::timer::Timers;

/// PlayStation 2 Emotion Engine system
///
/// Owns every component; separate instances share nothing.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use ps2rx::core::memory::ImageKind;
/// use ps2rx::core::system::System;
///
/// let mut system = System::new();
///
/// // addiu r1, r0, 5
/// let rom: Arc<[u8]> = Arc::from(0x24010005u32.to_le_bytes().to_vec());
/// system.map_image(ImageKind::Rom0, 0x1FC00000, rom);
/// system.alias_image(0xBFC00000, 0x1FC00000, 4);
///
/// system.tick().unwrap();
/// assert_eq!(system.cpu().reg(1), 5);
/// assert_eq!(system.pc(), 0xBFC00004);
/// assert_eq!(system.tick_count(), 1);
/// ```
pub struct System {
    /// CPU instance
    cpu: CPU,
    /// RAM and firmware images
    memory: AddressSpace,
    /// DMA controller
    dma: Dma,
    /// Timers 0-3
    timers: Timers,
    /// Interrupt controller
    intc: InterruptController,
    /// SIF mailbox
    sif: Sif,
    /// GIF packet sink
    gs: GsStub,
    /// Recent events
    debug_log: DebugLog,
    config: Config,
    /// Completed ticks since reset
    tick_count: u64,
    /// Set after an exception when `halt_on_exception` is enabled
    halted: bool,
}

impl System {
    /// Create a system with the default configuration
    pub fn new() -> Self {
        Self::build(Config::default(), AddressSpace::default())
    }

    /// Create a system from a configuration
    ///
    /// # Errors
    ///
    /// Fails if the configuration does not validate.
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate()?;
        let memory = AddressSpace::new(config.ram_size)?;
        Ok(Self::build(config, memory))
    }

    fn build(config: Config, memory: AddressSpace) -> Self {
        log::info!(
            "System: {} KiB RAM, reset PC 0x{:08X}, {} cycle(s) per tick",
            config.ram_size / 1024,
            config.reset_pc,
            config.cycles_per_tick
        );

        Self {
            cpu: CPU::with_reset_pc(config.reset_pc),
            memory,
            dma: Dma::new(),
            timers: Timers::with_policy(config.timer_irq_policy),
            intc: InterruptController::new(),
            sif: Sif::new(),
            gs: GsStub::new(),
            debug_log: DebugLog::with_capacity(config.debug_log_capacity),
            config,
            tick_count: 0,
            halted: false,
        }
    }

    /// Reset the system to initial state
    ///
    /// Clears RAM and every device but keeps the mapped firmware images.
    pub fn reset(&mut self) {
        self.cpu.reset();
        self.memory.reset();
        self.dma.reset();
        self.timers.reset();
        self.intc.reset();
        self.sif.reset();
        self.gs.reset();
        self.debug_log.clear();
        self.tick_count = 0;
        self.halted = false;
        log::info!("System reset (PC=0x{:08X})", self.cpu.pc());
    }

    /// Map a firmware image read-only at `base`
    pub fn map_image(&mut self, kind: ImageKind, base: u32, data: Arc<[u8]>) {
        let size = data.len();
        self.memory.map_image(kind, base, data);
        if size > 0 {
            self.debug_log
                .push(format!("{} mapped at 0x{:08X} ({} bytes)", kind, base, size));
        }
    }

    /// Expose the image mapped at `phys_base` at `alias_base` as well
    pub fn alias_image(&mut self, alias_base: u32, phys_base: u32, size: u32) -> bool {
        self.memory.alias_image(alias_base, phys_base, size)
    }

    /// Keep a firmware image that is not mapped for execution
    pub fn store_image(&mut self, kind: ImageKind, data: Arc<[u8]>) {
        let size = data.len();
        self.memory.store_image(kind, data);
        if size > 0 {
            self.debug_log.push(format!("{} stored ({} bytes)", kind, size));
        }
    }

    /// Read a firmware image from disk and map it at `base`
    ///
    /// # Returns
    ///
    /// The shared image buffer
    ///
    /// # Errors
    ///
    /// `ImageNotFound` if the file does not exist or is empty, `Io` for
    /// other read failures.
    pub fn load_image<P: AsRef<Path>>(
        &mut self,
        kind: ImageKind,
        base: u32,
        path: P,
    ) -> Result<Arc<[u8]>> {
        let data = read_image_file(kind, path.as_ref())?;
        self.map_image(kind, base, Arc::clone(&data));
        Ok(data)
    }

    /// Read a firmware image from disk and keep it unmapped
    ///
    /// # Errors
    ///
    /// Same as [`load_image`](Self::load_image).
    pub fn load_unmapped_image<P: AsRef<Path>>(
        &mut self,
        kind: ImageKind,
        path: P,
    ) -> Result<Arc<[u8]>> {
        let data = read_image_file(kind, path.as_ref())?;
        self.store_image(kind, Arc::clone(&data));
        Ok(data)
    }

    /// Run one fetch, execute, DMA, timers sequence
    ///
    /// # Errors
    ///
    /// - `CpuException` if the instruction faulted; DMA and timers do not run
    ///   and the tick counter does not advance
    /// - `Halted` if an earlier exception halted the system
    pub fn tick(&mut self) -> Result<()> {
        if self.halted {
            return Err(EmulatorError::Halted { pc: self.cpu.pc() });
        }

        let executed = {
            let mut bus = Bus::new(
                &mut self.memory,
                &mut self.dma,
                &mut self.timers,
                &mut self.intc,
                &mut self.sif,
            );
            self.cpu
                .fetch(&bus)
                .and_then(|instruction| self.cpu.step(&mut bus, instruction))
        };
        if let Err(e) = executed {
            return Err(self.fault(e));
        }

        let qwc = self.dma.step(&self.memory, &mut self.gs);
        if qwc > 0 {
            self.debug_log.push(format!("DMA GIF transfer | qwc={}", qwc));
        }

        let raised = self.timers.step(self.config.cycles_per_tick, &mut self.intc);
        if !raised.is_empty() {
            log::trace!("Timer interrupts raised: {:?}", raised);
        }

        self.tick_count += 1;
        Ok(())
    }

    /// Record a CPU exception and halt when configured to
    fn fault(&mut self, error: EmulatorError) -> EmulatorError {
        log::warn!("{}", error);
        self.debug_log.push(error.to_string());

        if self.config.halt_on_exception {
            self.halted = true;
            log::warn!("System halted at PC=0x{:08X}", self.cpu.pc());
        }
        error
    }

    /// Run `n` ticks, stopping at the first error
    ///
    /// # Example
    ///
    /// ```
    /// use ps2rx::core::system::System;
    ///
    /// let mut system = System::new();
    /// // Unmapped memory reads as NOP
    /// system.step_n(10).unwrap();
    /// assert_eq!(system.tick_count(), 10);
    /// ```
    pub fn step_n(&mut self, n: u64) -> Result<()> {
        for _ in 0..n {
            self.tick()?;
        }
        Ok(())
    }

    /// Human-readable status summary
    ///
    /// The format is a debugging aid and may change.
    pub fn status(&self) -> String {
        let state = if self.halted {
            "HALTED"
        } else if self.memory.image(ImageKind::Rom0).is_none() {
            "NO BIOS"
        } else {
            "RUNNING"
        };

        let pc = self.cpu.pc();
        let instruction = self.memory.read32(pc);

        let images: Vec<String> = ImageKind::ALL
            .iter()
            .filter_map(|&kind| self.memory.image(kind))
            .map(|region| {
                let unmapped = if region.is_mapped() { "" } else { " (unmapped)" };
                format!("{}: {} bytes{}", region.kind(), region.size(), unmapped)
            })
            .collect();

        format!(
            "PC: 0x{:08X} | Ticks: {} | {}\n\
             Instr: 0x{:08X}  {}\n\
             $ra=0x{:08X} $gp=0x{:08X} $k0=0x{:08X}\n\
             Images: {}\n\
             Last: {}",
            pc,
            self.tick_count,
            state,
            instruction,
            Disassembler::disassemble(instruction, pc),
            self.cpu.reg(31),
            self.cpu.reg(28),
            self.cpu.reg(26),
            if images.is_empty() {
                "none".to_string()
            } else {
                images.join(", ")
            },
            self.debug_log.last()
        )
    }

    /// Get current PC value
    pub fn pc(&self) -> u32 {
        self.cpu.pc()
    }

    /// Completed ticks since reset
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Borrow every addressable device as one bus
    ///
    /// Reads and writes through the bus behave exactly like guest loads and
    /// stores.
    pub fn bus(&mut self) -> Bus<'_> {
        Bus::new(
            &mut self.memory,
            &mut self.dma,
            &mut self.timers,
            &mut self.intc,
            &mut self.sif,
        )
    }

    /// Snapshot of the CPU registers
    pub fn cpu_state(&self) -> CpuState {
        self.cpu.state()
    }

    /// Firmware image of the given kind, mapped or stored
    pub fn image(&self, kind: ImageKind) -> Option<&ImageRegion> {
        self.memory.image(kind)
    }

    pub fn cpu(&self) -> &CPU {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU {
        &mut self.cpu
    }

    pub fn memory(&self) -> &AddressSpace {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut AddressSpace {
        &mut self.memory
    }

    pub fn dma(&self) -> &Dma {
        &self.dma
    }

    pub fn dma_mut(&mut self) -> &mut Dma {
        &mut self.dma
    }

    pub fn timers(&self) -> &Timers {
        &self.timers
    }

    pub fn timers_mut(&mut self) -> &mut Timers {
        &mut self.timers
    }

    pub fn intc(&self) -> &InterruptController {
        &self.intc
    }

    pub fn intc_mut(&mut self) -> &mut InterruptController {
        &mut self.intc
    }

    pub fn sif(&self) -> &Sif {
        &self.sif
    }

    pub fn sif_mut(&mut self) -> &mut Sif {
        &mut self.sif
    }

    pub fn gs(&self) -> &GsStub {
        &self.gs
    }

    pub fn debug_log(&self) -> &DebugLog {
        &self.debug_log
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resume counting from a restored save state
    pub(crate) fn restore_tick_count(&mut self, tick_count: u64) {
        self.tick_count = tick_count;
        self.halted = false;
    }
}

impl Default for System {
    fn default() -> Self {
        Self::new()
    }
}

/// Read a whole image file, rejecting missing and empty files
fn read_image_file(kind: ImageKind, path: &Path) -> Result<Arc<[u8]>> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => EmulatorError::ImageNotFound(path.display().to_string()),
        _ => EmulatorError::Io(e),
    })?;
    if bytes.is_empty() {
        return Err(EmulatorError::ImageNotFound(format!(
            "{} (empty file)",
            path.display()
        )));
    }

    log::info!("Loaded {} image from {}", kind, path.display());
    Ok(Arc::from(bytes))
}
