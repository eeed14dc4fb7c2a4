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

use std::path::PathBuf;

use clap::Parser;
use log::{error, info, warn};
use ps2rx::core::config::Config;
use ps2rx::core::error::{EmulatorError, Result};
use ps2rx::core::memory::{nvm_mac_address, ImageKind};
use ps2rx::core::save_state::SaveState;
use ps2rx::core::system::System;

/// Physical base of the main boot ROM
const ROM0_BASE: u32 = 0x1FC00000;
/// Cached and uncached views of the boot ROM
const ROM0_ALIASES: [u32; 2] = [0x9FC00000, 0xBFC00000];
const ROM1_BASE: u32 = 0x1E000000;
const EROM_BASE: u32 = 0x1E040000;
const ROM2_BASE: u32 = 0x1E400000;

/// Environment variable naming a config file
const CONFIG_ENV: &str = "PS2RX_CONFIG";

/// PlayStation 2 Emotion Engine core runner
#[derive(Parser)]
#[command(name = "ps2rx")]
#[command(about = "PlayStation 2 Emotion Engine core", long_about = None)]
struct Args {
    /// Path to the main boot ROM (ROM0)
    bios_file: PathBuf,

    /// DVD player ROM
    #[arg(long)]
    rom1: Option<PathBuf>,

    /// Chinese font ROM
    #[arg(long)]
    rom2: Option<PathBuf>,

    /// Encrypted DVD ROM
    #[arg(long)]
    erom: Option<PathBuf>,

    /// NVM configuration image
    #[arg(long)]
    nvm: Option<PathBuf>,

    /// Mechacon firmware
    #[arg(long)]
    mec: Option<PathBuf>,

    /// Number of ticks to run
    #[arg(short = 'n', long, default_value = "100000")]
    ticks: u64,

    /// TOML config file (overrides PS2RX_CONFIG)
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Resume from a save state before running
    #[arg(long)]
    load_state: Option<PathBuf>,

    /// Write a save state when finished
    #[arg(long)]
    save_state: Option<PathBuf>,

    /// Write the final CPU registers as JSON
    #[arg(long)]
    dump_state: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<Config> {
    let path = args
        .config
        .clone()
        .or_else(|| std::env::var_os(CONFIG_ENV).map(PathBuf::from));

    match path {
        Some(path) => Config::from_file(path),
        None => Ok(Config::default()),
    }
}

/// Map the firmware parts given on the command line
fn load_firmware(system: &mut System, args: &Args) -> Result<()> {
    info!("Loading BIOS from: {}", args.bios_file.display());
    let rom0 = system.load_image(ImageKind::Rom0, ROM0_BASE, &args.bios_file)?;
    for alias in ROM0_ALIASES {
        system.alias_image(alias, ROM0_BASE, rom0.len() as u32);
    }

    let optional = [
        (ImageKind::Rom1, ROM1_BASE, &args.rom1),
        (ImageKind::Erom, EROM_BASE, &args.erom),
        (ImageKind::Rom2, ROM2_BASE, &args.rom2),
    ];
    for (kind, base, path) in optional {
        if let Some(path) = path {
            system.load_image(kind, base, path)?;
        }
    }

    if let Some(path) = &args.nvm {
        let nvm = system.load_unmapped_image(ImageKind::Nvm, path)?;
        match nvm_mac_address(&nvm) {
            Some(mac) => info!("Loaded NVM MAC: {}", mac),
            None => warn!("NVM image too short for a MAC address ({} bytes)", nvm.len()),
        }
    }
    if let Some(path) = &args.mec {
        system.load_unmapped_image(ImageKind::Mec, path)?;
    }

    Ok(())
}

fn main() -> Result<()> {
    // Load .env file if present
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize logger with default level INFO
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    info!("ps2rx v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();
    let config = load_config(&args)?;
    let mut system = System::with_config(config)?;

    if let Err(e) = load_firmware(&mut system, &args) {
        error!("Failed to load firmware: {}", e);
        return Err(e);
    }

    if let Some(path) = &args.load_state {
        SaveState::load_from_file(path)?.apply_to(&mut system)?;
    }

    info!("Starting emulation...");
    let total = args.ticks;
    let log_interval = (total / 10).max(1);
    let mut outcome = Ok(());

    for i in 0..total {
        if i % log_interval == 0 && i > 0 {
            info!(
                "Progress: {}/{} ticks | PC: 0x{:08X}",
                i,
                total,
                system.pc()
            );
        }

        if let Err(e) = system.tick() {
            error!("Error at PC=0x{:08X}: {}", system.pc(), e);
            error!("Tick count: {}", system.tick_count());
            error!("{}", system.cpu().dump_registers());
            outcome = Err(e);
            break;
        }
    }

    println!("{}", system.status());

    if let Some(path) = &args.dump_state {
        let json = serde_json::to_string_pretty(&system.cpu_state())
            .map_err(|e| EmulatorError::SaveState(e.to_string()))?;
        std::fs::write(path, json)?;
        info!("CPU state written to {}", path.display());
    }

    if let Some(path) = &args.save_state {
        SaveState::from_system(&system).save_to_file(path)?;
    }

    outcome
}
