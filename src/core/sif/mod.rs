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

//! SIF (Subsystem Interface) mailbox
//!
//! The SIF links the Emotion Engine with the I/O processor. Only the mailbox
//! and flag registers are modeled; there is no IOP behind them, so the
//! sub-to-main flag always reports the IOP as ready.
//!
//! | Address    | Register | Direction  |
//! |------------|----------|------------|
//! | 0x1000F200 | MSCOM    | EE -> IOP  |
//! | 0x1000F210 | SMCOM    | IOP -> EE  |
//! | 0x1000F220 | MSFLG    | EE -> IOP  |
//! | 0x1000F230 | SMFLG    | IOP -> EE  |
//! | 0x1D000010 | SUB_CTRL | IOP side   |

use bincode::{Decode, Encode};
use serde::{Deserialize, Serialize};

use crate::core::memory::IODevice;

/// Main-to-sub command mailbox
pub const SIF_MSCOM: u32 = 0x1000F200;
/// Sub-to-main command mailbox
pub const SIF_SMCOM: u32 = 0x1000F210;
/// Main-to-sub flag register
pub const SIF_MSFLG: u32 = 0x1000F220;
/// Sub-to-main flag register
pub const SIF_SMFLG: u32 = 0x1000F230;
/// IOP-side control register
pub const SIF_SUB_CTRL: u32 = 0x1D000010;

/// Bits forced on in SMFLG reads: the IOP has booted and is ready
pub const SMFLG_IOP_READY: u32 = 0x10001;

/// SIF mailbox registers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Encode, Decode)]
pub struct Sif {
    mscom: u32,
    smcom: u32,
    msflg: u32,
    smflg: u32,
    sub_ctrl: u32,
}

impl Sif {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

impl IODevice for Sif {
    fn address_range(&self) -> (u32, u32) {
        (SIF_MSCOM, SIF_SMFLG + 0xF)
    }

    fn contains(&self, addr: u32) -> bool {
        let (start, end) = self.address_range();
        (start..=end).contains(&addr) || addr == SIF_SUB_CTRL
    }

    fn read_register(&self, addr: u32) -> u32 {
        let value = match addr {
            SIF_MSCOM => self.mscom,
            SIF_SMCOM => self.smcom,
            SIF_MSFLG => self.msflg,
            SIF_SMFLG => self.smflg | SMFLG_IOP_READY,
            SIF_SUB_CTRL => self.sub_ctrl,
            _ => 0,
        };
        log::trace!("SIF read 0x{:08X} -> 0x{:08X}", addr, value);
        value
    }

    fn write_register(&mut self, addr: u32, value: u32) {
        log::trace!("SIF write 0x{:08X} <- 0x{:08X}", addr, value);
        match addr {
            SIF_MSCOM => self.mscom = value,
            SIF_SMCOM => self.smcom = value,
            SIF_MSFLG => self.msflg = value,
            SIF_SMFLG => self.smflg = value,
            SIF_SUB_CTRL => self.sub_ctrl = value,
            _ => {}
        }
    }

    fn name(&self) -> &str {
        "SIF"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mailboxes() {
        let mut sif = Sif::new();
        sif.write_register(SIF_MSCOM, 0x11);
        sif.write_register(SIF_SMCOM, 0x22);
        sif.write_register(SIF_MSFLG, 0x33);
        sif.write_register(SIF_SUB_CTRL, 0x44);

        assert_eq!(sif.read_register(SIF_MSCOM), 0x11);
        assert_eq!(sif.read_register(SIF_SMCOM), 0x22);
        assert_eq!(sif.read_register(SIF_MSFLG), 0x33);
        assert_eq!(sif.read_register(SIF_SUB_CTRL), 0x44);
    }

    #[test]
    fn test_smflg_reports_iop_ready() {
        let mut sif = Sif::new();
        assert_eq!(sif.read_register(SIF_SMFLG), 0x10001);

        sif.write_register(SIF_SMFLG, 0x100);
        assert_eq!(sif.read_register(SIF_SMFLG), 0x10101);
    }

    #[test]
    fn test_claims_sub_ctrl() {
        let sif = Sif::new();

        assert!(sif.contains(SIF_MSCOM));
        assert!(sif.contains(SIF_SMFLG));
        assert!(sif.contains(SIF_SUB_CTRL));
        assert!(!sif.contains(0x1000F000));
        assert!(!sif.contains(0x1D000000));
    }

    #[test]
    fn test_unknown_register() {
        let mut sif = Sif::new();
        sif.write_register(0x1000F204, 0xFFFF);

        assert_eq!(sif.read_register(0x1000F204), 0);
        assert_eq!(sif, Sif::new());
    }

    #[test]
    fn test_reset() {
        let mut sif = Sif::new();
        sif.write_register(SIF_MSCOM, 1);
        sif.reset();

        assert_eq!(sif.read_register(SIF_MSCOM), 0);
    }
}
