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

//! Read-only image regions
//!
//! Firmware parts are mapped as immutable regions backed by shared buffers.
//! A region can be reached through its own base and through any number of
//! alias bases; aliases share the backing data of the region they point at.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::AddressSpace;

/// Kind of firmware image
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ImageKind {
    /// Main boot ROM (also called ROM0 or BIOS)
    Rom0,
    /// DVD player ROM
    Rom1,
    /// Chinese font ROM
    Rom2,
    /// Encrypted DVD ROM
    Erom,
    /// Non-volatile configuration memory
    Nvm,
    /// Mechacon firmware
    Mec,
}

impl ImageKind {
    /// All image kinds, in load order
    pub const ALL: [ImageKind; 6] = [
        ImageKind::Rom0,
        ImageKind::Rom1,
        ImageKind::Rom2,
        ImageKind::Erom,
        ImageKind::Nvm,
        ImageKind::Mec,
    ];

    /// Short uppercase name used in logs and status output
    pub fn name(self) -> &'static str {
        match self {
            ImageKind::Rom0 => "ROM0",
            ImageKind::Rom1 => "ROM1",
            ImageKind::Rom2 => "ROM2",
            ImageKind::Erom => "EROM",
            ImageKind::Nvm => "NVM",
            ImageKind::Mec => "MEC",
        }
    }
}

/// MAC address stored in the first six bytes of an NVM image
///
/// # Example
///
/// ```
/// use ps2rx::core::memory::nvm_mac_address;
///
/// let nvm = [0x00, 0x04, 0x1F, 0xAB, 0xCD, 0xEF, 0xFF];
/// assert_eq!(nvm_mac_address(&nvm).as_deref(), Some("00:04:1F:AB:CD:EF"));
/// assert_eq!(nvm_mac_address(&nvm[..5]), None);
/// ```
pub fn nvm_mac_address(nvm: &[u8]) -> Option<String> {
    let mac = nvm.get(..6)?;
    Some(
        mac.iter()
            .map(|b| format!("{:02X}", b))
            .collect::<Vec<_>>()
            .join(":"),
    )
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A read-only firmware image
///
/// Most images are mapped at a base address. `size` may be smaller than the
/// backing buffer when the region is an alias created with an explicit size.
/// Images kept with [`AddressSpace::store_image`] are not mapped: reads never
/// reach them and their base is 0.
#[derive(Debug, Clone)]
pub struct ImageRegion {
    kind: ImageKind,
    base: u32,
    size: u32,
    /// Size requested for an alias, reapplied when its source is remapped
    window: u32,
    data: Arc<[u8]>,
    /// Base of the region this alias was created from, `None` for the original mapping
    alias_of: Option<u32>,
    mapped: bool,
}

impl ImageRegion {
    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    pub fn base(&self) -> u32 {
        self.base
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Shared backing buffer
    pub fn data(&self) -> &Arc<[u8]> {
        &self.data
    }

    pub fn is_alias(&self) -> bool {
        self.alias_of.is_some()
    }

    /// Whether guest reads can reach this image
    pub fn is_mapped(&self) -> bool {
        self.mapped
    }

    /// Read a little-endian word at `addr` if the whole word lies inside the region
    #[inline]
    fn read32(&self, addr: u32) -> Option<u32> {
        let offset = addr.checked_sub(self.base)? as usize;
        if offset + 4 > self.size as usize {
            return None;
        }
        let bytes = self.data.get(offset..offset + 4)?;
        Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }
}

/// Buffer length as a region size; bytes past 4 GiB are unreachable
fn region_size(data: &[u8]) -> u32 {
    u32::try_from(data.len()).unwrap_or(u32::MAX)
}

impl AddressSpace {
    /// Install a read-only image at `base`
    ///
    /// The buffer is shared, never copied. An empty buffer is ignored.
    /// There is at most one image per kind: an earlier image of the same kind
    /// is dropped together with its aliases. Aliases of a region replaced at
    /// `base` follow the new buffer.
    ///
    /// # Arguments
    ///
    /// * `kind` - Which firmware part this is
    /// * `base` - Address of the first byte
    /// * `data` - Shared image contents
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use ps2rx::core::memory::{AddressSpace, ImageKind, Memory};
    ///
    /// let mut mem = AddressSpace::default();
    /// let rom: Arc<[u8]> = Arc::from(vec![0x78, 0x56, 0x34, 0x12]);
    /// mem.map_image(ImageKind::Rom0, 0x1FC00000, rom);
    /// assert_eq!(mem.read32(0x1FC00000), 0x12345678);
    /// ```
    pub fn map_image(&mut self, kind: ImageKind, base: u32, data: Arc<[u8]>) {
        if data.is_empty() {
            log::debug!("Ignoring empty {} image at 0x{:08X}", kind, base);
            return;
        }

        self.drop_kind(kind, Some(base));

        let size = region_size(&data);
        for alias in self
            .images
            .values_mut()
            .filter(|region| region.alias_of == Some(base))
        {
            alias.kind = kind;
            alias.size = alias.window.min(size);
            alias.data = Arc::clone(&data);
        }

        log::info!(
            "Mapped {} image at 0x{:08X} ({} bytes)",
            kind,
            base,
            size
        );

        self.images.insert(
            base,
            ImageRegion {
                kind,
                base,
                size,
                window: size,
                data,
                alias_of: None,
                mapped: true,
            },
        );
    }

    /// Keep a named image without mapping it
    ///
    /// The image is reachable through [`image`](Self::image) only. A mapped
    /// image of the same kind is unmapped along with its aliases. An empty
    /// buffer is ignored.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    /// use ps2rx::core::memory::{AddressSpace, ImageKind};
    ///
    /// let mut mem = AddressSpace::default();
    /// mem.store_image(ImageKind::Nvm, Arc::from(vec![0u8; 1024]));
    ///
    /// let nvm = mem.image(ImageKind::Nvm).unwrap();
    /// assert!(!nvm.is_mapped());
    /// assert_eq!(nvm.size(), 1024);
    /// ```
    pub fn store_image(&mut self, kind: ImageKind, data: Arc<[u8]>) {
        if data.is_empty() {
            log::debug!("Ignoring empty {} image", kind);
            return;
        }

        self.drop_kind(kind, None);

        let size = region_size(&data);
        log::info!("Stored {} image ({} bytes, not mapped)", kind, size);

        self.unmapped.insert(
            kind,
            ImageRegion {
                kind,
                base: 0,
                size,
                window: size,
                data,
                alias_of: None,
                mapped: false,
            },
        );
    }

    /// Remove every image of `kind` except a mapping at `keep_base`
    ///
    /// Aliases of a removed mapping go with it. A mapping at `keep_base` is
    /// left in place for the caller to replace.
    fn drop_kind(&mut self, kind: ImageKind, keep_base: Option<u32>) {
        self.unmapped.remove(&kind);

        let stale: Vec<u32> = self
            .images
            .values()
            .filter(|region| region.kind == kind && !region.is_alias())
            .map(|region| region.base)
            .filter(|&base| Some(base) != keep_base)
            .collect();

        for old_base in stale {
            self.images.retain(|&base, region| {
                base != old_base && region.alias_of != Some(old_base)
            });
            log::debug!("Dropped previous {} image at 0x{:08X}", kind, old_base);
        }
    }

    /// Make `alias_base` resolve to the region mapped at `phys_base`
    ///
    /// The alias covers at most `size` bytes of the backing buffer. Nothing
    /// happens if no region starts exactly at `phys_base`.
    ///
    /// # Returns
    ///
    /// `true` if the alias was installed
    pub fn alias_image(&mut self, alias_base: u32, phys_base: u32, size: u32) -> bool {
        let Some(source) = self.images.get(&phys_base).filter(|r| !r.is_alias()) else {
            log::debug!(
                "No image at 0x{:08X} to alias at 0x{:08X}",
                phys_base,
                alias_base
            );
            return false;
        };

        if size.min(source.size) == 0 {
            return false;
        }

        let alias = ImageRegion {
            kind: source.kind,
            base: alias_base,
            size: size.min(source.size),
            window: size,
            data: Arc::clone(&source.data),
            alias_of: Some(phys_base),
            mapped: true,
        };

        log::info!(
            "Aliased {} image 0x{:08X} -> 0x{:08X} ({} bytes)",
            alias.kind,
            alias_base,
            phys_base,
            alias.size
        );

        self.images.insert(alias_base, alias);
        true
    }

    /// Image of the given kind: the original mapping, or the unmapped copy
    pub fn image(&self, kind: ImageKind) -> Option<&ImageRegion> {
        self.images
            .values()
            .find(|region| region.kind == kind && !region.is_alias())
            .or_else(|| self.unmapped.get(&kind))
    }

    /// All mapped regions, including aliases, ordered by base
    pub fn images(&self) -> impl Iterator<Item = &ImageRegion> {
        self.images.values()
    }

    /// Read a word from the region containing `addr`
    ///
    /// Regions are searched from the greatest base not above `addr` downward,
    /// so a small region mapped inside a larger one shadows it.
    pub(super) fn read_image32(&self, addr: u32) -> Option<u32> {
        self.images
            .range(..=addr)
            .rev()
            .find_map(|(_, region)| region.read32(addr))
    }
}
