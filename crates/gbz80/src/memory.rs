use std::ops::RangeInclusive;

use crate::cpu::Bus;
use crate::error::{CpuError, Result};
use crate::MEMORY_SIZE;

/// Named regions of the DMG memory map.
///
/// The table is descriptive only: every address reads and writes the same
/// flat byte array, with no echo mirroring or bank switching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Region {
    /// 16 KiB fixed cartridge ROM.
    RomBank0,
    /// 16 KiB switchable cartridge ROM.
    RomBankN,
    VideoRam,
    /// 8 KiB cartridge RAM.
    ExternalRam,
    WorkRam,
    /// Echo of work RAM on hardware.
    EchoRam,
    /// Sprite attribute table (OAM).
    ObjectAttributes,
    /// Prohibited gap between OAM and the I/O ports.
    Unusable,
    IoPorts,
    HighRam,
    /// The IE register at 0xFFFF.
    InterruptEnable,
}

impl Region {
    pub const ALL: [Region; 11] = [
        Region::RomBank0,
        Region::RomBankN,
        Region::VideoRam,
        Region::ExternalRam,
        Region::WorkRam,
        Region::EchoRam,
        Region::ObjectAttributes,
        Region::Unusable,
        Region::IoPorts,
        Region::HighRam,
        Region::InterruptEnable,
    ];

    pub fn range(self) -> RangeInclusive<u16> {
        match self {
            Region::RomBank0 => 0x0000..=0x3FFF,
            Region::RomBankN => 0x4000..=0x7FFF,
            Region::VideoRam => 0x8000..=0x9FFF,
            Region::ExternalRam => 0xA000..=0xBFFF,
            Region::WorkRam => 0xC000..=0xDFFF,
            Region::EchoRam => 0xE000..=0xFDFF,
            Region::ObjectAttributes => 0xFE00..=0xFE9F,
            Region::Unusable => 0xFEA0..=0xFEFF,
            Region::IoPorts => 0xFF00..=0xFF7F,
            Region::HighRam => 0xFF80..=0xFFFE,
            Region::InterruptEnable => 0xFFFF..=0xFFFF,
        }
    }

    /// Classify an address. Every address belongs to exactly one region.
    pub fn of(addr: u16) -> Region {
        match addr {
            0x0000..=0x3FFF => Region::RomBank0,
            0x4000..=0x7FFF => Region::RomBankN,
            0x8000..=0x9FFF => Region::VideoRam,
            0xA000..=0xBFFF => Region::ExternalRam,
            0xC000..=0xDFFF => Region::WorkRam,
            0xE000..=0xFDFF => Region::EchoRam,
            0xFE00..=0xFE9F => Region::ObjectAttributes,
            0xFEA0..=0xFEFF => Region::Unusable,
            0xFF00..=0xFF7F => Region::IoPorts,
            0xFF80..=0xFFFE => Region::HighRam,
            0xFFFF => Region::InterruptEnable,
        }
    }
}

/// Flat 64 KiB address space.
#[derive(Clone)]
pub struct Memory {
    bytes: Box<[u8]>,
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Memory")
            .field("len", &self.bytes.len())
            .finish_non_exhaustive()
    }
}

impl Memory {
    pub fn new() -> Self {
        Self {
            bytes: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    #[inline]
    pub fn read(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    #[inline]
    pub fn write(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize] = value;
    }

    /// Copy a program image to the start of the address space.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.load_at(0, program)
    }

    /// Copy `bytes` starting at `base`.
    ///
    /// Nothing is written when the image would run past 0xFFFF.
    pub fn load_at(&mut self, base: u16, bytes: &[u8]) -> Result<()> {
        let start = base as usize;
        if bytes.len() > MEMORY_SIZE - start {
            return Err(CpuError::ProgramTooLarge {
                len: bytes.len(),
                capacity: MEMORY_SIZE - start,
            });
        }
        self.bytes[start..start + bytes.len()].copy_from_slice(bytes);
        log::debug!(
            "loaded {} bytes at {:#06X} ({:?})",
            bytes.len(),
            base,
            Region::of(base)
        );
        Ok(())
    }

    /// Read-only view of `len` bytes starting at `start`, clamped to the
    /// end of the address space.
    pub fn range(&self, start: u16, len: usize) -> &[u8] {
        let start = start as usize;
        let end = start.saturating_add(len).min(MEMORY_SIZE);
        &self.bytes[start..end]
    }

    pub fn region(&self, region: Region) -> &[u8] {
        let range = region.range();
        &self.bytes[*range.start() as usize..=*range.end() as usize]
    }

    pub fn clear(&mut self) {
        self.bytes.fill(0);
    }
}

impl Bus for Memory {
    #[inline]
    fn read8(&self, addr: u16) -> u8 {
        self.read(addr)
    }

    #[inline]
    fn write8(&mut self, addr: u16, value: u8) {
        self.write(addr, value);
    }
}
