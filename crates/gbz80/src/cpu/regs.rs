use std::fmt;

use bitflags::bitflags;

/// Register file of the Game Boy CPU (SM83).
///
/// Storage is six 16-bit pairs. The 8-bit registers are views onto the
/// high/low halves of `af`, `bc`, `de` and `hl`, read and written with
/// shifts and masks so the layout never depends on host byte order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Registers {
    af: u16,
    bc: u16,
    de: u16,
    hl: u16,
    sp: u16,
    pc: u16,
}

/// Symbolic names for the 8-bit registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg8 {
    A,
    F,
    B,
    C,
    D,
    E,
    H,
    L,
}

/// Symbolic names for the 16-bit registers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
    PC,
}

bitflags! {
    /// Flag bits in the F register.
    ///
    /// Bits 0–3 do not exist on hardware and always read back as zero.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Flags: u8 {
        /// Zero.
        const Z = 0b1000_0000;
        /// Subtract (BCD).
        const N = 0b0100_0000;
        /// Half carry (BCD).
        const H = 0b0010_0000;
        /// Carry.
        const C = 0b0001_0000;
    }
}

#[inline]
const fn high(pair: u16) -> u8 {
    (pair >> 8) as u8
}

#[inline]
const fn low(pair: u16) -> u8 {
    (pair & 0x00FF) as u8
}

#[inline]
const fn with_high(pair: u16, value: u8) -> u16 {
    (pair & 0x00FF) | ((value as u16) << 8)
}

#[inline]
const fn with_low(pair: u16, value: u8) -> u16 {
    (pair & 0xFF00) | value as u16
}

impl Registers {
    /// Register state straight after power-on: everything zero except the
    /// Z flag.
    pub const fn power_on() -> Self {
        Self {
            af: Flags::Z.bits() as u16,
            bc: 0,
            de: 0,
            hl: 0,
            sp: 0,
            pc: 0,
        }
    }

    pub fn get8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => high(self.af),
            Reg8::F => low(self.af),
            Reg8::B => high(self.bc),
            Reg8::C => low(self.bc),
            Reg8::D => high(self.de),
            Reg8::E => low(self.de),
            Reg8::H => high(self.hl),
            Reg8::L => low(self.hl),
        }
    }

    pub fn set8(&mut self, reg: Reg8, value: u8) {
        match reg {
            Reg8::A => self.af = with_high(self.af, value),
            // Lower 4 bits of F are always zero.
            Reg8::F => self.af = with_low(self.af, value & 0xF0),
            Reg8::B => self.bc = with_high(self.bc, value),
            Reg8::C => self.bc = with_low(self.bc, value),
            Reg8::D => self.de = with_high(self.de, value),
            Reg8::E => self.de = with_low(self.de, value),
            Reg8::H => self.hl = with_high(self.hl, value),
            Reg8::L => self.hl = with_low(self.hl, value),
        }
    }

    pub fn get16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AF => self.af,
            Reg16::BC => self.bc,
            Reg16::DE => self.de,
            Reg16::HL => self.hl,
            Reg16::SP => self.sp,
            Reg16::PC => self.pc,
        }
    }

    pub fn set16(&mut self, reg: Reg16, value: u16) {
        match reg {
            Reg16::AF => self.af = value & 0xFFF0,
            Reg16::BC => self.bc = value,
            Reg16::DE => self.de = value,
            Reg16::HL => self.hl = value,
            Reg16::SP => self.sp = value,
            Reg16::PC => self.pc = value,
        }
    }

    /// Wrapping 8-bit increment. Flags are the caller's business.
    pub fn inc8(&mut self, reg: Reg8) {
        self.set8(reg, self.get8(reg).wrapping_add(1));
    }

    /// Wrapping 8-bit decrement. Flags are the caller's business.
    pub fn dec8(&mut self, reg: Reg8) {
        self.set8(reg, self.get8(reg).wrapping_sub(1));
    }

    /// Wrapping 16-bit increment; never touches flags.
    pub fn inc16(&mut self, reg: Reg16) {
        self.set16(reg, self.get16(reg).wrapping_add(1));
    }

    /// Wrapping 16-bit decrement; never touches flags.
    pub fn dec16(&mut self, reg: Reg16) {
        self.set16(reg, self.get16(reg).wrapping_sub(1));
    }

    #[inline]
    pub fn a(&self) -> u8 {
        high(self.af)
    }

    #[inline]
    pub fn set_a(&mut self, value: u8) {
        self.af = with_high(self.af, value);
    }

    #[inline]
    pub fn af(&self) -> u16 {
        self.af
    }

    #[inline]
    pub fn bc(&self) -> u16 {
        self.bc
    }

    #[inline]
    pub fn de(&self) -> u16 {
        self.de
    }

    #[inline]
    pub fn hl(&self) -> u16 {
        self.hl
    }

    #[inline]
    pub fn set_hl(&mut self, value: u16) {
        self.hl = value;
    }

    #[inline]
    pub fn sp(&self) -> u16 {
        self.sp
    }

    #[inline]
    pub fn set_sp(&mut self, value: u16) {
        self.sp = value;
    }

    #[inline]
    pub fn pc(&self) -> u16 {
        self.pc
    }

    #[inline]
    pub fn set_pc(&mut self, value: u16) {
        self.pc = value;
    }

    #[inline]
    pub fn flags(&self) -> Flags {
        Flags::from_bits_truncate(low(self.af))
    }

    #[inline]
    pub fn set_flags(&mut self, flags: Flags) {
        self.af = with_low(self.af, flags.bits());
    }

    #[inline]
    pub fn flag(&self, flag: Flags) -> bool {
        self.flags().contains(flag)
    }

    #[inline]
    pub fn set_flag(&mut self, flag: Flags, value: bool) {
        let mut flags = self.flags();
        flags.set(flag, value);
        self.set_flags(flags);
    }

    pub fn zero(&self) -> bool {
        self.flag(Flags::Z)
    }

    pub fn subtract(&self) -> bool {
        self.flag(Flags::N)
    }

    pub fn half_carry(&self) -> bool {
        self.flag(Flags::H)
    }

    pub fn carry(&self) -> bool {
        self.flag(Flags::C)
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = |set: bool, name: char| if set { name } else { '-' };
        writeln!(
            f,
            "AF: {:#06X}  [{}{}{}{}]",
            self.af,
            flag(self.zero(), 'Z'),
            flag(self.subtract(), 'N'),
            flag(self.half_carry(), 'H'),
            flag(self.carry(), 'C'),
        )?;
        writeln!(f, "BC: {:#06X}", self.bc)?;
        writeln!(f, "DE: {:#06X}", self.de)?;
        writeln!(f, "HL: {:#06X}", self.hl)?;
        writeln!(f, "SP: {:#06X}", self.sp)?;
        write!(f, "PC: {:#06X}", self.pc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_R8: [Reg8; 8] = [
        Reg8::A,
        Reg8::F,
        Reg8::B,
        Reg8::C,
        Reg8::D,
        Reg8::E,
        Reg8::H,
        Reg8::L,
    ];

    fn sibling(reg: Reg8) -> Reg8 {
        match reg {
            Reg8::A => Reg8::F,
            Reg8::F => Reg8::A,
            Reg8::B => Reg8::C,
            Reg8::C => Reg8::B,
            Reg8::D => Reg8::E,
            Reg8::E => Reg8::D,
            Reg8::H => Reg8::L,
            Reg8::L => Reg8::H,
        }
    }

    #[test]
    fn power_on_presets_only_the_zero_flag() {
        let regs = Registers::power_on();
        assert_eq!(regs.af(), 0x0080);
        assert!(regs.zero());
        assert!(!regs.subtract());
        assert!(!regs.half_carry());
        assert!(!regs.carry());
        for reg in [Reg16::BC, Reg16::DE, Reg16::HL, Reg16::SP, Reg16::PC] {
            assert_eq!(regs.get16(reg), 0);
        }
    }

    #[test]
    fn set_then_get_8bit_roundtrips_every_value() {
        let mut regs = Registers::default();
        for reg in ALL_R8 {
            for value in 0..=u8::MAX {
                regs.set8(reg, value);
                let expected = if reg == Reg8::F { value & 0xF0 } else { value };
                assert_eq!(regs.get8(reg), expected, "{reg:?} <- {value:#04X}");
            }
        }
    }

    #[test]
    fn writing_one_half_leaves_the_other_alone() {
        for reg in ALL_R8 {
            let mut regs = Registers::default();
            let other = sibling(reg);
            regs.set8(other, 0xA0);
            for value in [0x00, 0x5A, 0xFF] {
                regs.set8(reg, value);
                assert_eq!(regs.get8(other), 0xA0, "writing {reg:?} disturbed {other:?}");
            }
        }
    }

    #[test]
    fn pairs_compose_from_halves() {
        let mut regs = Registers::default();
        regs.set8(Reg8::B, 0x12);
        regs.set8(Reg8::C, 0x34);
        regs.set8(Reg8::H, 0xC0);
        regs.set8(Reg8::L, 0x01);
        assert_eq!(regs.bc(), 0x1234);
        assert_eq!(regs.hl(), 0xC001);

        regs.set16(Reg16::DE, 0xBEEF);
        assert_eq!(regs.get8(Reg8::D), 0xBE);
        assert_eq!(regs.get8(Reg8::E), 0xEF);
    }

    #[test]
    fn flags_low_nibble_is_always_zero() {
        let mut regs = Registers::default();
        regs.set16(Reg16::AF, 0x12FF);
        assert_eq!(regs.af(), 0x12F0);
        regs.set8(Reg8::F, 0x0F);
        assert_eq!(regs.get8(Reg8::F), 0x00);
    }

    #[test]
    fn individual_flags() {
        let mut regs = Registers::default();
        regs.set_flag(Flags::N, true);
        regs.set_flag(Flags::C, true);
        assert_eq!(regs.get8(Reg8::F), 0x50);
        assert!(regs.subtract() && regs.carry());
        assert!(!regs.zero() && !regs.half_carry());

        regs.set_flag(Flags::C, false);
        assert_eq!(regs.get8(Reg8::F), 0x40);
        // A is untouched by flag writes.
        assert_eq!(regs.a(), 0x00);
    }

    #[test]
    fn inc_dec_wrap_without_touching_flags() {
        let mut regs = Registers::default();
        regs.set8(Reg8::B, 0xFF);
        regs.inc8(Reg8::B);
        assert_eq!(regs.get8(Reg8::B), 0x00);
        assert_eq!(regs.get8(Reg8::C), 0x00);

        regs.dec16(Reg16::DE);
        assert_eq!(regs.de(), 0xFFFF);
        regs.inc16(Reg16::DE);
        assert_eq!(regs.de(), 0x0000);

        regs.dec16(Reg16::SP);
        assert_eq!(regs.sp(), 0xFFFF);
        assert_eq!(regs.flags(), Flags::empty());
    }
}
