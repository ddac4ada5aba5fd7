use super::decode::{Condition, Indirect, Operand8};
use super::regs::Reg8;
use super::{Bus, Cpu};

impl Cpu {
    /// Read an 8-bit operand; `(HL)` goes through the bus.
    #[inline]
    pub(super) fn read_operand<B: Bus>(&self, bus: &B, operand: Operand8) -> u8 {
        match operand {
            Operand8::B => self.regs.get8(Reg8::B),
            Operand8::C => self.regs.get8(Reg8::C),
            Operand8::D => self.regs.get8(Reg8::D),
            Operand8::E => self.regs.get8(Reg8::E),
            Operand8::H => self.regs.get8(Reg8::H),
            Operand8::L => self.regs.get8(Reg8::L),
            Operand8::HlIndirect => bus.read8(self.regs.hl()),
            Operand8::A => self.regs.a(),
        }
    }

    /// Write an 8-bit operand. The encoding matches `read_operand`.
    #[inline]
    pub(super) fn write_operand<B: Bus>(&mut self, bus: &mut B, operand: Operand8, value: u8) {
        match operand {
            Operand8::B => self.regs.set8(Reg8::B, value),
            Operand8::C => self.regs.set8(Reg8::C, value),
            Operand8::D => self.regs.set8(Reg8::D, value),
            Operand8::E => self.regs.set8(Reg8::E, value),
            Operand8::H => self.regs.set8(Reg8::H, value),
            Operand8::L => self.regs.set8(Reg8::L, value),
            Operand8::HlIndirect => bus.write8(self.regs.hl(), value),
            Operand8::A => self.regs.set_a(value),
        }
    }

    /// Resolve the address for `LD (rr),A` / `LD A,(rr)`, applying the
    /// HL post-increment or post-decrement.
    pub(super) fn indirect_addr(&mut self, target: Indirect) -> u16 {
        match target {
            Indirect::Bc => self.regs.bc(),
            Indirect::De => self.regs.de(),
            Indirect::HlInc => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_add(1));
                hl
            }
            Indirect::HlDec => {
                let hl = self.regs.hl();
                self.regs.set_hl(hl.wrapping_sub(1));
                hl
            }
        }
    }

    #[inline]
    pub(super) fn condition(&self, cond: Option<Condition>) -> bool {
        cond.is_none_or(|cond| cond.holds(self.regs.flags()))
    }

    #[inline]
    pub(super) fn push_u16<B: Bus>(&mut self, bus: &mut B, value: u16) {
        let [lo, hi] = value.to_le_bytes();
        // Stack grows downward: memory[SP] = low, memory[SP+1] = high.
        let mut sp = self.regs.sp().wrapping_sub(1);
        bus.write8(sp, hi);
        sp = sp.wrapping_sub(1);
        bus.write8(sp, lo);
        self.regs.set_sp(sp);
    }

    #[inline]
    pub(super) fn pop_u16<B: Bus>(&mut self, bus: &B) -> u16 {
        let sp = self.regs.sp();
        let lo = bus.read8(sp);
        let hi = bus.read8(sp.wrapping_add(1));
        self.regs.set_sp(sp.wrapping_add(2));
        u16::from_le_bytes([lo, hi])
    }
}
