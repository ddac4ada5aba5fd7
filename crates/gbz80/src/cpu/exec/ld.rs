use crate::cpu::decode::{Indirect, Operand8};
use crate::cpu::{Bus, Cpu};

/// Base of the high page addressed by the LDH forms.
const HIGH_PAGE: u16 = 0xFF00;

impl Cpu {
    pub(super) fn exec_ld_r_r<B: Bus>(&mut self, bus: &mut B, dst: Operand8, src: Operand8) {
        let value = self.read_operand(bus, src);
        self.write_operand(bus, dst, value);
    }

    /// LD (BC),A / LD (DE),A / LD (HL+),A / LD (HL-),A
    pub(super) fn exec_ld_indirect_a<B: Bus>(&mut self, bus: &mut B, target: Indirect) {
        let addr = self.indirect_addr(target);
        bus.write8(addr, self.regs.a());
    }

    /// LD A,(BC) / LD A,(DE) / LD A,(HL+) / LD A,(HL-)
    pub(super) fn exec_ld_a_indirect<B: Bus>(&mut self, bus: &B, target: Indirect) {
        let addr = self.indirect_addr(target);
        self.regs.set_a(bus.read8(addr));
    }

    pub(super) fn exec_ldh_store<B: Bus>(&mut self, bus: &mut B, offset: u8) {
        bus.write8(HIGH_PAGE | offset as u16, self.regs.a());
    }

    pub(super) fn exec_ldh_load<B: Bus>(&mut self, bus: &B, offset: u8) {
        self.regs.set_a(bus.read8(HIGH_PAGE | offset as u16));
    }

    /// LD (a16),SP: low byte at `addr`, high byte at `addr + 1`.
    pub(super) fn exec_ld_a16_sp<B: Bus>(&mut self, bus: &mut B, addr: u16) {
        let [lo, hi] = self.regs.sp().to_le_bytes();
        bus.write8(addr, lo);
        bus.write8(addr.wrapping_add(1), hi);
    }

    pub(super) fn exec_ld_hl_sp_offset(&mut self, offset: i8) {
        let result = self.alu_add16_signed(self.regs.sp(), offset);
        self.regs.set_hl(result);
    }
}
