use crate::cpu::regs::Reg16;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_push<B: Bus>(&mut self, bus: &mut B, pair: Reg16) {
        self.push_u16(bus, self.regs.get16(pair));
    }

    /// POP AF drops the low nibble of F, like every other write to AF.
    pub(super) fn exec_pop<B: Bus>(&mut self, bus: &B, pair: Reg16) {
        let value = self.pop_u16(bus);
        self.regs.set16(pair, value);
    }
}
