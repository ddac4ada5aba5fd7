use crate::cpu::decode::Operand8;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    pub(super) fn exec_inc8<B: Bus>(&mut self, bus: &mut B, target: Operand8) {
        let value = self.read_operand(bus, target);
        let result = self.alu_inc8(value);
        self.write_operand(bus, target, result);
    }

    pub(super) fn exec_dec8<B: Bus>(&mut self, bus: &mut B, target: Operand8) {
        let value = self.read_operand(bus, target);
        let result = self.alu_dec8(value);
        self.write_operand(bus, target, result);
    }
}
