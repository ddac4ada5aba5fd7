use super::decode::{Operand8, RotOp};
use super::regs::Flags;
use super::{Bus, Cpu};

impl Cpu {
    /// Rotates and shifts (CB 00–3F).
    pub(super) fn exec_cb_rotate<B: Bus>(&mut self, bus: &mut B, op: RotOp, target: Operand8) {
        let value = self.read_operand(bus, target);
        let result = self.alu_rotate(op, value);
        self.write_operand(bus, target, result);
    }

    /// BIT b,r (CB 40–7F): Z is the complement of the tested bit. C is kept.
    pub(super) fn exec_cb_bit<B: Bus>(&mut self, bus: &B, bit: u8, target: Operand8) {
        let value = self.read_operand(bus, target);
        self.regs.set_flag(Flags::Z, value & (1 << bit) == 0);
        self.regs.set_flag(Flags::N, false);
        self.regs.set_flag(Flags::H, true);
    }

    /// RES b,r (CB 80–BF) and SET b,r (CB C0–FF). No flags.
    pub(super) fn exec_cb_write_bit<B: Bus>(
        &mut self,
        bus: &mut B,
        bit: u8,
        target: Operand8,
        set: bool,
    ) {
        let value = self.read_operand(bus, target);
        let mask = 1 << bit;
        let result = if set { value | mask } else { value & !mask };
        self.write_operand(bus, target, result);
    }
}
