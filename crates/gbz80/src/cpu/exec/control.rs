use crate::cpu::decode::Condition;
use crate::cpu::{Bus, Cpu};

impl Cpu {
    /// JR: `pc` already points past the displacement byte.
    pub(super) fn exec_jr(&mut self, cond: Option<Condition>, offset: i8) {
        if self.condition(cond) {
            let pc = self.regs.pc().wrapping_add_signed(offset as i16);
            self.regs.set_pc(pc);
        }
    }

    pub(super) fn exec_jp(&mut self, cond: Option<Condition>, addr: u16) {
        if self.condition(cond) {
            self.regs.set_pc(addr);
        }
    }

    /// CALL and RST. The pushed return address is the current `pc`, which
    /// already points past the operand bytes.
    pub(super) fn exec_call<B: Bus>(&mut self, bus: &mut B, cond: Option<Condition>, addr: u16) {
        if self.condition(cond) {
            self.push_u16(bus, self.regs.pc());
            self.regs.set_pc(addr);
        }
    }

    pub(super) fn exec_ret<B: Bus>(&mut self, bus: &B, cond: Option<Condition>) {
        if self.condition(cond) {
            let addr = self.pop_u16(bus);
            self.regs.set_pc(addr);
        }
    }
}
