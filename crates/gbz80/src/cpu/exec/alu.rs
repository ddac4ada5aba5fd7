use crate::cpu::regs::Flags;
use crate::cpu::Cpu;

impl Cpu {
    /// CPL: A = !A. Sets N and H; Z and C unchanged.
    pub(super) fn exec_cpl(&mut self) {
        self.regs.set_a(!self.regs.a());
        self.regs.set_flag(Flags::N, true);
        self.regs.set_flag(Flags::H, true);
    }

    pub(super) fn exec_scf(&mut self) {
        self.regs.set_flag(Flags::N, false);
        self.regs.set_flag(Flags::H, false);
        self.regs.set_flag(Flags::C, true);
    }

    pub(super) fn exec_ccf(&mut self) {
        let carry = self.regs.carry();
        self.regs.set_flag(Flags::N, false);
        self.regs.set_flag(Flags::H, false);
        self.regs.set_flag(Flags::C, !carry);
    }

    pub(super) fn exec_add_sp_offset(&mut self, offset: i8) {
        let result = self.alu_add16_signed(self.regs.sp(), offset);
        self.regs.set_sp(result);
    }
}
