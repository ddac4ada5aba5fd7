use crate::cpu::Cpu;

impl Cpu {
    pub(super) fn exec_stop(&mut self) {
        self.stop();
    }

    /// HALT only parks the core while interrupts are enabled. With IME
    /// clear, hardware runs into the halt bug; that case is a no-op here.
    pub(super) fn exec_halt(&mut self) {
        if self.ime() {
            self.halt();
        } else {
            log::debug!(
                "HALT with IME clear at PC=0x{:04X}, treated as NOP",
                self.regs.pc().wrapping_sub(1)
            );
        }
    }
}
