use crate::cpu::decode::{Cursor, Fetch, Instruction};
use crate::cpu::regs::Registers;
use crate::cpu::{Cpu, StepOutcome};
use crate::error::Result;
use crate::memory::Memory;

/// High-level DMG machine: one CPU core wired to one flat address space.
///
/// This is the entry point hosts use. The two halves are created together
/// and live as long as the machine does.
#[derive(Clone, Debug, Default)]
pub struct Dmg {
    pub cpu: Cpu,
    memory: Memory,
}

impl Dmg {
    pub fn new() -> Self {
        Self {
            cpu: Cpu::new(),
            memory: Memory::new(),
        }
    }

    /// Copy a program image to address 0x0000.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        self.memory.load_program(program)
    }

    /// Copy bytes to `base`, e.g. code placed at the 0x0150 entry point.
    pub fn load_at(&mut self, base: u16, bytes: &[u8]) -> Result<()> {
        self.memory.load_at(base, bytes)
    }

    pub fn step(&mut self) -> Result<StepOutcome> {
        self.cpu.step(&mut self.memory)
    }

    /// Reset the core. Memory contents are kept so a loaded program can
    /// be re-run.
    pub fn reset(&mut self) {
        self.cpu.reset();
    }

    /// Cold start: power-on register values and zeroed memory.
    pub fn power_cycle(&mut self) {
        self.cpu = Cpu::new();
        self.memory.clear();
        log::debug!("power cycle");
    }

    pub fn registers(&self) -> &Registers {
        &self.cpu.regs
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    /// Decode the instruction at `addr` without executing it.
    ///
    /// Returns the instruction and its encoded length in bytes. The live
    /// program counter is never touched.
    pub fn peek(&self, addr: u16) -> Result<(Instruction, u16)> {
        let mut cursor = Cursor::new(&self.memory, addr);
        let instr = Instruction::decode(&mut cursor)?;
        Ok((instr, cursor.position().wrapping_sub(addr)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::decode::Operand8;
    use crate::error::CpuError;

    #[test]
    fn peek_reports_length_and_leaves_pc() {
        let mut dmg = Dmg::new();
        dmg.load_at(0x0150, &[0x3E, 0x05, 0xCB, 0x37, 0xDB]).unwrap();
        dmg.cpu.regs.set_pc(0x0150);

        assert_eq!(
            dmg.peek(0x0150),
            Ok((
                Instruction::LdImm {
                    dst: Operand8::A,
                    value: 0x05
                },
                2
            ))
        );
        assert_eq!(dmg.peek(0x0152).map(|(_, len)| len), Ok(2));
        assert_eq!(
            dmg.peek(0x0154),
            Err(CpuError::InvalidOpcode {
                opcode: 0xDB,
                prefixed: false,
                pc: 0x0154
            })
        );
        assert_eq!(dmg.registers().pc(), 0x0150);
    }

    #[test]
    fn reset_keeps_memory() {
        let mut dmg = Dmg::new();
        dmg.load_program(&[0x3C]).unwrap(); // INC A
        dmg.step().unwrap();
        assert_eq!(dmg.registers().a(), 1);

        dmg.reset();
        assert_eq!(dmg.registers().pc(), 0);
        assert_eq!(dmg.memory().read(0x0000), 0x3C);
    }

    #[test]
    fn power_cycle_clears_memory() {
        let mut dmg = Dmg::new();
        dmg.load_at(0xC000, &[0xAA, 0xBB]).unwrap();
        dmg.cpu.regs.set_pc(0x0150);
        dmg.cpu.set_ime(true);

        dmg.power_cycle();
        assert_eq!(dmg.cpu, Cpu::new());
        assert_eq!(dmg.registers().af(), 0x0080);
        assert_eq!(dmg.memory().range(0xC000, 2), &[0x00, 0x00]);
    }
}
