pub mod decode;
pub mod regs;

mod alu;
mod cb;
mod exec;
mod helpers;


use decode::{Instruction, ProgramCounter};
use regs::Registers;

use crate::error::Result;

/// Byte-addressed view of the 16-bit address space as seen by the CPU.
///
/// Reads take `&self`: nothing on this bus has read side effects, which
/// lets a preview [`Cursor`](decode::Cursor) share it without mutable
/// access.
pub trait Bus {
    fn read8(&self, addr: u16) -> u8;
    fn write8(&mut self, addr: u16, value: u8);
}

/// Low-power state of the core.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PowerMode {
    #[default]
    Running,
    /// Entered by HALT while interrupts are enabled.
    Halted,
    /// Entered by STOP.
    Stopped,
}

/// What a call to [`Cpu::step`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepOutcome {
    Executed(Instruction),
    /// The core is halted or stopped; nothing was fetched.
    Idle,
}

/// Game Boy CPU core (SM83).
///
/// Holds the register file, the interrupt master enable latch and the
/// halted/stopped state. Memory lives behind a [`Bus`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cpu {
    pub regs: Registers,
    ime: bool,
    mode: PowerMode,
}

impl Default for Cpu {
    fn default() -> Self {
        Self::new()
    }
}

impl Cpu {
    /// A core in its power-on state.
    pub fn new() -> Self {
        Self {
            regs: Registers::power_on(),
            ime: false,
            mode: PowerMode::Running,
        }
    }

    /// Zero every register pair and clear the latches.
    ///
    /// Unlike power-on, the Z flag is not preset.
    pub fn reset(&mut self) {
        self.regs = Registers::default();
        self.ime = false;
        self.mode = PowerMode::Running;
        log::debug!("cpu reset");
    }

    #[inline]
    pub fn ime(&self) -> bool {
        self.ime
    }

    #[inline]
    pub fn set_ime(&mut self, enabled: bool) {
        self.ime = enabled;
    }

    #[inline]
    pub fn mode(&self) -> PowerMode {
        self.mode
    }

    pub fn is_halted(&self) -> bool {
        self.mode == PowerMode::Halted
    }

    pub fn is_stopped(&self) -> bool {
        self.mode == PowerMode::Stopped
    }

    pub fn halt(&mut self) {
        self.mode = PowerMode::Halted;
    }

    pub fn stop(&mut self) {
        self.mode = PowerMode::Stopped;
    }

    /// Leave the halted or stopped state.
    ///
    /// Interrupt delivery is not modelled, so the host decides when the
    /// core wakes up.
    pub fn wake(&mut self) {
        self.mode = PowerMode::Running;
    }

    /// Execute exactly one instruction.
    ///
    /// Immediate operands are always consumed, whether or not a
    /// conditional branch is taken. On error the program counter is left
    /// at the faulting instruction and no state has changed.
    pub fn step<B: Bus>(&mut self, bus: &mut B) -> Result<StepOutcome> {
        if self.mode != PowerMode::Running {
            return Ok(StepOutcome::Idle);
        }

        let pc = self.regs.pc();
        let decoded = Instruction::decode(&mut ProgramCounter {
            regs: &mut self.regs,
            bus: &*bus,
        });
        let instr = match decoded {
            Ok(instr) => instr,
            Err(err) => {
                self.regs.set_pc(pc);
                log::error!("{err}");
                return Err(err);
            }
        };

        log::trace!("PC=0x{pc:04X} {instr:?}");
        self.execute(bus, instr);
        Ok(StepOutcome::Executed(instr))
    }
}
