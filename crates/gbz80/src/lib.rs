pub mod cpu;
pub mod error;
pub mod machine;
pub mod memory;

pub use cpu::decode::{
    AluOp, AluSrc, Condition, Cursor, Fetch, Indirect, Instruction, Opcode, Operand8, RotOp,
};
pub use cpu::regs::{Flags, Reg16, Reg8, Registers};
pub use cpu::{Bus, Cpu, PowerMode, StepOutcome};
pub use error::{CpuError, Result};
pub use machine::Dmg;
pub use memory::{Memory, Region};

/// Total addressable memory for the Game Boy (64 KiB).
pub const MEMORY_SIZE: usize = 0x10000;

/// Prefix byte selecting the secondary (bit/rotate/shift) opcode table.
pub const CB_PREFIX: u8 = 0xCB;
