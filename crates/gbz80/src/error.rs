use thiserror::Error;

pub type Result<T> = std::result::Result<T, CpuError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CpuError {
    /// The host handed us an image that does not fit in the address space.
    #[error("program image of {len} bytes does not fit in {capacity} bytes of address space")]
    ProgramTooLarge { len: usize, capacity: usize },
    /// The decoder hit one of the unassigned slots of the opcode table.
    ///
    /// `pc` is the address the instruction (or its 0xCB prefix) was
    /// fetched from.
    #[error("invalid opcode {}{opcode:#04X} at PC={pc:#06X}", cb_tag(.prefixed))]
    InvalidOpcode { opcode: u8, prefixed: bool, pc: u16 },
}

fn cb_tag(prefixed: &bool) -> &'static str {
    if *prefixed {
        "CB "
    } else {
        ""
    }
}

impl CpuError {
    /// Contract violations cannot be recovered from by retrying the step.
    pub fn is_fatal(&self) -> bool {
        matches!(self, CpuError::InvalidOpcode { .. })
    }
}
