//! Opcode decoding.
//!
//! Opcodes are split into the usual bit fields:
//!
//! ```text
//!   7 6 | 5 4 3 | 2 1 0
//!  block| column|  row
//!       |pair|sub
//! ```
//!
//! Unprefixed opcodes are dispatched on `(block, row)` for block 0 and on
//! `block` alone for blocks 1–3. The 0xCB table is dispatched on `block`
//! alone. Immediate operands are pulled through a [`Fetch`] source, so the
//! same decoder serves both the live program counter and a side cursor
//! used for previewing code.

use crate::cpu::regs::{Flags, Reg16, Registers};
use crate::cpu::Bus;
use crate::error::{CpuError, Result};
use crate::CB_PREFIX;

/// A byte source that advances as it is read.
pub trait Fetch {
    /// Address of the next byte `next8` will return.
    fn position(&self) -> u16;
    fn next8(&mut self) -> u8;

    /// Little-endian 16-bit immediate.
    fn next16(&mut self) -> u16 {
        let lo = self.next8();
        let hi = self.next8();
        u16::from_le_bytes([lo, hi])
    }
}

/// Read-only cursor over a bus, independent of any CPU program counter.
#[derive(Debug)]
pub struct Cursor<'a, B: Bus + ?Sized> {
    bus: &'a B,
    addr: u16,
}

impl<'a, B: Bus + ?Sized> Cursor<'a, B> {
    pub fn new(bus: &'a B, addr: u16) -> Self {
        Self { bus, addr }
    }
}

impl<B: Bus + ?Sized> Fetch for Cursor<'_, B> {
    fn position(&self) -> u16 {
        self.addr
    }

    fn next8(&mut self) -> u8 {
        let value = self.bus.read8(self.addr);
        self.addr = self.addr.wrapping_add(1);
        value
    }
}

/// Fetches through the live program counter, advancing it.
pub(crate) struct ProgramCounter<'a, B: Bus + ?Sized> {
    pub(crate) regs: &'a mut Registers,
    pub(crate) bus: &'a B,
}

impl<B: Bus + ?Sized> Fetch for ProgramCounter<'_, B> {
    fn position(&self) -> u16 {
        self.regs.pc()
    }

    fn next8(&mut self) -> u8 {
        let pc = self.regs.pc();
        let value = self.bus.read8(pc);
        self.regs.set_pc(pc.wrapping_add(1));
        value
    }
}

/// Bit-field view of an opcode byte.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Opcode {
    pub raw: u8,
    /// Whether the byte came from the 0xCB extension table.
    pub prefixed: bool,
}

impl Opcode {
    pub const fn new(raw: u8, prefixed: bool) -> Self {
        Self { raw, prefixed }
    }

    /// Bits 6–7.
    #[inline]
    pub const fn block(self) -> u8 {
        self.raw >> 6
    }

    /// Bits 3–5.
    #[inline]
    pub const fn column(self) -> u8 {
        (self.raw >> 3) & 0x07
    }

    /// Bits 0–2.
    #[inline]
    pub const fn row(self) -> u8 {
        self.raw & 0x07
    }

    /// Bits 4–5 (upper two bits of the column).
    #[inline]
    pub const fn pair(self) -> u8 {
        (self.raw >> 4) & 0x03
    }

    /// Bit 3 (low bit of the column).
    #[inline]
    pub const fn sub(self) -> u8 {
        (self.raw >> 3) & 0x01
    }
}

/// 8-bit operand selected by a 3-bit field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand8 {
    B,
    C,
    D,
    E,
    H,
    L,
    /// The byte addressed by HL.
    HlIndirect,
    A,
}

impl Operand8 {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => Operand8::B,
            1 => Operand8::C,
            2 => Operand8::D,
            3 => Operand8::E,
            4 => Operand8::H,
            5 => Operand8::L,
            6 => Operand8::HlIndirect,
            7 => Operand8::A,
            _ => unreachable!("8-bit operand index {index} out of range"),
        }
    }
}

/// 16-bit pair for loads and arithmetic (`rp` table).
fn pair_sp(index: u8) -> Reg16 {
    match index {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        3 => Reg16::SP,
        _ => unreachable!("register pair index {index} out of range"),
    }
}

/// 16-bit pair for PUSH/POP (`rp2` table).
fn pair_af(index: u8) -> Reg16 {
    match index {
        0 => Reg16::BC,
        1 => Reg16::DE,
        2 => Reg16::HL,
        3 => Reg16::AF,
        _ => unreachable!("stack pair index {index} out of range"),
    }
}

/// Branch condition codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Condition {
    NotZero,
    Zero,
    NoCarry,
    Carry,
}

impl Condition {
    pub fn from_index(index: u8) -> Self {
        match index {
            0 => Condition::NotZero,
            1 => Condition::Zero,
            2 => Condition::NoCarry,
            3 => Condition::Carry,
            _ => unreachable!("condition index {index} out of range"),
        }
    }

    pub fn holds(self, flags: Flags) -> bool {
        match self {
            Condition::NotZero => !flags.contains(Flags::Z),
            Condition::Zero => flags.contains(Flags::Z),
            Condition::NoCarry => !flags.contains(Flags::C),
            Condition::Carry => flags.contains(Flags::C),
        }
    }
}

/// Address operand of `LD (rr),A` / `LD A,(rr)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Indirect {
    Bc,
    De,
    /// HL, incremented after the access.
    HlInc,
    /// HL, decremented after the access.
    HlDec,
}

impl Indirect {
    fn from_index(index: u8) -> Self {
        match index {
            0 => Indirect::Bc,
            1 => Indirect::De,
            2 => Indirect::HlInc,
            3 => Indirect::HlDec,
            _ => unreachable!("indirect pair index {index} out of range"),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    fn from_index(index: u8) -> Self {
        match index {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            7 => AluOp::Cp,
            _ => unreachable!("ALU op index {index} out of range"),
        }
    }
}

/// Second operand of an accumulator ALU instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AluSrc {
    Reg(Operand8),
    Imm(u8),
}

/// Rotate/shift group of the 0xCB table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RotOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl RotOp {
    fn from_index(index: u8) -> Self {
        match index {
            0 => RotOp::Rlc,
            1 => RotOp::Rrc,
            2 => RotOp::Rl,
            3 => RotOp::Rr,
            4 => RotOp::Sla,
            5 => RotOp::Sra,
            6 => RotOp::Swap,
            7 => RotOp::Srl,
            _ => unreachable!("rotate op index {index} out of range"),
        }
    }
}

/// A fully decoded instruction, immediates included.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Instruction {
    Nop,
    Stop,
    Halt,
    Di,
    Ei,

    // 8-bit loads.
    Ld { dst: Operand8, src: Operand8 },
    LdImm { dst: Operand8, value: u8 },
    LdIndirectA(Indirect),
    LdAIndirect(Indirect),
    LdAddrA(u16),
    LdAAddr(u16),
    /// `LDH (a8),A`: store A at 0xFF00 + offset.
    LdhImmA(u8),
    /// `LDH A,(a8)`.
    LdhAImm(u8),
    /// `LDH (C),A`.
    LdhCA,
    /// `LDH A,(C)`.
    LdhAC,

    // 16-bit loads.
    Ld16Imm { dst: Reg16, value: u16 },
    LdAddrSp(u16),
    LdSpHl,
    LdHlSpOffset(i8),

    // Arithmetic.
    Inc8(Operand8),
    Dec8(Operand8),
    Inc16(Reg16),
    Dec16(Reg16),
    AddHl(Reg16),
    AddSpOffset(i8),
    Alu { op: AluOp, src: AluSrc },

    // Accumulator and flag ops.
    Rlca,
    Rrca,
    Rla,
    Rra,
    Daa,
    Cpl,
    Scf,
    Ccf,

    // Control flow.
    Jr { cond: Option<Condition>, offset: i8 },
    Jp { cond: Option<Condition>, addr: u16 },
    JpHl,
    Call { cond: Option<Condition>, addr: u16 },
    Ret { cond: Option<Condition> },
    Reti,
    Rst(u8),
    Push(Reg16),
    Pop(Reg16),

    // 0xCB table.
    Rot { op: RotOp, target: Operand8 },
    Bit { bit: u8, target: Operand8 },
    Res { bit: u8, target: Operand8 },
    Set { bit: u8, target: Operand8 },
}

impl Instruction {
    /// Decode one instruction from `fetch`, consuming the prefix, the
    /// opcode and every immediate operand.
    pub fn decode<F: Fetch + ?Sized>(fetch: &mut F) -> Result<Instruction> {
        let origin = fetch.position();
        let byte = fetch.next8();
        if byte == CB_PREFIX {
            let op = Opcode::new(fetch.next8(), true);
            Ok(decode_cb(op))
        } else {
            decode_unprefixed(Opcode::new(byte, false), fetch, origin)
        }
    }
}

fn decode_unprefixed<F: Fetch + ?Sized>(
    op: Opcode,
    fetch: &mut F,
    origin: u16,
) -> Result<Instruction> {
    let y = op.column();
    let z = op.row();
    let p = op.pair();
    let q = op.sub();

    let instr = match (op.block(), z) {
        (0, 0) => match y {
            0 => Instruction::Nop,
            1 => Instruction::LdAddrSp(fetch.next16()),
            2 => {
                // STOP is followed by a padding byte.
                let _padding = fetch.next8();
                Instruction::Stop
            }
            3 => Instruction::Jr {
                cond: None,
                offset: fetch.next8() as i8,
            },
            _ => Instruction::Jr {
                cond: Some(Condition::from_index(y - 4)),
                offset: fetch.next8() as i8,
            },
        },
        (0, 1) if q == 0 => Instruction::Ld16Imm {
            dst: pair_sp(p),
            value: fetch.next16(),
        },
        (0, 1) => Instruction::AddHl(pair_sp(p)),
        (0, 2) if q == 0 => Instruction::LdIndirectA(Indirect::from_index(p)),
        (0, 2) => Instruction::LdAIndirect(Indirect::from_index(p)),
        (0, 3) if q == 0 => Instruction::Inc16(pair_sp(p)),
        (0, 3) => Instruction::Dec16(pair_sp(p)),
        (0, 4) => Instruction::Inc8(Operand8::from_index(y)),
        (0, 5) => Instruction::Dec8(Operand8::from_index(y)),
        (0, 6) => Instruction::LdImm {
            dst: Operand8::from_index(y),
            value: fetch.next8(),
        },
        (0, _) => match y {
            0 => Instruction::Rlca,
            1 => Instruction::Rrca,
            2 => Instruction::Rla,
            3 => Instruction::Rra,
            4 => Instruction::Daa,
            5 => Instruction::Cpl,
            6 => Instruction::Scf,
            _ => Instruction::Ccf,
        },
        (1, _) if y == 6 && z == 6 => Instruction::Halt,
        (1, _) => Instruction::Ld {
            dst: Operand8::from_index(y),
            src: Operand8::from_index(z),
        },
        (2, _) => Instruction::Alu {
            op: AluOp::from_index(y),
            src: AluSrc::Reg(Operand8::from_index(z)),
        },
        _ => return decode_block3(op, fetch, origin),
    };
    Ok(instr)
}

fn decode_block3<F: Fetch + ?Sized>(
    op: Opcode,
    fetch: &mut F,
    origin: u16,
) -> Result<Instruction> {
    let y = op.column();
    let p = op.pair();
    let q = op.sub();

    let instr = match op.row() {
        0 => match y {
            0..=3 => Instruction::Ret {
                cond: Some(Condition::from_index(y)),
            },
            4 => Instruction::LdhImmA(fetch.next8()),
            5 => Instruction::AddSpOffset(fetch.next8() as i8),
            6 => Instruction::LdhAImm(fetch.next8()),
            _ => Instruction::LdHlSpOffset(fetch.next8() as i8),
        },
        1 if q == 0 => Instruction::Pop(pair_af(p)),
        1 => match p {
            0 => Instruction::Ret { cond: None },
            1 => Instruction::Reti,
            2 => Instruction::JpHl,
            _ => Instruction::LdSpHl,
        },
        2 => match y {
            0..=3 => Instruction::Jp {
                cond: Some(Condition::from_index(y)),
                addr: fetch.next16(),
            },
            4 => Instruction::LdhCA,
            5 => Instruction::LdAddrA(fetch.next16()),
            6 => Instruction::LdhAC,
            _ => Instruction::LdAAddr(fetch.next16()),
        },
        3 => match y {
            0 => Instruction::Jp {
                cond: None,
                addr: fetch.next16(),
            },
            6 => Instruction::Di,
            7 => Instruction::Ei,
            // y == 1 is the 0xCB prefix, consumed before we get here.
            _ => return Err(invalid(op, origin)),
        },
        4 => match y {
            0..=3 => Instruction::Call {
                cond: Some(Condition::from_index(y)),
                addr: fetch.next16(),
            },
            _ => return Err(invalid(op, origin)),
        },
        5 if q == 0 => Instruction::Push(pair_af(p)),
        5 if p == 0 => Instruction::Call {
            cond: None,
            addr: fetch.next16(),
        },
        5 => return Err(invalid(op, origin)),
        6 => Instruction::Alu {
            op: AluOp::from_index(y),
            src: AluSrc::Imm(fetch.next8()),
        },
        _ => Instruction::Rst(y * 8),
    };
    Ok(instr)
}

fn decode_cb(op: Opcode) -> Instruction {
    let target = Operand8::from_index(op.row());
    let y = op.column();
    match op.block() {
        0 => Instruction::Rot {
            op: RotOp::from_index(y),
            target,
        },
        1 => Instruction::Bit { bit: y, target },
        2 => Instruction::Res { bit: y, target },
        _ => Instruction::Set { bit: y, target },
    }
}

fn invalid(op: Opcode, origin: u16) -> CpuError {
    CpuError::InvalidOpcode {
        opcode: op.raw,
        prefixed: op.prefixed,
        pc: origin,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Memory;

    fn decode_bytes(bytes: &[u8]) -> (Result<Instruction>, u16) {
        let mut mem = Memory::new();
        mem.load_at(0x0100, bytes).unwrap();
        let mut cursor = Cursor::new(&mem, 0x0100);
        let instr = Instruction::decode(&mut cursor);
        (instr, cursor.position() - 0x0100)
    }

    #[test]
    fn opcode_fields() {
        // 0b11_010_101 = PUSH DE
        let op = Opcode::new(0xD5, false);
        assert_eq!(op.block(), 3);
        assert_eq!(op.column(), 2);
        assert_eq!(op.row(), 5);
        assert_eq!(op.pair(), 1);
        assert_eq!(op.sub(), 0);
    }

    #[test]
    fn lengths_include_immediates() {
        assert_eq!(decode_bytes(&[0x00]), (Ok(Instruction::Nop), 1));
        assert_eq!(decode_bytes(&[0x10, 0x00]), (Ok(Instruction::Stop), 2));
        assert_eq!(
            decode_bytes(&[0x3E, 0x05]),
            (
                Ok(Instruction::LdImm {
                    dst: Operand8::A,
                    value: 0x05
                }),
                2
            )
        );
        assert_eq!(
            decode_bytes(&[0x01, 0x34, 0x12]),
            (
                Ok(Instruction::Ld16Imm {
                    dst: Reg16::BC,
                    value: 0x1234
                }),
                3
            )
        );
        assert_eq!(
            decode_bytes(&[0xCB, 0x7C]),
            (
                Ok(Instruction::Bit {
                    bit: 7,
                    target: Operand8::H
                }),
                2
            )
        );
    }

    #[test]
    fn conditional_forms_pick_the_right_condition() {
        let (instr, len) = decode_bytes(&[0x38, 0xFE]);
        assert_eq!(
            instr,
            Ok(Instruction::Jr {
                cond: Some(Condition::Carry),
                offset: -2
            })
        );
        assert_eq!(len, 2);

        let (instr, len) = decode_bytes(&[0xC4, 0x00, 0x20]);
        assert_eq!(
            instr,
            Ok(Instruction::Call {
                cond: Some(Condition::NotZero),
                addr: 0x2000
            })
        );
        assert_eq!(len, 3);

        let (instr, _) = decode_bytes(&[0xC8]);
        assert_eq!(
            instr,
            Ok(Instruction::Ret {
                cond: Some(Condition::Zero)
            })
        );
    }

    #[test]
    fn block1_and_block2_tables() {
        assert_eq!(decode_bytes(&[0x76]).0, Ok(Instruction::Halt));
        assert_eq!(
            decode_bytes(&[0x70]).0,
            Ok(Instruction::Ld {
                dst: Operand8::HlIndirect,
                src: Operand8::B
            })
        );
        assert_eq!(
            decode_bytes(&[0xBE]).0,
            Ok(Instruction::Alu {
                op: AluOp::Cp,
                src: AluSrc::Reg(Operand8::HlIndirect)
            })
        );
    }

    #[test]
    fn stack_pairs_use_af() {
        assert_eq!(decode_bytes(&[0xF5]).0, Ok(Instruction::Push(Reg16::AF)));
        assert_eq!(decode_bytes(&[0xF1]).0, Ok(Instruction::Pop(Reg16::AF)));
        assert_eq!(decode_bytes(&[0x33]).0, Ok(Instruction::Inc16(Reg16::SP)));
    }

    #[test]
    fn restart_vectors() {
        for (i, opcode) in [0xC7, 0xCF, 0xD7, 0xDF, 0xE7, 0xEF, 0xF7, 0xFF]
            .into_iter()
            .enumerate()
        {
            assert_eq!(decode_bytes(&[opcode]).0, Ok(Instruction::Rst(i as u8 * 8)));
        }
    }

    #[test]
    fn holes_are_reported_with_origin() {
        for opcode in [
            0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
        ] {
            assert_eq!(
                decode_bytes(&[opcode]).0,
                Err(CpuError::InvalidOpcode {
                    opcode,
                    prefixed: false,
                    pc: 0x0100
                })
            );
        }
    }

    #[test]
    fn every_other_opcode_decodes() {
        let holes = [
            0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
        ];
        for opcode in 0..=u8::MAX {
            if holes.contains(&opcode) {
                continue;
            }
            assert!(decode_bytes(&[opcode, 0, 0]).0.is_ok(), "{opcode:#04X}");
            assert!(decode_bytes(&[CB_PREFIX, opcode]).0.is_ok());
        }
    }

    #[test]
    fn cursor_does_not_touch_registers() {
        let mut mem = Memory::new();
        mem.load_at(0x0150, &[0xC3, 0x00, 0x02]).unwrap();
        let regs = Registers::power_on();
        let mut cursor = Cursor::new(&mem, 0x0150);
        let instr = Instruction::decode(&mut cursor).unwrap();
        assert_eq!(
            instr,
            Instruction::Jp {
                cond: None,
                addr: 0x0200
            }
        );
        assert_eq!(regs.pc(), 0x0000);
    }
}
