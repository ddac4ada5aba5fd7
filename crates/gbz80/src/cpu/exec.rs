mod alu;
mod control;
mod incdec;
mod ld;
mod stack;
mod system;

use super::decode::{AluSrc, Instruction, RotOp};
use super::regs::Reg8;
use super::{Bus, Cpu};

impl Cpu {
    /// Apply one decoded instruction. Immediates have already been
    /// consumed, so `pc` points at the next instruction.
    pub(super) fn execute<B: Bus>(&mut self, bus: &mut B, instr: Instruction) {
        match instr {
            Instruction::Nop => {}
            Instruction::Stop => self.exec_stop(),
            Instruction::Halt => self.exec_halt(),
            Instruction::Di => self.set_ime(false),
            Instruction::Ei => self.set_ime(true),

            Instruction::Ld { dst, src } => self.exec_ld_r_r(bus, dst, src),
            Instruction::LdImm { dst, value } => self.write_operand(bus, dst, value),
            Instruction::LdIndirectA(target) => self.exec_ld_indirect_a(bus, target),
            Instruction::LdAIndirect(target) => self.exec_ld_a_indirect(bus, target),
            Instruction::LdAddrA(addr) => bus.write8(addr, self.regs.a()),
            Instruction::LdAAddr(addr) => self.regs.set_a(bus.read8(addr)),
            Instruction::LdhImmA(offset) => self.exec_ldh_store(bus, offset),
            Instruction::LdhAImm(offset) => self.exec_ldh_load(bus, offset),
            Instruction::LdhCA => self.exec_ldh_store(bus, self.regs.get8(Reg8::C)),
            Instruction::LdhAC => self.exec_ldh_load(bus, self.regs.get8(Reg8::C)),

            Instruction::Ld16Imm { dst, value } => self.regs.set16(dst, value),
            Instruction::LdAddrSp(addr) => self.exec_ld_a16_sp(bus, addr),
            Instruction::LdSpHl => self.regs.set_sp(self.regs.hl()),
            Instruction::LdHlSpOffset(offset) => self.exec_ld_hl_sp_offset(offset),

            Instruction::Inc8(target) => self.exec_inc8(bus, target),
            Instruction::Dec8(target) => self.exec_dec8(bus, target),
            Instruction::Inc16(pair) => self.regs.inc16(pair),
            Instruction::Dec16(pair) => self.regs.dec16(pair),
            Instruction::AddHl(pair) => self.alu_add16_hl(self.regs.get16(pair)),
            Instruction::AddSpOffset(offset) => self.exec_add_sp_offset(offset),
            Instruction::Alu { op, src } => {
                let value = match src {
                    AluSrc::Reg(operand) => self.read_operand(bus, operand),
                    AluSrc::Imm(value) => value,
                };
                self.alu(op, value);
            }

            Instruction::Rlca => self.rotate_a(RotOp::Rlc),
            Instruction::Rrca => self.rotate_a(RotOp::Rrc),
            Instruction::Rla => self.rotate_a(RotOp::Rl),
            Instruction::Rra => self.rotate_a(RotOp::Rr),
            Instruction::Daa => self.alu_daa(),
            Instruction::Cpl => self.exec_cpl(),
            Instruction::Scf => self.exec_scf(),
            Instruction::Ccf => self.exec_ccf(),

            Instruction::Jr { cond, offset } => self.exec_jr(cond, offset),
            Instruction::Jp { cond, addr } => self.exec_jp(cond, addr),
            Instruction::JpHl => self.regs.set_pc(self.regs.hl()),
            Instruction::Call { cond, addr } => self.exec_call(bus, cond, addr),
            Instruction::Ret { cond } => self.exec_ret(bus, cond),
            Instruction::Reti => {
                self.exec_ret(bus, None);
                self.set_ime(true);
            }
            Instruction::Rst(vector) => self.exec_call(bus, None, vector as u16),
            Instruction::Push(pair) => self.exec_push(bus, pair),
            Instruction::Pop(pair) => self.exec_pop(bus, pair),

            Instruction::Rot { op, target } => self.exec_cb_rotate(bus, op, target),
            Instruction::Bit { bit, target } => self.exec_cb_bit(bus, bit, target),
            Instruction::Res { bit, target } => self.exec_cb_write_bit(bus, bit, target, false),
            Instruction::Set { bit, target } => self.exec_cb_write_bit(bus, bit, target, true),
        }
    }
}
