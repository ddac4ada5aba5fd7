use super::decode::{AluOp, RotOp};
use super::regs::Flags;
use super::Cpu;

impl Cpu {
    /// Dispatch one accumulator ALU operation against `value`.
    pub(super) fn alu(&mut self, op: AluOp, value: u8) {
        match op {
            AluOp::Add => self.alu_add(value, false),
            AluOp::Adc => self.alu_add(value, true),
            AluOp::Sub => self.alu_sub(value, false),
            AluOp::Sbc => self.alu_sub(value, true),
            AluOp::And => self.alu_and(value),
            AluOp::Xor => self.alu_xor(value),
            AluOp::Or => self.alu_or(value),
            AluOp::Cp => self.alu_cp(value),
        }
    }

    /// Core 8-bit ADD/ADC on A.
    ///
    /// `use_carry` selects between ADD (false) and ADC (true).
    pub(super) fn alu_add(&mut self, value: u8, use_carry: bool) {
        let a = self.regs.a();
        let carry_in = u8::from(use_carry && self.regs.carry());

        let half = (a & 0x0F) + (value & 0x0F) + carry_in;
        let full = a as u16 + value as u16 + carry_in as u16;
        let result = full as u8;

        self.regs.set_a(result);

        let mut flags = Flags::empty();
        flags.set(Flags::Z, result == 0);
        flags.set(Flags::H, half > 0x0F);
        flags.set(Flags::C, full > 0xFF);
        self.regs.set_flags(flags);
    }

    /// Core 8-bit SUB/SBC on A.
    pub(super) fn alu_sub(&mut self, value: u8, use_carry: bool) {
        let result = self.sub_flags(value, use_carry);
        self.regs.set_a(result);
    }

    /// Compare: flags as for SUB, A unchanged.
    pub(super) fn alu_cp(&mut self, value: u8) {
        self.sub_flags(value, false);
    }

    fn sub_flags(&mut self, value: u8, use_carry: bool) -> u8 {
        let a = self.regs.a();
        let carry_in = i16::from(use_carry && self.regs.carry());

        let half = (a & 0x0F) as i16 - (value & 0x0F) as i16 - carry_in;
        let full = a as i16 - value as i16 - carry_in;
        let result = full as u8;

        let mut flags = Flags::N;
        flags.set(Flags::Z, result == 0);
        flags.set(Flags::H, half < 0);
        flags.set(Flags::C, full < 0);
        self.regs.set_flags(flags);
        result
    }

    pub(super) fn alu_and(&mut self, value: u8) {
        let result = self.regs.a() & value;
        self.regs.set_a(result);

        let mut flags = Flags::H;
        flags.set(Flags::Z, result == 0);
        self.regs.set_flags(flags);
    }

    pub(super) fn alu_or(&mut self, value: u8) {
        let result = self.regs.a() | value;
        self.regs.set_a(result);
        self.set_zero_only(result);
    }

    pub(super) fn alu_xor(&mut self, value: u8) {
        let result = self.regs.a() ^ value;
        self.regs.set_a(result);
        self.set_zero_only(result);
    }

    fn set_zero_only(&mut self, result: u8) {
        let mut flags = Flags::empty();
        flags.set(Flags::Z, result == 0);
        self.regs.set_flags(flags);
    }

    /// Decimal adjust A after a BCD addition or subtraction.
    ///
    /// N is left as the previous instruction set it; H is always cleared.
    pub(super) fn alu_daa(&mut self) {
        let a = self.regs.a();
        let half = self.regs.half_carry();
        let mut carry = self.regs.carry();

        let result = if self.regs.subtract() {
            let mut adjust = 0u8;
            if half {
                adjust += 0x06;
            }
            if carry {
                adjust += 0x60;
            }
            a.wrapping_sub(adjust)
        } else {
            let mut adjust = 0u8;
            if half || (a & 0x0F) > 0x09 {
                adjust += 0x06;
            }
            if carry || a > 0x99 {
                adjust += 0x60;
                carry = true;
            }
            a.wrapping_add(adjust)
        };

        self.regs.set_a(result);
        self.regs.set_flag(Flags::Z, result == 0);
        self.regs.set_flag(Flags::H, false);
        self.regs.set_flag(Flags::C, carry);
    }

    /// INC r / INC (HL). C is left unchanged.
    pub(super) fn alu_inc8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_add(1);
        self.regs.set_flag(Flags::Z, result == 0);
        self.regs.set_flag(Flags::N, false);
        self.regs.set_flag(Flags::H, (value & 0x0F) == 0x0F);
        result
    }

    /// DEC r / DEC (HL). C is left unchanged.
    pub(super) fn alu_dec8(&mut self, value: u8) -> u8 {
        let result = value.wrapping_sub(1);
        self.regs.set_flag(Flags::Z, result == 0);
        self.regs.set_flag(Flags::N, true);
        self.regs.set_flag(Flags::H, (value & 0x0F) == 0);
        result
    }

    /// `ADD HL,rr`. Z is unaffected.
    pub(super) fn alu_add16_hl(&mut self, value: u16) {
        let hl = self.regs.hl();
        self.regs.set_flag(Flags::N, false);
        self.regs.set_flag(Flags::H, (hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.regs.set_flag(Flags::C, hl as u32 + value as u32 > 0xFFFF);
        self.regs.set_hl(hl.wrapping_add(value));
    }

    /// SP plus a signed offset, for `ADD SP,e` and `LD HL,SP+e`.
    ///
    /// Z and N are cleared; H and C come from the unsigned low-byte add.
    pub(super) fn alu_add16_signed(&mut self, base: u16, offset: i8) -> u16 {
        let offset = offset as i16 as u16;
        let mut flags = Flags::empty();
        flags.set(Flags::H, (base & 0x000F) + (offset & 0x000F) > 0x000F);
        flags.set(Flags::C, (base & 0x00FF) + (offset & 0x00FF) > 0x00FF);
        self.regs.set_flags(flags);
        base.wrapping_add(offset)
    }

    /// Rotate/shift `value`, setting Z from the result and C from the bit
    /// shifted out. N and H are cleared.
    pub(super) fn alu_rotate(&mut self, op: RotOp, value: u8) -> u8 {
        let carry_in = self.regs.carry();
        let (result, carry) = match op {
            RotOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            RotOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            RotOp::Rl => ((value << 1) | u8::from(carry_in), value & 0x80 != 0),
            RotOp::Rr => (
                (value >> 1) | if carry_in { 0x80 } else { 0 },
                value & 0x01 != 0,
            ),
            RotOp::Sla => (value << 1, value & 0x80 != 0),
            // Bit 7 is preserved.
            RotOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            RotOp::Swap => (value.rotate_left(4), false),
            RotOp::Srl => (value >> 1, value & 0x01 != 0),
        };

        let mut flags = Flags::empty();
        flags.set(Flags::Z, result == 0);
        flags.set(Flags::C, carry);
        self.regs.set_flags(flags);
        result
    }

    /// RLCA/RRCA/RLA/RRA: as the CB forms on A, but Z is always cleared.
    pub(super) fn rotate_a(&mut self, op: RotOp) {
        let result = self.alu_rotate(op, self.regs.a());
        self.regs.set_a(result);
        self.regs.set_flag(Flags::Z, false);
    }
}
