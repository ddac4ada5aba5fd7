use gbz80::{CpuError, Dmg, Flags, Instruction, Reg8, StepOutcome};

const ENTRY: u16 = 0x0150;

fn machine(program: &[u8]) -> Dmg {
    let mut dmg = Dmg::new();
    dmg.load_at(ENTRY, program).unwrap();
    dmg.cpu.regs.set_pc(ENTRY);
    dmg.cpu.regs.set_sp(0xFFFE);
    dmg
}

fn run_until_idle(dmg: &mut Dmg, limit: usize) -> usize {
    for executed in 0..limit {
        if dmg.step().unwrap() == StepOutcome::Idle {
            return executed;
        }
    }
    panic!("program did not settle within {limit} steps");
}

#[test]
fn ld_a_immediate() {
    let mut dmg = machine(&[0x3E, 0x05]);
    dmg.step().unwrap();
    assert_eq!(dmg.registers().a(), 5);
    assert_eq!(dmg.registers().pc(), 0x0152);
}

#[test]
fn ld_b_then_inc_c() {
    let mut dmg = machine(&[0x06, 0x02, 0x0C]);
    dmg.step().unwrap();
    dmg.step().unwrap();
    assert_eq!(dmg.registers().get8(Reg8::B), 2);
    assert_eq!(dmg.registers().get8(Reg8::C), 1);
    assert_eq!(dmg.registers().pc(), 0x0153);
}

#[test]
fn countdown_loop() {
    // Sum 5 + 4 + 3 + 2 + 1 into A, then halt.
    let mut dmg = machine(&[
        0xFB, // EI
        0xAF, // XOR A
        0x06, 0x05, // LD B, 5
        0x80, // loop: ADD A, B
        0x05, // DEC B
        0x20, 0xFC, // JR NZ, loop
        0x76, // HALT
    ]);
    let executed = run_until_idle(&mut dmg, 100);
    assert_eq!(executed, 3 + 5 * 3 + 1);
    assert_eq!(dmg.registers().a(), 15);
    assert!(dmg.cpu.is_halted());
}

#[test]
fn bcd_addition_with_daa() {
    let mut dmg = machine(&[
        0x3E, 0x45, // LD A, 0x45
        0xC6, 0x38, // ADD A, 0x38
        0x27, // DAA
    ]);
    for _ in 0..3 {
        dmg.step().unwrap();
    }
    assert_eq!(dmg.registers().a(), 0x83);
    assert!(!dmg.registers().flag(Flags::C));
}

#[test]
fn subroutine_call_through_stack() {
    let mut dmg = machine(&[
        0xCD, 0x60, 0x01, // CALL 0x0160
        0x76, // HALT (IME clear: falls through)
        0x10, 0x00, // STOP
    ]);
    dmg.load_at(
        0x0160,
        &[
            0x21, 0x00, 0xC0, // LD HL, 0xC000
            0x36, 0xAB, // LD (HL), 0xAB
            0xC9, // RET
        ],
    )
    .unwrap();

    let executed = run_until_idle(&mut dmg, 16);
    assert_eq!(executed, 6);
    assert_eq!(dmg.memory().read(0xC000), 0xAB);
    assert_eq!(dmg.registers().sp(), 0xFFFE);
    assert!(dmg.cpu.is_stopped());
    assert_eq!(dmg.registers().pc(), 0x0156);
}

#[test]
fn peeking_ahead_does_not_disturb_execution() {
    let mut dmg = machine(&[0x3E, 0x05, 0xC3, 0x00, 0x02]);
    let (_, len) = dmg.peek(ENTRY).unwrap();
    let (next, _) = dmg.peek(ENTRY + len).unwrap();
    assert!(matches!(next, Instruction::Jp { addr: 0x0200, .. }));
    assert_eq!(dmg.registers().pc(), ENTRY);

    dmg.step().unwrap();
    dmg.step().unwrap();
    assert_eq!(dmg.registers().pc(), 0x0200);
}

#[test]
fn invalid_opcode_is_fatal() {
    let mut dmg = machine(&[0x00, 0xFD]);
    dmg.step().unwrap();
    let err = dmg.step().unwrap_err();
    assert!(err.is_fatal());
    assert_eq!(
        err,
        CpuError::InvalidOpcode {
            opcode: 0xFD,
            prefixed: false,
            pc: 0x0151
        }
    );
    assert_eq!(dmg.registers().pc(), 0x0151);
}

#[test]
fn oversize_program_is_rejected() {
    let mut dmg = Dmg::new();
    let err = dmg.load_at(ENTRY, &vec![0; 0x10000]).unwrap_err();
    assert!(!err.is_fatal());
    assert!(matches!(err, CpuError::ProgramTooLarge { .. }));
}
