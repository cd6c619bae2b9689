//! End-to-end runs: source text through the assembler, linker and
//! emulator.

use mica::runtime::{Cpu, Memory, INITIAL_SP};
use mica::symbol::{Interrupt, StatusFlag};
use mica::{AsmParser, Image};

fn assemble(src: &'static str) -> Image {
    let asm = AsmParser::new(src).unwrap().parse().unwrap();
    Image::assemble(&asm).unwrap()
}

fn run(src: &'static str, budget: i64) -> (Cpu, Memory) {
    let image = assemble(src);
    let mut mem = Memory::new();
    let mut cpu = Cpu::new();
    cpu.reset(&mut mem);
    mem.load(image.bytes()).unwrap();
    cpu.execute(budget, &mut mem).unwrap();
    (cpu, mem)
}

#[test]
fn subroutine_call() {
    let (cpu, _) = run(
        r#"
        store:
        mov r3 0x08
        rtn
        .main:
        mov r1 0x04 ; load constant into register 1
        mov r2 r1   ; copy register 1 into register 2
        add r1 r2   ; sum registers 1 and 2
        jsr store
        halt
        "#,
        1000,
    );
    assert!(cpu.halted());
    assert_eq!(cpu.regs.get(1), 8);
    assert_eq!(cpu.regs.get(2), 4);
    assert_eq!(cpu.regs.get(3), 8);
    assert_eq!(cpu.regs.sp(), INITIAL_SP);
}

#[test]
fn counting_loop_with_backward_label() {
    let (cpu, _) = run(
        r#"
        .main:
        mov r0 0
        loop:
        inc r0
        jrn r0 0x10 loop
        halt
        "#,
        1000,
    );
    assert!(cpu.halted());
    assert_eq!(cpu.regs.get(0), 0x10);
}

#[test]
fn stack_round_trip() {
    let (cpu, _) = run(
        r#"
        .main:
        mov r1 0x1234
        push r1
        mov r1 0
        pop r1
        halt
        "#,
        1000,
    );
    assert!(cpu.halted());
    assert_eq!(cpu.regs.get(1), 0x1234);
    assert_eq!(cpu.regs.sp(), INITIAL_SP);
}

#[test]
fn forward_call_is_linked() {
    let (cpu, _) = run(
        r#"
        .main:
        jsr later
        halt
        later:
        mov r5 0xBEEF
        rtn
        "#,
        1000,
    );
    assert!(cpu.halted());
    assert_eq!(cpu.regs.get(5), 0xBEEF);
}

#[test]
fn program_installs_its_own_interrupt_vector() {
    let image = assemble(
        r#"
        handler:
        mov [0x200] 0xAA
        pops
        rtn
        .main:
        mov [0xFFF0] handler
        sei
        noop
        noop
        halt
        "#,
    );
    let mut mem = Memory::new();
    let mut cpu = Cpu::new();
    cpu.reset(&mut mem);
    mem.load(image.bytes()).unwrap();
    cpu.regs.raise(Interrupt::I0);

    cpu.execute(1000, &mut mem).unwrap();
    assert!(cpu.halted());
    assert_eq!(mem.read_byte(0x200), 0xAA);
    // The handler's POPS restored the interrupt-enable flag
    assert!(cpu.regs.flag(StatusFlag::I));
    assert_eq!(cpu.regs.sp(), INITIAL_SP);
}

#[test]
fn pushc_and_pop_pair() {
    let (cpu, _) = run(
        r#"
        .main:
        push 0x0123
        pop r4
        halt
        "#,
        1000,
    );
    assert_eq!(cpu.regs.get(4), 0x0123);
    assert_eq!(cpu.regs.sp(), INITIAL_SP);
}

#[test]
fn memory_arithmetic_through_a_pointer() {
    let (cpu, mem) = run(
        r#"
        .main:
        mov [0x300] 0x0010
        mov r2 0x300
        mov r1 0x0001
        add r1 [r2]
        inc [0x300]
        halt
        "#,
        1000,
    );
    assert_eq!(cpu.regs.get(1), 0x11);
    assert_eq!(mem.read_word(0x300), 0x11);
}
