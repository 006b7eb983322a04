//! End-to-end scenarios: assemble a short program, run it to completion,
//! and check the architectural state it leaves behind. Mirrors §8's worked
//! examples.

use picoblaze::{Assembler, Condition, Instruction, Operand, Processor, Program, ShiftOp, VecLineSource};

fn assemble(text: &str) -> Program {
    Assembler::new()
        .assemble(VecLineSource::from_text(text))
        .expect("program assembles")
}

fn run_to_completion(cpu: &mut Processor, max_steps: usize) {
    for _ in 0..max_steps {
        if cpu.outside_program() {
            return;
        }
        cpu.execute().expect("step succeeds");
    }
    panic!("program did not terminate within {max_steps} steps");
}

#[test]
fn counter_loop_runs_255_times() {
    let program = assemble("start: ADD s1, 01\n       COMPARE s1, FF\n       JUMP NZ, start");
    let mut cpu = Processor::new();
    cpu.load_program(program);

    run_to_completion(&mut cpu, 10_000);

    assert_eq!(cpu.register("s1").expect("s1"), 0xFF);
    assert!(cpu.flags().zero, "loop should exit with zero set");
}

#[test]
fn stack_round_trip_through_call_and_return() {
    let program = assemble(
        "        CALL sub\n\
         halt:   JUMP halt\n\
         ADDRESS 010\n\
         sub:    RETURN",
    );
    let mut cpu = Processor::new();
    cpu.load_program(program);

    cpu.execute().expect("call executes");
    assert_eq!(cpu.stack_len(), 1);
    assert_eq!(cpu.pc(), 0x010);

    cpu.execute().expect("return executes");
    assert_eq!(cpu.stack_len(), 0);
    assert_eq!(cpu.pc(), 1);
}

#[test]
fn shift_with_carry_chain() {
    let mut program = Program::new();
    program.insert(0, Instruction::Shift { rd: 1, op: ShiftOp::Sra });
    program.insert(1, Instruction::Shift { rd: 1, op: ShiftOp::Sla });

    let mut cpu = Processor::new();
    cpu.set_register("s1", 0x80).expect("s1");
    cpu.load_program(program);

    cpu.execute().expect("sra executes");
    assert_eq!(cpu.register("s1").expect("s1"), 0x40);
    assert!(!cpu.flags().carry, "old LSB of 0x80 is 0");
    assert!(!cpu.flags().zero);

    cpu.execute().expect("sla executes");
    assert_eq!(cpu.register("s1").expect("s1"), 0x80);
    assert!(!cpu.flags().carry);
}

#[test]
fn rotate_identity_over_all_byte_values() {
    let mut program = Program::new();
    for addr in 0..8u32 {
        program.insert(addr, Instruction::Shift { rd: 0, op: ShiftOp::Rl });
    }

    for v in 0u32..=255 {
        let mut cpu = Processor::new();
        cpu.set_register("s0", i64::from(v)).expect("s0");
        cpu.load_program(program.clone());

        for _ in 0..8 {
            cpu.execute().expect("rl executes");
        }

        assert_eq!(
            cpu.register("s0").expect("s0"),
            v,
            "RL x8 should be identity for {v:#04x}"
        );
        assert_eq!(
            cpu.flags().carry,
            v & 1 != 0,
            "carry should equal bit 7 (the spec's LSB) of {v:#04x}"
        );
    }
}

/// §8 scenario 5: interrupt save/restore via `RETURNI ENABLE`.
#[test]
fn interrupt_save_and_restore_via_returni() {
    let mut cpu = Processor::new().with_isr_addr(0x3FF);

    cpu.set_register("s0", 5).expect("s0");
    cpu.set_register("s1", 10).expect("s1");
    assert!(5 < 10); // sanity: COMPARE below should set carry, not zero

    // Drive carry=true, zero=false the ordinary way (COMPARE), enable
    // interrupts (EINT is the only path to `interrupt_enabled`, per §4.4's
    // `ExternalInterface` contract — it is not externally settable), then
    // land back on pc=0x010 before the interrupt is raised.
    let mut setup = Program::new();
    setup.insert(0x010, Instruction::Compare { a: 0, b: Operand::Register(1) });
    setup.insert(0x011, Instruction::EnableInterrupt);
    setup.insert(0x012, Instruction::Jump { target: 0x010, cond: Condition::Always });
    setup.insert(0x3FF, Instruction::ReturnInterrupt { enable: true });
    cpu.load_program(setup);
    cpu.jump_to(0x010);

    cpu.execute().expect("compare sets carry=true, zero=false");
    assert!(cpu.flags().carry);
    assert!(!cpu.flags().zero);
    cpu.execute().expect("eint enables interrupts");
    assert!(cpu.flags().interrupt_enabled);
    cpu.execute().expect("jump back to 0x010");
    assert_eq!(cpu.pc(), 0x010);

    cpu.external().set_interrupt(true);
    cpu.execute().expect("interrupt entry consumes this step");
    assert_eq!(cpu.pc(), 0x3FF);
    assert_eq!(cpu.stack_len(), 1);
    assert!(!cpu.flags().interrupt_enabled);
    assert!(cpu.flags().preserved_carry);
    assert!(!cpu.flags().preserved_zero);

    cpu.execute().expect("returni executes on the next step");
    assert_eq!(cpu.pc(), 0x010);
    assert!(cpu.flags().carry);
    assert!(!cpu.flags().zero);
    assert!(cpu.flags().interrupt_enabled);
    assert_eq!(cpu.stack_len(), 0);
}

#[test]
fn assembler_constants_and_labels() {
    let source =
        "CONSTANT LIMIT, FF\nloop: ADD s0, 01\n      COMPARE s0, LIMIT\n      JUMP NZ, loop";
    let program = assemble(source);

    assert_eq!(
        program[&1],
        Instruction::Compare { a: 0, b: Operand::Literal(0xFF) }
    );
    assert_eq!(
        program[&2],
        Instruction::Jump { target: 0, cond: Condition::NotZero }
    );
}
