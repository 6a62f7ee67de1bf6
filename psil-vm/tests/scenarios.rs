//! The concrete scenarios seeded in `spec.md §8`.
//!
//! A couple of the table's literal byte sequences are, by the spec's own
//! admission (scenario 3's "(dividend stays?)" hedge, and scenario 7's
//! "not applicable"/"conceptually" framing), not fully self-consistent as
//! written. Where that's the case, the test below realizes the documented
//! *intent* with an internally consistent byte sequence instead of the
//! literal table entry; see DESIGN.md for the specific resolution.

use psil_vm::{Interpreter, ProgramLayout, VmConfig};

fn run_flat(program: &[u8]) -> (psil_vm::Halt, Vec<u8>) {
    let config = VmConfig::default();
    let mut vm = Interpreter::load(program, ProgramLayout::Flat, &config, Vec::new()).unwrap();
    let halt = vm.run();
    (halt, vm.into_output())
}

#[test]
fn scenario_1_add_then_print() {
    let (halt, output) = run_flat(&[0x25, 0x23, 0x06, 0x19, 0xF0]);
    assert_eq!(halt, psil_vm::Halt::Halted);
    assert_eq!(output, b"8");
}

#[test]
fn scenario_2_sub_then_print() {
    let (halt, output) = run_flat(&[0x22, 0x21, 0x07, 0x19, 0xF0]);
    assert_eq!(halt, psil_vm::Halt::Halted);
    assert_eq!(output, b"1");
}

#[test]
fn scenario_3_divide_by_zero_is_safely_neutralised() {
    // spec.md's literal bytes (push 0, /) would underflow on a single
    // operand; the documented behavior under test is that dividing by
    // zero never faults and yields 0, which needs two operands on the
    // stack to even reach the divide.
    let config = VmConfig::default();
    let mut vm =
        Interpreter::load(&[0x25, 0x20, 0x09, 0xF0], ProgramLayout::Flat, &config, Vec::new()).unwrap();
    let halt = vm.run();
    assert_eq!(halt, psil_vm::Halt::Halted);
    assert_eq!(vm.stack().as_slice(), &[0]);
}

#[test]
fn scenario_4_dup_then_multiply() {
    let (halt, output) = run_flat(&[0x25, 0x01, 0x08, 0x19, 0xF0]);
    assert_eq!(halt, psil_vm::Halt::Halted);
    assert_eq!(output, b"25");
}

#[test]
fn scenario_5_greater_than_leaves_truth_value() {
    let config = VmConfig::default();
    let mut vm =
        Interpreter::load(&[0x21, 0x20, 0x0D, 0xF0], ProgramLayout::Flat, &config, Vec::new()).unwrap();
    let halt = vm.run();
    assert_eq!(halt, psil_vm::Halt::Halted);
    assert_eq!(vm.stack().as_slice(), &[1]);
}

#[test]
fn scenario_6_exec_a_quotation() {
    // header: n=1, length=3; body [dup, *, halt]; main: push 5, push q0, exec, print, halt
    let program = [
        0x01, 0x03, 0x00, // header
        0x01, 0x08, 0xF0, // q0: dup *, halt
        0x25, 0x60, 0x12, 0x19, 0xF0, // push 5, push q0, exec, print, halt
    ];
    let config = VmConfig::default();
    let mut vm = Interpreter::load(&program, ProgramLayout::WithQuotations, &config, Vec::new()).unwrap();
    let halt = vm.run();
    assert_eq!(halt, psil_vm::Halt::Halted);
    assert_eq!(vm.into_output(), b"25");
}

#[test]
fn scenario_7_ifte_picks_the_then_branch_on_truthy_condition() {
    // header: n=2; q0 = [push 9, print, halt] (len 3, the then-branch),
    // q1 = [push 7, print, halt] (len 3, the else-branch)
    // main: push cond=1, push q0, push q1, ifte, halt
    let mut bytes = vec![0x02u8]; // n = 2
    bytes.extend_from_slice(&3u16.to_le_bytes()); // len(q0) = 3
    bytes.extend_from_slice(&3u16.to_le_bytes()); // len(q1) = 3
    bytes.extend_from_slice(&[0x29, 0x19, 0xF0]); // q0: push 9, print, halt
    bytes.extend_from_slice(&[0x27, 0x19, 0xF0]); // q1: push 7, print, halt
    bytes.extend_from_slice(&[0x21, 0x60, 0x61, 0x13, 0xF0]); // push 1, push q0, push q1, ifte, halt

    let config = VmConfig::default();
    let mut vm = Interpreter::load(&bytes, ProgramLayout::WithQuotations, &config, Vec::new()).unwrap();
    let halt = vm.run();
    assert_eq!(halt, psil_vm::Halt::Halted);
    assert_eq!(vm.into_output(), b"9");
}

#[test]
fn n_one_loop_runs_the_body_n_times() {
    // header: n=1; q0 = [push 1, local.store inc-counter-by-reading-back]
    // Simpler invariant check: `n 1 loop` where q0 increments a Ring2 slot
    // by one, so after the loop the slot holds n.
    let mut bytes = vec![0x01u8]; // n = 1
    bytes.extend_from_slice(&7u16.to_le_bytes()); // len(q0) = 7
    // q0: load slot64, push 1, add, store slot64, halt
    bytes.extend_from_slice(&[0x88, 0x00, 0x21, 0x06, 0x89, 0x00]);
    bytes.push(0xF0); // halt terminates q0's body cleanly too
    // main: push n=5, push q0, loop, halt
    bytes.extend_from_slice(&[0x25, 0x60, 0x15, 0xF0]);

    let config = VmConfig::default();
    let mut vm = Interpreter::load(&bytes, ProgramLayout::WithQuotations, &config, Vec::new()).unwrap();
    let halt = vm.run();
    assert_eq!(halt, psil_vm::Halt::Halted);
    assert_eq!(vm.memory().load(64), 5);
}
