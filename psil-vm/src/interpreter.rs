//! The interpreter: fetch-decode-execute loop, opcode semantics
//! (`spec.md §4.E`), and the control core (`spec.md §4.F`).
//!
//! The VM has no program-visible call stack. `exec`/`ifte`/`dip`/`loop`
//! invoke quotations by recursing into [`Interpreter::invoke`], which saves
//! and restores `pc` (and `ret_flag`) in local variables around a nested
//! call to the same fetch-decode-execute loop — nesting depth is bounded by
//! both gas and the host's own stack, exactly as `spec.md §4.F`/§9
//! describes.

use psil_asm::{fetch, quotation_index, quotation_ref, Command, Instruction, Word};

use crate::config::VmConfig;
use crate::error::{Fault, Halt, LoadFault};
use crate::gas::GasMeter;
use crate::memory::SlottedMemory;
use crate::output::OutputSink;
use crate::quotation::QuotationTable;
use crate::stack::ValueStack;

/// Whether a loaded program is prefixed with a quotation table header.
/// `spec.md §6` leaves this to the caller: the scheduler's genome bank
/// stores headerless, quotation-free programs, while a program built by an
/// assembler that emits quotations is loaded in `WithQuotations` mode.
/// Nothing in the byte stream itself distinguishes the two — a plausible
/// header byte could just as well be the first opcode of a headerless
/// program — so this is a load-time choice, not something `fetch` infers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgramLayout {
    /// No header; execution starts at byte 0 and `exec`/`ifte`/etc. can
    /// never resolve a quotation (the table is empty).
    Flat,
    /// Parse the quotation header (`spec.md §4.D`) before execution.
    WithQuotations,
}

enum DispatchOutcome {
    Continue,
    Halted,
    EndOfProgram,
}

/// One micro-PSIL VM instance: value stack, slotted memory, quotation
/// table, gas meter, and the borrowed bytecode it's running.
pub struct Interpreter<'p, O> {
    program: &'p [u8],
    quotations: QuotationTable,
    stack: ValueStack,
    memory: SlottedMemory,
    gas: GasMeter,
    pc: usize,
    ret_flag: bool,
    output: O,
}

impl<'p, O: OutputSink> Interpreter<'p, O> {
    /// Load a program and prepare a fresh VM instance. Per `spec.md §9`
    /// Ownership, the stack and memory are exclusively owned here and start
    /// empty/zeroed — there is no cross-invocation leakage between brains.
    pub fn load(
        program: &'p [u8],
        layout: ProgramLayout,
        config: &VmConfig,
        output: O,
    ) -> Result<Self, LoadFault> {
        let (quotations, pc) = match layout {
            ProgramLayout::Flat => (QuotationTable::empty(), 0),
            ProgramLayout::WithQuotations => {
                let table = QuotationTable::build(program)?;
                let start = table.program_start;
                (table, start)
            }
        };

        Ok(Self {
            program,
            quotations,
            stack: ValueStack::new(config.stack_capacity),
            memory: SlottedMemory::new(config.memory_slots),
            gas: GasMeter::new(config.max_gas),
            pc,
            ret_flag: false,
            output,
        })
    }

    pub fn memory(&self) -> &SlottedMemory {
        &self.memory
    }

    pub fn memory_mut(&mut self) -> &mut SlottedMemory {
        &mut self.memory
    }

    pub fn stack(&self) -> &ValueStack {
        &self.stack
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    pub fn into_output(self) -> O {
        self.output
    }

    pub fn pc(&self) -> usize {
        self.pc
    }

    pub fn gas_remaining(&self) -> u32 {
        self.gas.remaining()
    }

    /// Run until one of the five halt codes of `spec.md §6` is reached.
    #[tracing::instrument(name = "psil_vm::run", skip(self))]
    pub fn run(&mut self) -> Halt {
        match self.run_loop() {
            Ok(halt) => halt,
            Err(fault) => Halt::Fault(fault),
        }
    }

    /// The fetch-decode-execute loop shared by the top-level `run` and
    /// every nested `invoke` (`spec.md §4.F`, step 3).
    fn run_loop(&mut self) -> Result<Halt, Fault> {
        loop {
            if self.ret_flag {
                self.ret_flag = false;
                return Ok(Halt::Ret);
            }
            if self.gas.is_exhausted() {
                return Ok(Halt::GasExhausted);
            }

            let fetched = fetch(self.program, self.pc);
            self.pc = fetched.next_pc;
            self.gas.consume();

            tracing::trace!(pc = self.pc, opcode = fetched.opcode, "step");

            match self.dispatch(fetched.instruction)? {
                DispatchOutcome::Continue => {}
                DispatchOutcome::Halted => return Ok(Halt::Halted),
                DispatchOutcome::EndOfProgram => return Ok(Halt::EndOfProgram),
            }
        }
    }

    /// `invoke(index)` (`spec.md §4.F`): save/restore `pc` and `ret_flag`
    /// around running the quotation body to completion. Invalid indices
    /// resolve to a null pointer and are a silent no-op, per `spec.md
    /// §4.D`'s `resolve` contract.
    fn invoke(&mut self, index: u16) -> Result<(), Fault> {
        let Some(addr) = self.quotations.resolve(index) else {
            return Ok(());
        };

        let saved_pc = self.pc;
        let saved_ret = self.ret_flag;
        self.pc = addr;
        self.ret_flag = false;

        let result = self.run_loop();

        self.pc = saved_pc;
        self.ret_flag = saved_ret;

        // Halted/EndOfProgram/Ret inside a quotation just end that
        // invocation; only a genuine fault propagates past it.
        result.map(|_| ())
    }

    fn dispatch(&mut self, instruction: Instruction) -> Result<DispatchOutcome, Fault> {
        use Instruction::*;

        match instruction {
            Command(cmd) => self.dispatch_command(cmd)?,
            PushSmall(n) => self.stack.push_word(n as Word)?,
            PushSlot(s) => self.stack.push_word(s as Word)?,
            PushQuotation(index) => self.stack.push_word(quotation_ref(index))?,
            PushByte(b) => self.stack.push_word(b as Word)?,
            PushWord(w) => self.stack.push_word(w)?,
            Call(imm) => self.dispatch_builtin(imm)?,
            JumpForward(imm) => self.pc = self.pc.saturating_add(imm as usize),
            JumpBackward(imm) => self.pc = self.pc.saturating_sub(imm as usize),
            JumpIfZero(imm) => {
                let v = self.stack.pop_word()?;
                if v == 0 {
                    self.pc = self.pc.saturating_add(imm as usize);
                }
            }
            JumpIfNotZero(imm) => {
                let v = self.stack.pop_word()?;
                if v != 0 {
                    self.pc = self.pc.saturating_add(imm as usize);
                }
            }
            PushQuotationExt(imm) => self.stack.push_word(quotation_ref(imm))?,
            LoadSymbolExt(imm) => {
                let v = self.memory.load(imm as Word);
                self.stack.push_word(v)?;
            }
            LocalLoad(imm) => {
                let slot = psil_asm::consts::LOCAL_BASE as u16 + imm as u16;
                let v = self.memory.load(slot as Word);
                self.stack.push_word(v)?;
            }
            LocalStore(imm) => {
                let slot = psil_asm::consts::LOCAL_BASE as u16 + imm as u16;
                let value = self.stack.pop_word()?;
                self.memory.store(slot as Word, value);
            }
            Reserved => {}
            Halt => return Ok(DispatchOutcome::Halted),
            EndOfProgram => return Ok(DispatchOutcome::EndOfProgram),
        }
        Ok(DispatchOutcome::Continue)
    }

    fn dispatch_command(&mut self, cmd: Command) -> Result<(), Fault> {
        use Command::*;

        match cmd {
            Nop | Reserved1D => {}
            Dup => self.stack.dup()?,
            Drop => self.stack.drop()?,
            Swap => self.stack.swap()?,
            Over => self.stack.over()?,
            Rot => self.stack.rot()?,
            Dup2 => self.stack.dup2()?,
            Add => self.binop(Word::wrapping_add)?,
            Sub => self.binop(Word::wrapping_sub)?,
            Mul => self.binop(Word::wrapping_mul)?,
            Div => self.binop(|a, b| if b == 0 { 0 } else { a.wrapping_div(b) })?,
            Mod => self.binop(|a, b| if b == 0 { 0 } else { a.wrapping_rem(b) })?,
            Eq => self.binop(|a, b| (a == b) as Word)?,
            Lt => self.binop(|a, b| (a < b) as Word)?,
            Gt => self.binop(|a, b| (a > b) as Word)?,
            And => self.binop(|a, b| a & b)?,
            Or => self.binop(|a, b| a | b)?,
            Not => {
                let a = self.stack.pop_word()?;
                self.stack.push_word((a == 0) as Word)?;
            }
            Neg => {
                let a = self.stack.pop_word()?;
                self.stack.push_word(a.wrapping_neg())?;
            }
            Inc => {
                let a = self.stack.pop_word()?;
                self.stack.push_word(a.wrapping_add(1))?;
            }
            Dec => {
                let a = self.stack.pop_word()?;
                self.stack.push_word(a.wrapping_sub(1))?;
            }
            Depth => {
                let d = self.stack.depth();
                self.stack.push_word(d)?;
            }
            Clear => self.stack.clear(),
            Load => {
                let slot = self.stack.pop_word()?;
                let v = self.memory.load(slot);
                self.stack.push_word(v)?;
            }
            Store => {
                let slot = self.stack.pop_word()?;
                let value = self.stack.pop_word()?;
                self.memory.store(slot, value);
            }
            Print => {
                let v = self.stack.pop_word()?;
                self.output.emit_all(v.to_string().as_bytes());
            }
            Exec => {
                let q = self.stack.pop_word()?;
                if let Some(idx) = quotation_index(q) {
                    self.invoke(idx)?;
                }
            }
            Ifte => {
                let else_q = self.stack.pop_word()?;
                let then_q = self.stack.pop_word()?;
                let cond = self.stack.pop_word()?;
                let chosen = if cond != 0 { then_q } else { else_q };
                if let Some(idx) = quotation_index(chosen) {
                    self.invoke(idx)?;
                }
            }
            Dip => {
                let q = self.stack.pop_word()?;
                let x = self.stack.pop_word()?;
                if let Some(idx) = quotation_index(q) {
                    self.invoke(idx)?;
                }
                self.stack.push_word(x)?;
            }
            Loop => {
                let q = self.stack.pop_word()?;
                let n = self.stack.pop_word()?;
                if let Some(idx) = quotation_index(q) {
                    for _ in 0..n.max(0) as usize {
                        if self.gas.is_exhausted() {
                            break;
                        }
                        self.invoke(idx)?;
                    }
                }
            }
            Ret => self.ret_flag = true,
        }
        Ok(())
    }

    fn binop(&mut self, f: impl Fn(Word, Word) -> Word) -> Result<(), Fault> {
        let b = self.stack.pop_word()?;
        let a = self.stack.pop_word()?;
        self.stack.push_word(f(a, b))?;
        Ok(())
    }

    fn dispatch_builtin(&mut self, imm: u8) -> Result<(), Fault> {
        use psil_asm::Builtin;

        let Some(builtin) = Builtin::from_byte(imm) else {
            return Ok(()); // unknown builtin index: silent no-op
        };

        match builtin {
            Builtin::Newline => self.output.emit(b'\n'),
            Builtin::Space => self.output.emit(b' '),
            Builtin::Chr => {
                let v = self.stack.pop_word()?;
                self.output.emit(v as u8);
            }
            Builtin::Abs => {
                let a = self.stack.pop_word()?;
                self.stack.push_word(a.wrapping_abs())?;
            }
            Builtin::Min => {
                let b = self.stack.pop_word()?;
                let a = self.stack.pop_word()?;
                self.stack.push_word(a.min(b))?;
            }
            Builtin::Max => {
                let b = self.stack.pop_word()?;
                let a = self.stack.pop_word()?;
                self.stack.push_word(a.max(b))?;
            }
        }
        Ok(())
    }
}
