//! Errors surfaced by bytecode execution.

use ember_derive::Error;

/// A memory-safety or control-flow invariant broken by an executed
/// instruction.
///
/// Every kind is fatal: the interpreter halts and surfaces the violation to
/// its caller; there is no in-VM recovery.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum VMError {
    /// Instruction referenced a register index outside the register file.
    #[error("register index {index} is outside the register file")]
    InvalidRegister { index: u8 },
    /// A taken jump targeted an instruction index outside the package.
    #[error("jump target @{address} is outside the package of {instruction_count} instructions")]
    InvalidJumpTarget {
        address: u64,
        instruction_count: usize,
    },
    /// Pop retracted more bytes than the operand stack holds.
    #[error("stack underflow: popping {requested} bytes with {top} bytes on the stack")]
    StackUnderflow { requested: u64, top: u64 },
    /// Push grew the operand stack past its size limit.
    #[error("stack overflow: pushing {requested} bytes would exceed the {limit} byte limit")]
    StackOverflow { requested: u64, limit: u64 },
    /// Load referenced bytes above the current stack top.
    #[error("stack read out of bounds: offset {offset}, width {width}, stack top {top}")]
    StackReadOutOfBounds { offset: u64, width: u64, top: u64 },
    /// Store referenced bytes above the current stack top.
    #[error("stack write out of bounds: offset {offset}, width {width}, stack top {top}")]
    StackWriteOutOfBounds { offset: u64, width: u64, top: u64 },
    /// Return executed with no call frame to return to.
    #[error("return executed with an empty call stack")]
    CallStackUnderflow,
    /// An instruction tried to schedule a second jump within one step.
    #[error("jump to @{scheduled} scheduled while a jump to @{pending} is already pending")]
    DoubleJumpScheduled { scheduled: u64, pending: u64 },
}

/// A [`VMError`] annotated with the instruction pointer of the offending
/// instruction.
///
/// This is what [`Interpreter::execute`](crate::runtime::Interpreter::execute)
/// returns; the embedder chooses how to report it.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
#[error("instruction {ip}: {source}")]
pub struct ExecutionError {
    /// Package-relative index of the instruction that broke the invariant.
    pub ip: u64,
    /// The invariant that broke.
    pub source: VMError,
}
