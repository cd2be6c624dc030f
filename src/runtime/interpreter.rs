//! Bytecode fetch/dispatch loop.
//!
//! The [`Interpreter`] owns the instruction pointer and the pending-jump slot
//! and borrows the VM mutably and the package immutably for the duration of
//! one execution. Each step runs in a fixed order: fetch the instruction at
//! `ip`, advance `ip` past it, apply the instruction's effect, then apply any
//! jump the effect scheduled.
//!
//! # Deferred jumps
//!
//! Instruction effects never mutate the instruction pointer directly; control
//! flow schedules a jump through [`Interpreter::jump`] and the interpreter
//! applies it after the effect returns. Because `ip` has already advanced
//! when the effect runs, `Call` records the instruction after itself as the
//! return address simply by reading `ip`.

use crate::bytecode::isa::Instruction;
use crate::bytecode::jump_address::JumpAddress;
use crate::bytecode::package::Package;
use crate::bytecode::register::Register;
use crate::runtime::errors::{ExecutionError, VMError};
use crate::runtime::vm::{REGISTER_SLOT_BYTE_COUNT, VM};

/// Active execution context: a VM running one package.
pub struct Interpreter<'a> {
    vm: &'a mut VM,
    package: &'a Package,
    instruction_pointer: u64,
    pending_jump: Option<JumpAddress>,
}

impl<'a> Interpreter<'a> {
    /// Creates an interpreter over the given VM and package, with the
    /// instruction pointer at the first instruction.
    pub fn new(vm: &'a mut VM, package: &'a Package) -> Interpreter<'a> {
        Interpreter {
            vm,
            package,
            instruction_pointer: 0,
            pending_jump: None,
        }
    }

    /// Moves the instruction pointer to `entry_point`.
    ///
    /// The caller is responsible for passing a valid instruction index; an
    /// out-of-range entry point makes the next [`Interpreter::execute`]
    /// terminate immediately, exactly as if the program had run off the end.
    pub fn set_entry_point(&mut self, entry_point: u64) {
        self.instruction_pointer = entry_point;
    }

    /// Returns the index of the next instruction to fetch.
    pub fn instruction_pointer(&self) -> u64 {
        self.instruction_pointer
    }

    /// Returns the VM this interpreter executes against.
    pub fn vm(&self) -> &VM {
        &*self.vm
    }

    /// Runs until the instruction pointer leaves the package.
    ///
    /// Terminates normally when `ip` overshoots the last instruction; any
    /// broken invariant aborts execution with an [`ExecutionError`] naming
    /// the offending instruction.
    pub fn execute(&mut self) -> Result<(), ExecutionError> {
        while self.step()? {}
        Ok(())
    }

    /// Executes at most one instruction.
    ///
    /// Returns `Ok(false)` once the instruction pointer no longer names an
    /// instruction. Driving execution step by step lets an embedder bound
    /// programs that never terminate on their own.
    pub fn step(&mut self) -> Result<bool, ExecutionError> {
        if !self.package.is_valid(self.instruction_pointer) {
            return Ok(false);
        }

        let ip = self.instruction_pointer;
        let instruction = *self.package.fetch(ip);
        self.instruction_pointer += 1;

        self.dispatch(instruction)
            .and_then(|()| self.apply_pending_jump())
            .map_err(|source| ExecutionError { ip, source })?;
        Ok(true)
    }

    /// Schedules a jump to be applied once the current instruction's effect
    /// finishes.
    ///
    /// Returns [`VMError::DoubleJumpScheduled`] if a jump is already pending;
    /// no instruction may schedule two jumps in one step.
    pub fn jump(&mut self, address: JumpAddress) -> Result<(), VMError> {
        if let Some(pending) = self.pending_jump {
            return Err(VMError::DoubleJumpScheduled {
                scheduled: address.address(),
                pending: pending.address(),
            });
        }
        self.pending_jump = Some(address);
        Ok(())
    }

    /// Records a call frame for the instruction after the current one and
    /// schedules the jump into the callee.
    pub fn call(&mut self, callee: JumpAddress, parameters_byte_count: u64) -> Result<(), VMError> {
        // `ip` already points past the call instruction, so it is the return
        // address as-is.
        let return_address = JumpAddress::new(self.instruction_pointer);
        self.vm
            .call_stack_mut()
            .push(return_address, parameters_byte_count);
        self.jump(callee)
    }

    /// Pops the top call frame, releases the caller-pushed parameter region
    /// and schedules the jump back to the return address.
    pub fn return_from_call(&mut self) -> Result<(), VMError> {
        let frame = self.vm.call_stack_mut().pop()?;
        self.vm.stack_mut().pop(frame.parameters_byte_count)?;
        self.jump(frame.return_address)
    }

    /// Moves the instruction pointer to the pending jump target, if any.
    fn apply_pending_jump(&mut self) -> Result<(), VMError> {
        let Some(target) = self.pending_jump.take() else {
            return Ok(());
        };

        // One past the last instruction is the normal termination address;
        // only targets beyond that can never be reached by falling through.
        if target.address() > self.package.count() as u64 {
            return Err(VMError::InvalidJumpTarget {
                address: target.address(),
                instruction_count: self.package.count(),
            });
        }
        self.instruction_pointer = target.address();
        Ok(())
    }

    /// Applies one instruction's effect to the VM state.
    fn dispatch(&mut self, instruction: Instruction) -> Result<(), VMError> {
        match instruction {
            Instruction::LoadImmediate8 { dst, value } => self.op_load_immediate8(dst, value),
            Instruction::PushImmediate8 { value } => self.vm.stack_mut().push_u8(value),
            Instruction::PushImmediate16 { value } => self.vm.stack_mut().push_u16(value),
            Instruction::PushImmediate32 { value } => self.vm.stack_mut().push_u32(value),
            Instruction::PushImmediate64 { value } => self.vm.stack_mut().push_u64(value),
            Instruction::PushRegister { src } => self.op_push_register(src),
            Instruction::PopRegister {} => self.vm.stack_mut().pop(REGISTER_SLOT_BYTE_COUNT),
            Instruction::Push { byte_count } => self.vm.stack_mut().push(byte_count).map(|_| ()),
            Instruction::Pop { byte_count } => self.vm.stack_mut().pop(byte_count),
            Instruction::LoadFromStack { dst, src } => self.op_load_from_stack(dst, src),
            Instruction::Load8FromStack { dst, src } => self.op_load8_from_stack(dst, src),
            Instruction::Load16FromStack { dst, src } => self.op_load16_from_stack(dst, src),
            Instruction::Load32FromStack { dst, src } => self.op_load32_from_stack(dst, src),
            Instruction::StoreToStack { dst, src } => self.op_store_to_stack(dst, src),
            Instruction::Store8ToStack { dst, src } => self.op_store8_to_stack(dst, src),
            Instruction::Store16ToStack { dst, src } => self.op_store16_to_stack(dst, src),
            Instruction::Store32ToStack { dst, src } => self.op_store32_to_stack(dst, src),
            Instruction::Add { dst, lhs, rhs } => self.op_add(dst, lhs, rhs),
            Instruction::Sub { dst, lhs, rhs } => self.op_sub(dst, lhs, rhs),
            Instruction::Increment { dst } => self.op_increment(dst),
            Instruction::Decrement { dst } => self.op_decrement(dst),
            Instruction::CompareGreater { dst, lhs, rhs } => self.op_compare_greater(dst, lhs, rhs),
            Instruction::Jump { address } => self.jump(address),
            Instruction::JumpIf { condition, address } => self.op_jump_if(condition, address),
            Instruction::Call { callee, parameters } => self.call(callee, parameters),
            Instruction::Return {} => self.return_from_call(),
        }
    }

    fn op_load_immediate8(&mut self, dst: Register, value: u8) -> Result<(), VMError> {
        self.vm.set_register(dst, u64::from(value))
    }

    fn op_push_register(&mut self, src: Register) -> Result<(), VMError> {
        let value = self.vm.register(src)?;
        self.vm.stack_mut().push_u64(value)
    }

    fn op_load_from_stack(&mut self, dst: Register, src: u64) -> Result<(), VMError> {
        let value = self.vm.stack().read_u64(src)?;
        self.vm.set_register(dst, value)
    }

    fn op_load8_from_stack(&mut self, dst: Register, src: u64) -> Result<(), VMError> {
        let value = self.vm.stack().read_u8(src)?;
        self.vm.set_register(dst, u64::from(value))
    }

    fn op_load16_from_stack(&mut self, dst: Register, src: u64) -> Result<(), VMError> {
        let value = self.vm.stack().read_u16(src)?;
        self.vm.set_register(dst, u64::from(value))
    }

    fn op_load32_from_stack(&mut self, dst: Register, src: u64) -> Result<(), VMError> {
        let value = self.vm.stack().read_u32(src)?;
        self.vm.set_register(dst, u64::from(value))
    }

    fn op_store_to_stack(&mut self, dst: u64, src: Register) -> Result<(), VMError> {
        let value = self.vm.register(src)?;
        self.vm.stack_mut().write_u64(dst, value)
    }

    fn op_store8_to_stack(&mut self, dst: u64, src: Register) -> Result<(), VMError> {
        let value = self.vm.register(src)?;
        self.vm.stack_mut().write_u8(dst, value as u8)
    }

    fn op_store16_to_stack(&mut self, dst: u64, src: Register) -> Result<(), VMError> {
        let value = self.vm.register(src)?;
        self.vm.stack_mut().write_u16(dst, value as u16)
    }

    fn op_store32_to_stack(&mut self, dst: u64, src: Register) -> Result<(), VMError> {
        let value = self.vm.register(src)?;
        self.vm.stack_mut().write_u32(dst, value as u32)
    }

    fn op_add(&mut self, dst: Register, lhs: Register, rhs: Register) -> Result<(), VMError> {
        let lhs = self.vm.register(lhs)?;
        let rhs = self.vm.register(rhs)?;
        self.vm.set_register(dst, lhs.wrapping_add(rhs))
    }

    fn op_sub(&mut self, dst: Register, lhs: Register, rhs: Register) -> Result<(), VMError> {
        let lhs = self.vm.register(lhs)?;
        let rhs = self.vm.register(rhs)?;
        self.vm.set_register(dst, lhs.wrapping_sub(rhs))
    }

    fn op_increment(&mut self, dst: Register) -> Result<(), VMError> {
        let value = self.vm.register(dst)?;
        self.vm.set_register(dst, value.wrapping_add(1))
    }

    fn op_decrement(&mut self, dst: Register) -> Result<(), VMError> {
        let value = self.vm.register(dst)?;
        self.vm.set_register(dst, value.wrapping_sub(1))
    }

    fn op_compare_greater(
        &mut self,
        dst: Register,
        lhs: Register,
        rhs: Register,
    ) -> Result<(), VMError> {
        let lhs = self.vm.register(lhs)?;
        let rhs = self.vm.register(rhs)?;
        self.vm.set_register(dst, u64::from(lhs > rhs))
    }

    fn op_jump_if(&mut self, condition: Register, address: JumpAddress) -> Result<(), VMError> {
        if self.vm.register(condition)? != 0 {
            self.jump(address)?;
        }
        Ok(())
    }
}
