//! Instruction Set Architecture (ISA) definitions.
//!
//! Defines the VM's instruction set. The
//! [`for_each_instruction!`](crate::for_each_instruction) macro holds the
//! canonical instruction definitions and invokes a callback macro for code
//! generation, so multiple impls (the enum itself, its textual rendering, the
//! stability tests) are generated from one list and cannot drift apart.
//!
//! This module generates:
//! - The [`Instruction`] enum, one variant per operation with its operand
//!   fields inline
//! - [`Instruction::name`] returning the canonical mnemonic
//! - The `Display` impl producing the disassembly text form:
//!   the mnemonic followed by comma-separated `operand:value` pairs, e.g.
//!   `Add dst:$GPR0, lhs:$GPR1, rhs:$GPR2` or `Jump address:@20`
//!
//! Instructions are held decoded: a package stores `Instruction` values
//! directly rather than an encoded byte stream, which keeps dispatch a single
//! exhaustive match and operand access free of decoding errors.

use crate::bytecode::jump_address::JumpAddress;
use crate::bytecode::register::Register;

/// Invokes a callback macro with the complete instruction definition list.
///
/// This macro enables code generation for instructions in multiple modules
/// without duplicating the instruction definitions. Operand types must be in
/// scope at the invocation site ([`Register`], [`JumpAddress`]).
#[macro_export]
macro_rules! for_each_instruction {
    ($callback:ident) => {
        $callback! {
            // =========================
            // Data movement: immediates
            // =========================
            /// `LoadImmediate8 dst, value` ; reg[dst] = zero_extend(value)
            LoadImmediate8 => [dst: Register, value: u8],
            /// `PushImmediate8 value` ; push a 1-byte literal onto the operand stack
            PushImmediate8 => [value: u8],
            /// `PushImmediate16 value` ; push a 2-byte literal onto the operand stack
            PushImmediate16 => [value: u16],
            /// `PushImmediate32 value` ; push a 4-byte literal onto the operand stack
            PushImmediate32 => [value: u32],
            /// `PushImmediate64 value` ; push an 8-byte literal onto the operand stack
            PushImmediate64 => [value: u64],
            // =========================
            // Register <-> stack
            // =========================
            /// `PushRegister src` ; push an 8-byte slot holding reg[src]
            PushRegister => [src: Register],
            /// `PopRegister` ; pop one 8-byte register-sized slot and discard it
            PopRegister => [],
            /// `Push byte_count` ; reserve byte_count bytes of stack space
            Push => [byte_count: u64],
            /// `Pop byte_count` ; release byte_count bytes of stack space
            Pop => [byte_count: u64],
            /// `LoadFromStack dst, src` ; reg[dst] = 8-byte slot at stack offset src
            LoadFromStack => [dst: Register, src: u64],
            /// `Load8FromStack dst, src` ; reg[dst] = zero_extend(u8 at stack offset src)
            Load8FromStack => [dst: Register, src: u64],
            /// `Load16FromStack dst, src` ; reg[dst] = zero_extend(u16 at stack offset src)
            Load16FromStack => [dst: Register, src: u64],
            /// `Load32FromStack dst, src` ; reg[dst] = zero_extend(u32 at stack offset src)
            Load32FromStack => [dst: Register, src: u64],
            /// `StoreToStack dst, src` ; 8-byte slot at stack offset dst = reg[src]
            StoreToStack => [dst: u64, src: Register],
            /// `Store8ToStack dst, src` ; u8 at stack offset dst = low 8 bits of reg[src]
            Store8ToStack => [dst: u64, src: Register],
            /// `Store16ToStack dst, src` ; u16 at stack offset dst = low 16 bits of reg[src]
            Store16ToStack => [dst: u64, src: Register],
            /// `Store32ToStack dst, src` ; u32 at stack offset dst = low 32 bits of reg[src]
            Store32ToStack => [dst: u64, src: Register],
            // =========================
            // Arithmetic / comparison
            // =========================
            /// `Add dst, lhs, rhs` ; reg[dst] = reg[lhs] + reg[rhs] (wrapping)
            Add => [dst: Register, lhs: Register, rhs: Register],
            /// `Sub dst, lhs, rhs` ; reg[dst] = reg[lhs] - reg[rhs] (wrapping)
            Sub => [dst: Register, lhs: Register, rhs: Register],
            /// `Increment dst` ; reg[dst] = reg[dst] + 1 (wrapping)
            Increment => [dst: Register],
            /// `Decrement dst` ; reg[dst] = reg[dst] - 1 (wrapping)
            Decrement => [dst: Register],
            /// `CompareGreater dst, lhs, rhs` ; reg[dst] = (reg[lhs] > reg[rhs]) ? 1 : 0
            CompareGreater => [dst: Register, lhs: Register, rhs: Register],
            // =========================
            // Control flow
            // =========================
            /// `Jump address` ; schedule a jump to address
            Jump => [address: JumpAddress],
            /// `JumpIf condition, address` ; schedule a jump to address if reg[condition] != 0
            JumpIf => [condition: Register, address: JumpAddress],
            /// `Call callee, parameters` ; push a call frame and schedule a jump to callee
            Call => [callee: JumpAddress, parameters: u64],
            /// `Return` ; pop the top call frame, pop its parameters, jump back
            Return => [],
        }
    };
}

macro_rules! define_instructions {
    (
        $(
            $(#[$doc:meta])*
            $name:ident => [ $( $field:ident : $field_ty:ty ),* $(,)? ]
        ),* $(,)?
    ) => {
        /// A single decoded bytecode instruction.
        ///
        /// Operand fields are directly accessible; there is no separate
        /// encoding step between building a package and executing it.
        #[derive(Clone, Copy, Debug, Eq, PartialEq)]
        pub enum Instruction {
            $(
                $(#[$doc])*
                $name { $( $field: $field_ty ),* },
            )*
        }

        impl Instruction {
            /// Returns the canonical instruction name used in disassembly.
            pub const fn name(&self) -> &'static str {
                match self {
                    $( Instruction::$name { .. } => stringify!($name), )*
                }
            }
        }

        impl ::std::fmt::Display for Instruction {
            /// Renders the instruction in its disassembly text form: the
            /// mnemonic followed by comma-separated `operand:value` pairs.
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                match self {
                    $(
                        Instruction::$name { $( $field ),* } => {
                            f.write_str(stringify!($name))?;
                            let operands: &[(&str, &dyn ::std::fmt::Display)] =
                                &[ $( (stringify!($field), $field) ),* ];
                            for (index, (operand, value)) in operands.iter().enumerate() {
                                let separator = if index == 0 { " " } else { ", " };
                                write!(f, "{separator}{operand}:{value}")?;
                            }
                            Ok(())
                        }
                    )*
                }
            }
        }
    };
}

for_each_instruction!(define_instructions);

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! define_instruction_names {
        (
            $(
                $(#[$doc:meta])*
                $name:ident => [ $( $field:ident : $field_ty:ty ),* $(,)? ]
            ),* $(,)?
        ) => {
            const INSTRUCTION_NAMES: &[&str] = &[ $( stringify!($name) ),* ];
        };
    }

    for_each_instruction!(define_instruction_names);

    /// The ISA is append-only: removing or renaming an instruction breaks
    /// every package built against it.
    #[test]
    fn instruction_set_unchanged() {
        assert_eq!(
            INSTRUCTION_NAMES,
            &[
                "LoadImmediate8",
                "PushImmediate8",
                "PushImmediate16",
                "PushImmediate32",
                "PushImmediate64",
                "PushRegister",
                "PopRegister",
                "Push",
                "Pop",
                "LoadFromStack",
                "Load8FromStack",
                "Load16FromStack",
                "Load32FromStack",
                "StoreToStack",
                "Store8ToStack",
                "Store16ToStack",
                "Store32ToStack",
                "Add",
                "Sub",
                "Increment",
                "Decrement",
                "CompareGreater",
                "Jump",
                "JumpIf",
                "Call",
                "Return",
            ]
        );
    }

    #[test]
    fn instruction_names_are_unique() {
        let mut names: Vec<&str> = INSTRUCTION_NAMES.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), INSTRUCTION_NAMES.len());
    }

    #[test]
    fn name_matches_display_mnemonic() {
        let instruction = Instruction::Add {
            dst: Register::GPR0,
            lhs: Register::GPR1,
            rhs: Register::GPR2,
        };
        assert_eq!(instruction.name(), "Add");
        assert!(instruction.to_string().starts_with("Add "));

        let instruction = Instruction::Return {};
        assert_eq!(instruction.name(), "Return");
        assert_eq!(instruction.to_string(), "Return");
    }

    #[test]
    fn display_register_operands() {
        let instruction = Instruction::Add {
            dst: Register::GPR0,
            lhs: Register::GPR1,
            rhs: Register::GPR2,
        };
        assert_eq!(instruction.to_string(), "Add dst:$GPR0, lhs:$GPR1, rhs:$GPR2");
    }

    #[test]
    fn display_immediate_operands() {
        let instruction = Instruction::LoadImmediate8 {
            dst: Register::GPR0,
            value: 42,
        };
        assert_eq!(instruction.to_string(), "LoadImmediate8 dst:$GPR0, value:42");

        let instruction = Instruction::PushImmediate64 { value: 1 << 40 };
        assert_eq!(
            instruction.to_string(),
            format!("PushImmediate64 value:{}", 1u64 << 40)
        );
    }

    #[test]
    fn display_jump_operands() {
        let instruction = Instruction::Jump {
            address: JumpAddress::new(20),
        };
        assert_eq!(instruction.to_string(), "Jump address:@20");

        let instruction = Instruction::JumpIf {
            condition: Register::GPR3,
            address: JumpAddress::new(8),
        };
        assert_eq!(instruction.to_string(), "JumpIf condition:$GPR3, address:@8");

        let instruction = Instruction::Call {
            callee: JumpAddress::new(0),
            parameters: 8,
        };
        assert_eq!(instruction.to_string(), "Call callee:@0, parameters:8");
    }

    #[test]
    fn display_stack_operands() {
        let instruction = Instruction::LoadFromStack {
            dst: Register::GPR1,
            src: 24,
        };
        assert_eq!(instruction.to_string(), "LoadFromStack dst:$GPR1, src:24");

        let instruction = Instruction::Store16ToStack {
            dst: 8,
            src: Register::GPR2,
        };
        assert_eq!(instruction.to_string(), "Store16ToStack dst:8, src:$GPR2");

        let instruction = Instruction::Pop { byte_count: 16 };
        assert_eq!(instruction.to_string(), "Pop byte_count:16");
    }
}
