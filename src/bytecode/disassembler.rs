//! Human-readable package listings.

use crate::bytecode::package::Package;
use std::fmt::Write;

/// Renders a [`Package`] as numbered disassembly text, one instruction per
/// line: `[<index>] <text>`.
pub struct Disassembler<'a> {
    package: &'a Package,
}

impl<'a> Disassembler<'a> {
    /// Creates a disassembler for the given package.
    pub fn new(package: &'a Package) -> Disassembler<'a> {
        Disassembler { package }
    }

    /// Returns the full listing of the package.
    pub fn instructions_as_string(&self) -> String {
        let mut listing = String::new();
        let mut instruction_pointer = 0;
        while self.package.is_valid(instruction_pointer) {
            let instruction = self.package.fetch(instruction_pointer);
            // Infallible for String; discard the fmt plumbing result.
            let _ = writeln!(listing, "[{instruction_pointer}] {instruction}");
            instruction_pointer += 1;
        }
        listing
    }
}
