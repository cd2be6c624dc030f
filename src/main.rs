//! Demo driver for the Ember bytecode toolchain.
//!
//! Hand-assembles one of the showcase programs, optionally prints its
//! disassembly, executes it on a fresh VM and prints the result register.
//! These programs exist to exercise the execution core end to end until the
//! compiler can produce packages on its own.
//!
//! # Usage
//! ```text
//! ember <program> [OPTIONS]
//! ```
//!
//! # Arguments
//! - `program`: One of `gauss-sum`, `fibonacci-linear`, `fibonacci-recursive`
//!
//! # Options
//! - `-d, --disassemble`: Print the package listing before executing
//! - `-v, --verbose`: Enable debug logging

use ember::bytecode::{Disassembler, Instruction, JumpAddress, Package, Register};
use ember::runtime::{Interpreter, VM};
use ember::utils::log::{self, Level, Logger};
use std::env;
use std::process;

/// A hand-assembled showcase program.
struct DemoProgram {
    package: Package,
    entry_point: u64,
    result_register: Register,
    description: &'static str,
}

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 || args[1] == "--help" || args[1] == "-h" {
        print_usage(&args[0]);
        process::exit(if args.len() < 2 { 1 } else { 0 });
    }

    let program_name = &args[1];
    let mut disassemble = false;
    let mut level = Level::Info;

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--disassemble" | "-d" => disassemble = true,
            "--verbose" | "-v" => level = Level::Debug,
            other => {
                eprintln!("Unexpected argument: {}\n", other);
                print_usage(&args[0]);
                process::exit(1);
            }
        }
        i += 1;
    }

    log::init(level);
    let logger = Logger::new("driver");

    let program = match program_name.as_str() {
        "gauss-sum" => build_gauss_sum(),
        "fibonacci-linear" => build_fibonacci_linear(),
        "fibonacci-recursive" => build_fibonacci_recursive(),
        other => {
            eprintln!("Unknown program: {}\n", other);
            print_usage(&args[0]);
            process::exit(1);
        }
    };

    logger.debug(&format!(
        "{} instructions, entry point {}",
        program.package.count(),
        program.entry_point
    ));

    if disassemble {
        print!(
            "{}",
            Disassembler::new(&program.package).instructions_as_string()
        );
    }

    let mut vm = VM::new();
    let mut interpreter = Interpreter::new(&mut vm, &program.package);
    interpreter.set_entry_point(program.entry_point);

    if let Err(error) = interpreter.execute() {
        logger.error(&format!("execution failed: {error}"));
        process::exit(1);
    }

    match vm.register(program.result_register) {
        Ok(value) => println!(
            "{}: {} = {}",
            program.description, program.result_register, value
        ),
        Err(error) => {
            logger.error(&format!("result read-out failed: {error}"));
            process::exit(1);
        }
    }
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} <program> [OPTIONS]", program);
    eprintln!();
    eprintln!("Programs:");
    eprintln!("  gauss-sum            Sum of the integers 1..=100, in a register loop");
    eprintln!("  fibonacci-linear     F(16) computed iteratively over stack slots");
    eprintln!("  fibonacci-recursive  F(11) computed through recursive calls");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -d, --disassemble    Print the package listing before executing");
    eprintln!("  -v, --verbose        Enable debug logging");
    eprintln!("  -h, --help           Show this help");
}

/// `for (i = 1; !(i > 100); ++i) sum += i;` with n in GPR0, sum in GPR1 and
/// i in GPR2.
fn build_gauss_sum() -> DemoProgram {
    let mut package = Package::new();
    package.emit(Instruction::LoadImmediate8 {
        dst: Register::GPR0,
        value: 100,
    });
    package.emit(Instruction::LoadImmediate8 {
        dst: Register::GPR1,
        value: 0,
    });
    package.emit(Instruction::LoadImmediate8 {
        dst: Register::GPR2,
        value: 1,
    });
    package.emit(Instruction::CompareGreater {
        dst: Register::GPR3,
        lhs: Register::GPR2,
        rhs: Register::GPR0,
    });
    package.emit(Instruction::JumpIf {
        condition: Register::GPR3,
        address: JumpAddress::new(8),
    });
    package.emit(Instruction::Add {
        dst: Register::GPR1,
        lhs: Register::GPR1,
        rhs: Register::GPR2,
    });
    package.emit(Instruction::Increment {
        dst: Register::GPR2,
    });
    package.emit(Instruction::Jump {
        address: JumpAddress::new(3),
    });

    DemoProgram {
        package,
        entry_point: 0,
        result_register: Register::GPR1,
        description: "Gauss sum of 1..=100",
    }
}

/// Iterative Fibonacci over four stack slots `n, a, b, i`; the loop leaves
/// `b = F(16)` and the epilogue loads it into GPR0.
fn build_fibonacci_linear() -> DemoProgram {
    let mut package = Package::new();
    // int n = 15, a = 0, b = 1, i = 1;
    package.emit(Instruction::PushImmediate64 { value: 15 });
    package.emit(Instruction::PushImmediate64 { value: 0 });
    package.emit(Instruction::PushImmediate64 { value: 1 });
    package.emit(Instruction::PushImmediate64 { value: 1 });
    // while (!(i > n)) {
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR0,
        src: 24,
    });
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR1,
        src: 0,
    });
    package.emit(Instruction::CompareGreater {
        dst: Register::GPR0,
        lhs: Register::GPR1,
        rhs: Register::GPR0,
    });
    package.emit(Instruction::JumpIf {
        condition: Register::GPR0,
        address: JumpAddress::new(20),
    });
    // int temp = a;
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR0,
        src: 16,
    });
    package.emit(Instruction::PushRegister {
        src: Register::GPR0,
    });
    // a = b;
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR0,
        src: 16,
    });
    package.emit(Instruction::StoreToStack {
        dst: 24,
        src: Register::GPR0,
    });
    // b = temp + b;
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR1,
        src: 0,
    });
    package.emit(Instruction::Add {
        dst: Register::GPR0,
        lhs: Register::GPR1,
        rhs: Register::GPR0,
    });
    package.emit(Instruction::StoreToStack {
        dst: 16,
        src: Register::GPR0,
    });
    // ++i; }
    package.emit(Instruction::PopRegister {});
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR0,
        src: 0,
    });
    package.emit(Instruction::Increment {
        dst: Register::GPR0,
    });
    package.emit(Instruction::StoreToStack {
        dst: 0,
        src: Register::GPR0,
    });
    package.emit(Instruction::Jump {
        address: JumpAddress::new(4),
    });
    // Load b for read-out, then unwind the locals.
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR0,
        src: 8,
    });
    package.emit(Instruction::PopRegister {});
    package.emit(Instruction::PopRegister {});
    package.emit(Instruction::PopRegister {});
    package.emit(Instruction::PopRegister {});

    DemoProgram {
        package,
        entry_point: 0,
        result_register: Register::GPR0,
        description: "Iterative Fibonacci F(16)",
    }
}

/// Recursive Fibonacci: a callable at instruction 0 computing `fib(k)` into
/// its caller-reserved result slot, and an entry sequence computing `fib(11)`
/// into GPR0.
///
/// The caller reserves an 8-byte result slot, pushes the 8-byte argument and
/// issues `Call` with `parameters:8`; the callee stores through offset 8 and
/// `Return` pops the argument region.
fn build_fibonacci_recursive() -> DemoProgram {
    let mut package = Package::new();
    // fib: if (!(k > 1)) { result = k; return; }
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR0,
        src: 0,
    });
    package.emit(Instruction::LoadImmediate8 {
        dst: Register::GPR1,
        value: 1,
    });
    package.emit(Instruction::CompareGreater {
        dst: Register::GPR1,
        lhs: Register::GPR0,
        rhs: Register::GPR1,
    });
    package.emit(Instruction::JumpIf {
        condition: Register::GPR1,
        address: JumpAddress::new(6),
    });
    package.emit(Instruction::StoreToStack {
        dst: 8,
        src: Register::GPR0,
    });
    package.emit(Instruction::Return {});
    // t1 = fib(k - 1), with GPR0 saved across the call.
    package.emit(Instruction::Decrement {
        dst: Register::GPR0,
    });
    package.emit(Instruction::PushRegister {
        src: Register::GPR0,
    });
    package.emit(Instruction::Push { byte_count: 8 });
    package.emit(Instruction::PushRegister {
        src: Register::GPR0,
    });
    package.emit(Instruction::Call {
        callee: JumpAddress::new(0),
        parameters: 8,
    });
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR2,
        src: 0,
    });
    package.emit(Instruction::Pop { byte_count: 8 });
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR0,
        src: 0,
    });
    package.emit(Instruction::PopRegister {});
    // t2 = fib(k - 2), with GPR0 and t1 saved across the call.
    package.emit(Instruction::Decrement {
        dst: Register::GPR0,
    });
    package.emit(Instruction::PushRegister {
        src: Register::GPR0,
    });
    package.emit(Instruction::PushRegister {
        src: Register::GPR2,
    });
    package.emit(Instruction::Push { byte_count: 8 });
    package.emit(Instruction::PushRegister {
        src: Register::GPR0,
    });
    package.emit(Instruction::Call {
        callee: JumpAddress::new(0),
        parameters: 8,
    });
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR3,
        src: 0,
    });
    package.emit(Instruction::Pop { byte_count: 8 });
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR2,
        src: 0,
    });
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR0,
        src: 8,
    });
    package.emit(Instruction::PopRegister {});
    package.emit(Instruction::PopRegister {});
    // result = t1 + t2; return;
    package.emit(Instruction::Add {
        dst: Register::GPR0,
        lhs: Register::GPR2,
        rhs: Register::GPR3,
    });
    package.emit(Instruction::StoreToStack {
        dst: 8,
        src: Register::GPR0,
    });
    package.emit(Instruction::Return {});
    // Entry: result = fib(11);
    let entry_point = package.emit(Instruction::Push { byte_count: 8 });
    package.emit(Instruction::PushImmediate64 { value: 11 });
    package.emit(Instruction::Call {
        callee: JumpAddress::new(0),
        parameters: 8,
    });
    package.emit(Instruction::LoadFromStack {
        dst: Register::GPR0,
        src: 0,
    });
    package.emit(Instruction::Pop { byte_count: 8 });

    DemoProgram {
        package,
        entry_point,
        result_register: Register::GPR0,
        description: "Recursive Fibonacci F(11)",
    }
}
