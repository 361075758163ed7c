//! Integration test harness for tally.
//!
//! This crate provides utilities for end-to-end testing of the full
//! pipeline: Build tree → Compile → Execute → Verify.

use tally_ast::{Expression, Program};
use tally_foundation::Value;
use tally_vm::{Bytecode, Compiler, ExecutionError, Vm, VmConfig};
use tracing_subscriber::EnvFilter;

/// Install a tracing subscriber that writes through the test harness.
///
/// Honors `RUST_LOG`; defaults to `warn`. Safe to call from every test.
pub fn init_test_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Test harness for running a syntax tree through compiler and VM.
pub struct TestHarness {
    bytecode: Bytecode,
    vm: Vm,
}

impl TestHarness {
    /// Create a new test harness from a program.
    ///
    /// # Panics
    ///
    /// Panics if compilation fails.
    pub fn from_program(program: &Program) -> Self {
        Self::with_config(program, VmConfig::default())
    }

    /// Create a harness for a single-expression program.
    ///
    /// # Panics
    ///
    /// Panics if compilation fails.
    pub fn from_expression(expr: Expression) -> Self {
        Self::from_program(&Program::from_expression(expr))
    }

    /// Create a harness whose VM uses `config`.
    ///
    /// # Panics
    ///
    /// Panics if compilation fails or `config` is invalid.
    pub fn with_config(program: &Program, config: VmConfig) -> Self {
        init_test_logging();

        let mut compiler = Compiler::new();
        if let Err(err) = compiler.compile(program) {
            panic!("Compilation of {program} failed: {err}");
        }
        let bytecode = compiler.into_bytecode();

        let vm = match Vm::try_with_config(bytecode.clone(), config) {
            Ok(vm) => vm,
            Err(err) => panic!("Invalid VM config: {err}"),
        };

        Self { bytecode, vm }
    }

    /// Execute the whole instruction stream.
    pub fn run(&mut self) -> Result<(), ExecutionError> {
        self.vm.run()
    }

    /// Execute and return the top of the stack.
    ///
    /// # Panics
    ///
    /// Panics if execution fails.
    pub fn evaluate(&mut self) -> Option<Value> {
        if let Err(err) = self.run() {
            panic!("Execution failed: {err}\n{}", self.bytecode.disassemble());
        }
        self.stack_top().cloned()
    }

    /// Execute and return the top of the stack as an integer.
    pub fn evaluate_integer(&mut self) -> Option<i64> {
        self.evaluate().and_then(|value| value.as_integer())
    }

    /// The most recently pushed value.
    pub fn stack_top(&self) -> Option<&Value> {
        self.vm.stack_top()
    }

    /// Compiled output under test.
    pub fn bytecode(&self) -> &Bytecode {
        &self.bytecode
    }

    /// The VM under test.
    pub fn vm(&self) -> &Vm {
        &self.vm
    }
}
