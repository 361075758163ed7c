//! Bytecode compiler
//!
//! Lowers a syntax tree to a flat instruction stream plus a constant pool in
//! a single pass.
//!
//! # Compilation Strategy
//!
//! 1. Walk the tree depth-first, post-order, on an explicit work stack
//! 2. Literals go into the constant pool in order of appearance
//! 3. Binary operators compile left, then right, then emit the operator
//! 4. Any node the instruction set cannot express is an explicit error

use tally_ast::{Expression, InfixOperator, Program, Statement};
use tally_foundation::Value;
use tracing::{debug, instrument, trace};

use crate::bytecode::{make, Bytecode, Instructions, Opcode};
use crate::error::CompileError;

/// Number of constants addressable by the u16 `OpConstant` operand.
const MAX_CONSTANTS: usize = u16::MAX as usize + 1;

/// Converts a syntax tree into bytecode.
///
/// A compiler serves one compilation unit: it accumulates instructions and
/// constants across one or more `compile` calls, then hands over its
/// [`Bytecode`].
#[derive(Debug, Default)]
pub struct Compiler {
    instructions: Instructions,
    constants: Vec<Value>,
}

impl Compiler {
    /// Create a new, empty compiler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile a program.
    ///
    /// # Errors
    ///
    /// Returns [`CompileError::UnsupportedNode`] for any node outside the
    /// supported subset. Output accumulated before the error must not be
    /// trusted.
    #[instrument(skip_all, name = "compile", fields(statements = program.statements.len()))]
    pub fn compile(&mut self, program: &Program) -> Result<(), CompileError> {
        for statement in &program.statements {
            self.compile_statement(statement)?;
        }
        self.log_summary();
        Ok(())
    }

    /// Compile a bare expression as the root of the tree.
    ///
    /// # Errors
    ///
    /// Same as [`Compiler::compile`].
    #[instrument(skip_all, name = "compile_expression", fields(root = expr.kind_name()))]
    pub fn compile_expression(&mut self, expr: &Expression) -> Result<(), CompileError> {
        self.lower(expr)?;
        self.log_summary();
        Ok(())
    }

    /// Snapshot of the accumulated output.
    ///
    /// Before any compilation this is an empty, well-formed [`Bytecode`].
    pub fn bytecode(&self) -> Bytecode {
        Bytecode::new(self.instructions.clone(), self.constants.clone())
    }

    /// Consume the compiler, returning its output.
    pub fn into_bytecode(self) -> Bytecode {
        Bytecode::new(self.instructions, self.constants)
    }

    fn compile_statement(&mut self, statement: &Statement) -> Result<(), CompileError> {
        match statement {
            Statement::Expression(expr) => self.lower(expr),
        }
    }

    /// Post-order walk over an explicit work stack.
    ///
    /// Tree depth is bounded only by the constant pool, not by the native stack.
    fn lower(&mut self, root: &Expression) -> Result<(), CompileError> {
        let mut pending = vec![Task::Lower(root)];

        while let Some(task) = pending.pop() {
            let expr = match task {
                Task::Lower(expr) => expr,
                Task::Emit(opcode) => {
                    self.emit(opcode, &[])?;
                    continue;
                }
            };

            match expr {
                Expression::IntegerLiteral(value) => {
                    let index = self.add_constant(Value::Integer(*value))?;
                    self.emit(Opcode::Constant, &[index])?;
                }

                Expression::Infix {
                    left,
                    operator,
                    right,
                } => {
                    let opcode = infix_opcode(*operator).ok_or_else(|| unsupported(expr))?;
                    // Popped in reverse: left, then right, then the operator.
                    // Operand order is observable since the VM pops right first.
                    pending.push(Task::Emit(opcode));
                    pending.push(Task::Lower(right));
                    pending.push(Task::Lower(left));
                }

                Expression::Boolean(_) | Expression::Identifier(_) | Expression::Prefix { .. } => {
                    return Err(unsupported(expr));
                }
            }
        }

        Ok(())
    }

    fn log_summary(&self) {
        debug!(
            bytes = self.instructions.len(),
            constants = self.constants.len(),
            "compilation finished"
        );
    }

    /// Add a value to the constant pool, returning its index.
    fn add_constant(&mut self, value: Value) -> Result<usize, CompileError> {
        let index = self.constants.len();
        if index >= MAX_CONSTANTS {
            return Err(CompileError::ConstantPoolOverflow { len: index });
        }
        self.constants.push(value);
        Ok(index)
    }

    /// Encode and append one instruction, returning its offset.
    fn emit(&mut self, opcode: Opcode, operands: &[usize]) -> Result<usize, CompileError> {
        let instruction = make(opcode, operands)?;
        let offset = self.instructions.push(&instruction);
        trace!(offset, %opcode, ?operands, "emit");
        Ok(offset)
    }
}

enum Task<'a> {
    Lower(&'a Expression),
    Emit(Opcode),
}

fn infix_opcode(operator: InfixOperator) -> Option<Opcode> {
    match operator {
        InfixOperator::Plus => Some(Opcode::Add),
        InfixOperator::Minus
        | InfixOperator::Asterisk
        | InfixOperator::Slash
        | InfixOperator::Lt
        | InfixOperator::Gt
        | InfixOperator::Eq
        | InfixOperator::NotEq => None,
    }
}

fn unsupported(expr: &Expression) -> CompileError {
    CompileError::UnsupportedNode {
        node: format!("{} {}", expr.kind_name(), expr),
    }
}

/// Compile a program to bytecode with a fresh compiler.
///
/// # Errors
///
/// Same as [`Compiler::compile`].
pub fn compile_program(program: &Program) -> Result<Bytecode, CompileError> {
    let mut compiler = Compiler::new();
    compiler.compile(program)?;
    Ok(compiler.into_bytecode())
}
