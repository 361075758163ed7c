//! Bytecode executor
//!
//! Stack-based VM that executes compiled bytecode.
//!
//! The VM walks the instruction stream with an instruction pointer, decoding
//! each instruction through the registry and dispatching on its typed
//! [`Opcode`]. Every failure is fatal and leaves the operand stack exactly as
//! it was before the failing instruction.

use tally_foundation::Value;
use tracing::{debug, instrument, trace, warn};

use crate::bytecode::{Bytecode, DecodedInstruction, Instructions, Opcode};
use crate::config::{VmConfig, STACK_SIZE};
use crate::error::{ConfigError, ExecutionError};

/// Stack-based virtual machine.
#[derive(Debug, Clone)]
pub struct Vm {
    constants: Vec<Value>,
    instructions: Instructions,
    stack: Vec<Value>,
    capacity: usize,
    ip: usize,
}

impl Vm {
    /// Create a VM for `bytecode` with the default configuration.
    pub fn new(bytecode: Bytecode) -> Self {
        Self::with_config(bytecode, VmConfig::default())
    }

    /// Create a VM for `bytecode` with an explicit configuration.
    ///
    /// The configuration is taken as given; use [`Vm::try_with_config`] for
    /// configuration loaded from outside the program. The stack grows on
    /// demand, so only the first [`STACK_SIZE`] slots are reserved up front.
    pub fn with_config(bytecode: Bytecode, config: VmConfig) -> Self {
        let Bytecode {
            instructions,
            constants,
        } = bytecode;
        Self {
            constants,
            instructions,
            stack: Vec::with_capacity(config.stack_capacity.min(STACK_SIZE)),
            capacity: config.stack_capacity,
            ip: 0,
        }
    }

    /// Create a VM after validating `config`.
    pub fn try_with_config(bytecode: Bytecode, config: VmConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::with_config(bytecode, config))
    }

    /// The most recently pushed value, if any.
    pub fn stack_top(&self) -> Option<&Value> {
        self.stack.last()
    }

    /// The live portion of the operand stack, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    /// Index of the next free stack slot.
    pub fn stack_pointer(&self) -> usize {
        self.stack.len()
    }

    /// Byte offset of the next instruction to execute.
    pub fn instruction_pointer(&self) -> usize {
        self.ip
    }

    /// Execute instructions until the end of the stream.
    ///
    /// # Errors
    ///
    /// Returns the first [`ExecutionError`] raised. The instruction pointer
    /// then still addresses the failing instruction.
    #[instrument(skip_all, name = "run", fields(bytes = self.instructions.len(), constants = self.constants.len()))]
    pub fn run(&mut self) -> Result<(), ExecutionError> {
        while self.ip < self.instructions.len() {
            let instruction = self
                .instructions
                .decode_at(self.ip)
                .map_err(|err| ExecutionError::from_decode(err, self.ip))
                .inspect_err(|err| warn!(ip = self.ip, %err, "decode failed"))?;

            trace!(ip = self.ip, sp = self.stack.len(), %instruction, "dispatch");

            if let Err(err) = self.execute(&instruction) {
                warn!(ip = self.ip, %err, "execution failed");
                return Err(err);
            }
            self.ip += instruction.len;
        }

        debug!(sp = self.stack.len(), top = ?self.stack_top(), "run complete");
        Ok(())
    }

    fn execute(&mut self, instruction: &DecodedInstruction) -> Result<(), ExecutionError> {
        match instruction.opcode {
            Opcode::Constant => {
                let index = instruction.operands[0];
                let value = self.constants.get(index).cloned().ok_or(
                    ExecutionError::ConstantIndexOutOfRange {
                        index,
                        len: self.constants.len(),
                    },
                )?;
                self.push(value)
            }

            Opcode::Add => {
                let right = self.pop()?;
                let left = match self.pop() {
                    Ok(left) => left,
                    Err(err) => {
                        self.stack.push(right);
                        return Err(err);
                    }
                };
                match add(&left, &right) {
                    Ok(sum) => self.push(sum),
                    Err(err) => {
                        self.stack.push(left);
                        self.stack.push(right);
                        Err(err)
                    }
                }
            }
        }
    }

    fn push(&mut self, value: Value) -> Result<(), ExecutionError> {
        if self.stack.len() >= self.capacity {
            return Err(ExecutionError::StackOverflow {
                capacity: self.capacity,
            });
        }
        self.stack.push(value);
        Ok(())
    }

    fn pop(&mut self) -> Result<Value, ExecutionError> {
        self.stack.pop().ok_or(ExecutionError::StackUnderflow)
    }
}

fn add(left: &Value, right: &Value) -> Result<Value, ExecutionError> {
    match (left, right) {
        (Value::Integer(l), Value::Integer(r)) => l
            .checked_add(*r)
            .map(Value::Integer)
            .ok_or(ExecutionError::IntegerOverflow {
                left: *l,
                right: *r,
            }),
        _ => Err(ExecutionError::TypeMismatch {
            operation: "add",
            left: left.type_name(),
            right: right.type_name(),
        }),
    }
}

/// Run `bytecode` on a fresh VM and return the value left on top of the stack.
pub fn execute(bytecode: Bytecode) -> Result<Option<Value>, ExecutionError> {
    let mut vm = Vm::new(bytecode);
    vm.run()?;
    Ok(vm.stack_top().cloned())
}
