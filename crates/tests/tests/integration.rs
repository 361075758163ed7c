//! Integration tests for end-to-end tally execution.
//!
//! These tests verify the full pipeline:
//! Build tree → Compile → Execute → Verify

use tally_ast::{Expression, InfixOperator, Program, Statement};
use tally_foundation::Value;
use tally_tests::{init_test_logging, TestHarness};
use tally_vm::{
    compile_program, execute, make, Bytecode, CompileError, ExecutionError, Opcode, Vm, VmConfig,
};

/// Verifies: Compile → Execute → single literal on top of stack
#[test]
fn test_literals_execute() {
    for value in [1, 2, 0, -17, i64::MAX] {
        let mut harness = TestHarness::from_expression(Expression::integer(value));
        assert_eq!(harness.evaluate_integer(), Some(value));
    }
}

#[test]
fn test_one_plus_two() {
    let mut harness = TestHarness::from_expression(Expression::add(
        Expression::integer(1),
        Expression::integer(2),
    ));

    assert_eq!(
        harness.bytecode().constants,
        vec![Value::Integer(1), Value::Integer(2)]
    );
    assert_eq!(harness.evaluate(), Some(Value::Integer(3)));
}

/// Any left-associated chain of additions evaluates to the sum of its literals.
#[test]
fn test_sum_chains() {
    let sequences: Vec<Vec<i64>> = vec![
        vec![1],
        vec![1, 2],
        vec![1, 2, 3, 4, 5],
        vec![-3, 3],
        vec![100, -250, 7, 0, 43],
        (1..=100).collect(),
    ];

    for literals in sequences {
        let expr = Expression::sum_of(&literals).unwrap();
        let mut harness = TestHarness::from_expression(expr.clone());

        assert_eq!(
            harness.evaluate_integer(),
            Some(literals.iter().sum()),
            "wrong sum for {expr}"
        );
        assert_eq!(harness.bytecode().constants.len(), literals.len());
    }
}

#[test]
fn test_right_nested_sum() {
    // 1 + (2 + (3 + 4))
    let expr = Expression::add(
        Expression::integer(1),
        Expression::add(
            Expression::integer(2),
            Expression::add(Expression::integer(3), Expression::integer(4)),
        ),
    );
    let mut harness = TestHarness::from_expression(expr);
    assert_eq!(harness.evaluate_integer(), Some(10));
    assert_eq!(harness.vm().stack_pointer(), 1);
}

#[test]
fn test_disassembly_of_compiled_program() {
    let harness = TestHarness::from_expression(Expression::sum_of(&[1, 2, 3]).unwrap());
    assert_eq!(
        harness.bytecode().disassemble(),
        "0000 OpConstant 0\n\
         0003 OpConstant 1\n\
         0006 OpAdd\n\
         0007 OpConstant 2\n\
         0010 OpAdd\n"
    );
}

#[test]
fn test_unsupported_operator_fails_compilation() {
    let program = Program::from_expression(Expression::infix(
        Expression::integer(2),
        InfixOperator::Lt,
        Expression::integer(3),
    ));
    let err = compile_program(&program).unwrap_err();
    assert_eq!(
        err.to_string(),
        "unsupported node: infix expression (2 < 3)"
    );
    assert!(matches!(err, CompileError::UnsupportedNode { .. }));
}

#[test]
fn test_overflow_is_reported() {
    init_test_logging();
    let bytecode =
        compile_program(&Program::from_expression(Expression::sum_of(&[i64::MAX, 1]).unwrap()))
            .unwrap();
    assert_eq!(
        execute(bytecode),
        Err(ExecutionError::IntegerOverflow {
            left: i64::MAX,
            right: 1
        })
    );
}

#[test]
fn test_small_stack_limits_depth() {
    // 1 + (2 + 3) needs three live slots
    let program = Program::from_expression(Expression::add(
        Expression::integer(1),
        Expression::add(Expression::integer(2), Expression::integer(3)),
    ));

    let mut harness = TestHarness::with_config(&program, VmConfig::with_stack_capacity(2));
    assert_eq!(
        harness.run(),
        Err(ExecutionError::StackOverflow { capacity: 2 })
    );
    assert_eq!(harness.vm().stack_pointer(), 2);

    let mut harness = TestHarness::with_config(&program, VmConfig::with_stack_capacity(3));
    assert_eq!(harness.evaluate_integer(), Some(6));
}

#[test]
fn test_hand_assembled_bytecode() {
    init_test_logging();
    let instructions = vec![
        make(Opcode::Constant, &[1]).unwrap(),
        make(Opcode::Constant, &[0]).unwrap(),
        make(Opcode::Add, &[]).unwrap(),
    ]
    .into_iter()
    .collect();
    let bytecode = Bytecode::new(instructions, vec![Value::Integer(40), Value::Integer(2)]);

    let mut vm = Vm::new(bytecode);
    vm.run().unwrap();
    assert_eq!(vm.stack_top(), Some(&Value::Integer(42)));
}

#[test]
fn test_bytecode_serde_round_trip() {
    let program = Program::new(vec![
        Statement::Expression(Expression::integer(8)),
        Statement::Expression(Expression::sum_of(&[5, 6]).unwrap()),
    ]);
    let bytecode = compile_program(&program).unwrap();

    let json = serde_json::to_string(&bytecode).unwrap();
    let restored: Bytecode = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, bytecode);
    assert_eq!(execute(restored), Ok(Some(Value::Integer(11))));
}

#[test]
fn test_independent_runs_on_threads() {
    let handles: Vec<_> = (1..=8i64)
        .map(|n| {
            std::thread::spawn(move || {
                let literals: Vec<i64> = (1..=n).collect();
                let mut harness =
                    TestHarness::from_expression(Expression::sum_of(&literals).unwrap());
                harness.evaluate_integer()
            })
        })
        .collect();

    for (n, handle) in (1..=8i64).zip(handles) {
        assert_eq!(handle.join().unwrap(), Some(n * (n + 1) / 2));
    }
}
