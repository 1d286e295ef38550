use super::*;
use crate::{
    String, Vec,
    ast::{BinaryOp, Expr},
    compiler::CompileError,
    syntax::Span,
    test_utils,
    types::Type,
    values::Value,
    vm::Instruction,
};
use pretty_assertions::assert_eq;

fn diagnostics(err: Error) -> Vec<Diagnostic> {
    match err {
        Error::Compilation { diagnostics } => diagnostics,
        other => panic!("expected type errors, got {:?}", other),
    }
}

#[test]
fn test_compile_returns_result_type() {
    let mut compiler = Compiler::new(CompilerOptions::default());

    let (_, ty) = compiler
        .compile(&Expr::binary(
            BinaryOp::Le,
            Expr::literal(1.0),
            Expr::literal(2.0),
        ))
        .unwrap();
    assert_eq!(ty, Type::Bool);

    let (code, ty) = compiler.compile(&Expr::literal("text")).unwrap();
    assert_eq!(ty, Type::String);
    assert_eq!(code.constants(), [Value::from("text")]);
}

#[test]
fn test_definitions_persist_across_calls() {
    test_utils::init_test_logging();

    let mut compiler = Compiler::new(CompilerOptions::default());
    let (code, ty) = compiler
        .compile(&Expr::definition("x", None, Expr::literal(true)))
        .unwrap();
    assert!(code.is_empty());
    assert_eq!(ty, Type::Unit);

    let (code, ty) = compiler.compile(&Expr::ident("x")).unwrap();
    assert_eq!(ty, Type::Bool);
    assert_eq!(code.decode().unwrap(), [Instruction::PushTrue]);
    assert_eq!(compiler.globals().len(), 1);
}

#[test]
fn test_sessions_are_isolated() {
    let mut first = Compiler::new(CompilerOptions::default());
    first
        .compile(&Expr::definition("x", None, Expr::literal(1.0)))
        .unwrap();

    let mut second = Compiler::new(CompilerOptions::default());
    let err = second.compile(&Expr::ident("x")).unwrap_err();
    assert_eq!(diagnostics(err)[0].code.as_deref(), Some("E001"));
}

#[test]
fn test_define_global() {
    let mut compiler = Compiler::new(CompilerOptions::default());
    compiler.define_global("rate", 2.5);
    compiler.define_global("greeting", "hello");

    assert_eq!(
        compiler.global("rate"),
        Some(&Binding {
            ty: Type::Number,
            value: Value::Number(2.5)
        })
    );

    let expr = Expr::binary(BinaryOp::Mul, Expr::ident("rate"), Expr::literal(2.0));
    let (code, ty) = compiler.compile(&expr).unwrap();
    assert_eq!(ty, Type::Number);
    assert_eq!(
        code.constants(),
        [Value::Number(2.5), Value::Number(2.0)]
    );
}

#[test]
fn test_type_errors_become_diagnostics() {
    let mut compiler = Compiler::new(CompilerOptions::default());
    let expr = Expr::binary(
        BinaryOp::Add,
        Expr::literal(1.0).with_span(0..1),
        Expr::literal(true).with_span(4..8),
    )
    .with_span(0..8);

    let err = compiler.compile(&expr).unwrap_err();
    assert_eq!(err.to_string(), "Compilation failed with 1 error(s)");
    assert_eq!(
        diagnostics(err),
        [Diagnostic {
            message: String::from("Unmatched types around binary operator +"),
            span: Span::new(0, 8),
            help: Some(String::from(
                "Requires Number  +  Number\nHas      Number  +  Bool"
            )),
            code: Some(String::from("E003")),
        }]
    );
}

#[test]
fn test_compile_program() {
    let source = "let x = 2\nx * x";
    let mut compiler = Compiler::with_source(CompilerOptions::default(), source);
    let program = [
        Expr::definition("x", None, Expr::literal(2.0).with_span(8..9)).with_span(0..9),
        Expr::binary(
            BinaryOp::Mul,
            Expr::ident("x").with_span(10..11),
            Expr::ident("x").with_span(14..15),
        )
        .with_span(10..15),
    ];

    let (code, ty) = compiler.compile_program(&program).unwrap();
    assert_eq!(ty, Type::Number);
    assert_eq!(
        code.decode().unwrap(),
        [
            Instruction::PushConstant(0),
            Instruction::PushConstant(0),
            Instruction::Multiply,
        ]
    );
    assert_eq!(code.lines(), [2, 2, 2, 2, 2]);
}

#[test]
fn test_empty_program_is_unit() {
    let mut compiler = Compiler::new(CompilerOptions::default());
    let (code, ty) = compiler.compile_program(&[]).unwrap();
    assert!(code.is_empty());
    assert_eq!(ty, Type::Unit);
}

#[test]
fn test_program_collects_every_failing_statement() {
    let mut compiler = Compiler::new(CompilerOptions::default());
    let program = [
        Expr::ident("a"),
        Expr::literal(1.0),
        Expr::if_else(Expr::literal(1.0), Expr::literal(2.0), Expr::literal(3.0)),
    ];
    let codes: Vec<_> = diagnostics(compiler.compile_program(&program).unwrap_err())
        .into_iter()
        .filter_map(|d| d.code)
        .collect();
    assert_eq!(codes, ["E001", "E005"]);
}

#[test]
fn test_two_phase_usage() {
    let mut compiler = Compiler::new(CompilerOptions::default());
    let typed = compiler
        .type_check(&Expr::neg(Expr::literal(4.0)))
        .unwrap();
    assert_eq!(typed.ty, Type::Number);

    let (code, ty) = compiler.generate_code(&typed).unwrap();
    assert_eq!(ty, Type::Number);
    assert_eq!(code.max_stack_size, 1);
}

#[test]
fn test_codegen_errors_pass_through() {
    let mut compiler = Compiler::new(CompilerOptions::default());
    let expr = (1..300).fold(Expr::literal(0.0), |acc, i| {
        Expr::binary(BinaryOp::Add, acc, Expr::literal(i as f64))
    });

    let err = compiler.compile(&expr).unwrap_err();
    assert!(matches!(err, Error::Codegen(CompileError::TooManyConstants)));
    assert_eq!(err.to_string(), "Too many constants (limit: 256)");
}

#[test]
fn test_redefinition_depends_on_options() {
    let def = Expr::definition("x", None, Expr::literal(1.0));

    let mut strict = Compiler::new(CompilerOptions::default());
    strict.compile(&def).unwrap();
    let err = strict.compile(&def).unwrap_err();
    assert_eq!(diagnostics(err)[0].code.as_deref(), Some("E010"));

    let mut lenient = Compiler::new(CompilerOptions {
        shadowing: SameScopeShadowing::Allow,
    });
    lenient.compile(&def).unwrap();
    lenient.compile(&def).unwrap();
    assert_eq!(lenient.options().shadowing, SameScopeShadowing::Allow);
}
