//! Shared helpers for the end-to-end tests.
//!
//! Trees are built by hand; every statement of a case is compiled in one
//! fresh session.

#![allow(dead_code)]

pub use eml::{BinaryOp, Expr, Type};
use eml::{Bytecode, Compiler, CompilerOptions, Error};

pub fn compile(program: &[Expr]) -> Result<(Bytecode, Type), Error> {
    Compiler::new(CompilerOptions::default()).compile_program(program)
}

pub fn error_codes(error: Error) -> Vec<String> {
    match error {
        Error::Compilation { diagnostics } => {
            diagnostics.into_iter().filter_map(|d| d.code).collect()
        }
        Error::Codegen(err) => vec![err.to_string()],
    }
}

pub fn num(n: f64) -> Expr {
    Expr::literal(n)
}

pub fn boolean(b: bool) -> Expr {
    Expr::literal(b)
}

pub fn string(s: &str) -> Expr {
    Expr::literal(s)
}

pub fn unit() -> Expr {
    Expr::literal(())
}

pub fn ident(name: &str) -> Expr {
    Expr::ident(name)
}

pub fn bin(op: BinaryOp, left: Expr, right: Expr) -> Expr {
    Expr::binary(op, left, right)
}

pub fn let_(name: &str, value: Expr) -> Expr {
    Expr::definition(name, None, value)
}

pub fn let_typed(name: &str, ty: Type, value: Expr) -> Expr {
    Expr::definition(name, Some(ty), value)
}

/// Declares a test compiling `program` and checking either the listing or
/// the diagnostic codes it produces.
macro_rules! test_case {
    (
        name: $name:ident,
        program: [$($stmt:expr),* $(,)?],
        ty: $ty:expr,
        disassembly: { $expected:expr } $(,)?
    ) => {
        #[test]
        fn $name() {
            let program = vec![$($stmt),*];
            let (code, ty) = match cases::compile(&program) {
                Ok(result) => result,
                Err(err) => panic!("compilation failed: {:?}", err),
            };
            pretty_assertions::assert_eq!(ty, $ty);
            pretty_assertions::assert_eq!(code.disassemble(), $expected);
        }
    };
    (
        name: $name:ident,
        program: [$($stmt:expr),* $(,)?],
        errors: [$($code:expr),* $(,)?] $(,)?
    ) => {
        #[test]
        fn $name() {
            let program = vec![$($stmt),*];
            let err = match cases::compile(&program) {
                Ok((code, _)) => panic!("expected failure, got:\n{}", code),
                Err(err) => err,
            };
            let expected: Vec<String> = vec![$(String::from($code)),*];
            pretty_assertions::assert_eq!(cases::error_codes(err), expected);
        }
    };
}
