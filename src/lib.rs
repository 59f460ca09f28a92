pub mod engine;
pub mod error;
pub mod format;
pub mod functions;
pub mod registry;
pub mod rpn;

pub use engine::{Engine, EngineConfig};
pub use error::{Error, Result};
pub use exprcalc_macros::expr_fn;
pub use format::format_number;
pub use registry::{Arity, DuplicatePolicy, Function, FunctionDefinition, FunctionRegistry};
pub use rpn::{Operator, Postfix, PostfixItem, Token};

/// Evaluates `expression` with a fresh default engine (`sqrt` and `log`
/// only). Build an [`Engine`] to register more functions.
pub fn evaluate_expression(expression: &str) -> Result<f64> {
    Engine::new().evaluate(expression)
}
