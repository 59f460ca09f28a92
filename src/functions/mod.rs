use crate::registry::{Arity, FunctionRegistry};
use exprcalc_macros::expr_fn;
use std::sync::Arc;

/// Installs the functions every engine starts with.
pub fn register_builtins(registry: &mut FunctionRegistry) {
    registry.define("sqrt", SQRT_ARITY, Arc::new(sqrt));
    registry.define("log", LOG_ARITY, Arc::new(log));
}

/// Installs a handful of common helpers on top of the built-ins.
pub fn register_extras(registry: &mut FunctionRegistry) {
    registry.define("abs", ABS_ARITY, Arc::new(abs));
    registry.define("ln", LN_ARITY, Arc::new(ln));
    registry.define("exp", EXP_ARITY, Arc::new(exp));
    registry.define("min", MIN_ARITY, Arc::new(min));
    registry.define("max", MAX_ARITY, Arc::new(max));
    registry.define("sum", SUM_ARITY, Arc::new(sum));
    registry.define("avg", AVG_ARITY, Arc::new(avg));
}

#[expr_fn]
pub fn sqrt(x: f64) -> f64 {
    x.sqrt()
}

/// Logarithm of `value` in base `base`.
#[expr_fn]
pub fn log(base: f64, value: f64) -> f64 {
    value.log(base)
}

#[expr_fn]
pub fn abs(x: f64) -> f64 {
    x.abs()
}

#[expr_fn]
pub fn ln(x: f64) -> f64 {
    x.ln()
}

#[expr_fn]
pub fn exp(x: f64) -> f64 {
    x.exp()
}

#[expr_fn]
pub fn min(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::INFINITY, f64::min)
}

#[expr_fn]
pub fn max(args: &[f64]) -> f64 {
    args.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

#[expr_fn]
pub fn sum(args: &[f64]) -> f64 {
    args.iter().sum()
}

#[expr_fn]
pub fn avg(args: &[f64]) -> f64 {
    if args.is_empty() {
        return f64::NAN;
    }
    sum(args) / args.len() as f64
}
