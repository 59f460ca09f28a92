use crate::error::Result;
use crate::functions;
use crate::registry::{Arity, DuplicatePolicy, FunctionRegistry};
use crate::rpn::{self, Postfix, Token};
use log::debug;
use rayon::prelude::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Behaviour of `add_function` for a name that is already registered.
    pub duplicate_policy: DuplicatePolicy,
    /// Start with `sqrt` and `log`.
    pub install_builtins: bool,
    /// Also start with `abs`, `ln`, `exp`, `min`, `max`, `sum` and `avg`.
    pub install_extras: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            install_builtins: true,
            install_extras: false,
        }
    }
}

/// Evaluates arithmetic expressions against its own function registry.
///
/// Evaluation only borrows the engine, so one engine can serve many
/// threads at once. Registry edits need `&mut self`; callers sharing an
/// engine across threads must finish (or lock around) those edits.
#[derive(Debug, Clone)]
pub struct Engine {
    registry: FunctionRegistry,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Engine {
    /// An engine with the built-in functions and strict duplicate checking.
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        let mut registry = FunctionRegistry::with_policy(config.duplicate_policy);
        if config.install_builtins {
            functions::register_builtins(&mut registry);
        }
        if config.install_extras {
            functions::register_extras(&mut registry);
        }
        Self { registry }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Registers a function.
    ///
    /// # Example
    ///
    /// ```
    /// use exprcalc::{Arity, Engine};
    ///
    /// let mut engine = Engine::new();
    /// engine
    ///     .add_function("hypot", Arity::Fixed(2), |args| args[0].hypot(args[1]))
    ///     .unwrap();
    /// assert_eq!(engine.evaluate("hypot(3, 4)").unwrap(), 5.0);
    /// ```
    pub fn add_function<F>(&mut self, name: &str, arity: Arity, function: F) -> Result<()>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.registry.add(name, arity, function)
    }

    pub fn remove_function(&mut self, name: &str) -> Result<()> {
        self.registry.remove(name)
    }

    pub fn replace_function<F>(&mut self, name: &str, arity: Arity, function: F) -> Result<()>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        self.registry.replace(name, arity, function)
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    pub fn tokenize(&self, expression: &str) -> Result<Vec<Token>> {
        let expression = strip_whitespace(expression);
        rpn::tokenize(&expression, &self.registry.names())
    }

    /// Converts `expression` to postfix without evaluating it.
    pub fn to_postfix(&self, expression: &str) -> Result<Postfix> {
        let tokens = self.tokenize(expression)?;
        rpn::to_postfix(&tokens, &self.registry)
    }

    /// Evaluates `expression`. Whitespace is ignored.
    pub fn evaluate(&self, expression: &str) -> Result<f64> {
        debug!("Evaluating expression: {}", expression);
        let postfix = self.to_postfix(expression)?;
        rpn::evaluate(&postfix, &self.registry)
    }

    /// Evaluates independent expressions in parallel, keeping input order.
    pub fn evaluate_batch(&self, expressions: &[&str]) -> Vec<Result<f64>> {
        expressions
            .par_iter()
            .map(|expression| self.evaluate(expression))
            .collect()
    }
}

fn strip_whitespace(expression: &str) -> String {
    expression.chars().filter(|c| !c.is_whitespace()).collect()
}
