use crate::error::{Error, Result};
use crate::functions;
use crate::rpn::{Operator, MOD_KEYWORD};
use log::{debug, warn};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

pub type Function = Arc<dyn Fn(&[f64]) -> f64 + Send + Sync>;

/// How many arguments a function takes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Arity {
    Fixed(usize),
    /// Any positive number of arguments, counted at the call site.
    Variadic,
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Arity::Fixed(n) => write!(f, "{}", n),
            Arity::Variadic => write!(f, "variadic"),
        }
    }
}

/// What `add` does when the name is already taken.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DuplicatePolicy {
    /// Fail with [`Error::DuplicateFunction`].
    #[default]
    Reject,
    /// Log a warning and replace the previous definition.
    Overwrite,
}

#[derive(Clone)]
pub struct FunctionDefinition {
    name: String,
    arity: Arity,
    function: Function,
}

impl FunctionDefinition {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arity(&self) -> Arity {
        self.arity
    }

    pub fn call(&self, args: &[f64]) -> f64 {
        (self.function)(args)
    }
}

impl fmt::Debug for FunctionDefinition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("FunctionDefinition")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

/// Named functions available to expressions.
///
/// The registry is only mutated through `&mut self`, so sharing it between
/// threads that evaluate concurrently is safe as long as edits happen before
/// the readers start (or behind a lock the caller owns).
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    functions: HashMap<String, FunctionDefinition>,
    policy: DuplicatePolicy,
}

impl FunctionRegistry {
    /// An empty registry that rejects duplicate names.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: DuplicatePolicy) -> Self {
        Self {
            functions: HashMap::new(),
            policy,
        }
    }

    /// A registry holding `sqrt(x)` and `log(base, x)`.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        functions::register_builtins(&mut registry);
        registry
    }

    pub fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: DuplicatePolicy) {
        self.policy = policy;
    }

    /// Registers a function under `name` (trimmed and lowercased).
    pub fn add<F>(&mut self, name: &str, arity: Arity, function: F) -> Result<()>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        let name = normalize_name(name)?;
        if self.functions.contains_key(&name) {
            match self.policy {
                DuplicatePolicy::Reject => return Err(Error::DuplicateFunction(name)),
                DuplicatePolicy::Overwrite => {
                    warn!("Function '{}' has already been added, overwriting it", name)
                }
            }
        }
        self.define(&name, arity, Arc::new(function));
        Ok(())
    }

    /// Unregisters `name`; fails with [`Error::UnknownFunction`] if absent.
    pub fn remove(&mut self, name: &str) -> Result<()> {
        let key = lookup_key(name);
        match self.functions.remove(&key) {
            Some(_) => {
                debug!("Removed function '{}'", key);
                Ok(())
            }
            None => Err(Error::UnknownFunction(key)),
        }
    }

    /// Registers `name`, replacing any existing definition without notice.
    pub fn replace<F>(&mut self, name: &str, arity: Arity, function: F) -> Result<()>
    where
        F: Fn(&[f64]) -> f64 + Send + Sync + 'static,
    {
        let name = normalize_name(name)?;
        self.define(&name, arity, Arc::new(function));
        Ok(())
    }

    pub(crate) fn define(&mut self, name: &str, arity: Arity, function: Function) {
        debug!("Registering function '{}' (arity {})", name, arity);
        self.functions.insert(
            name.to_string(),
            FunctionDefinition {
                name: name.to_string(),
                arity,
                function,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&FunctionDefinition> {
        self.functions.get(&lookup_key(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn arity(&self, name: &str) -> Option<Arity> {
        self.get(name).map(FunctionDefinition::arity)
    }

    /// Registered names, longest first so that scanning prefers `log_two`
    /// over `log`.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.functions.keys().cloned().collect();
        names.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

fn lookup_key(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Trims and lowercases `name`, then checks it can be used as a function.
pub fn normalize_name(name: &str) -> Result<String> {
    let normalized = lookup_key(name);

    let is_operator = normalized == MOD_KEYWORD
        || Operator::try_from(normalized.as_str()).is_ok();
    if is_operator {
        return Err(Error::OperatorCollision(normalized));
    }

    let valid = !normalized.is_empty()
        && normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c == '_');
    if !valid {
        return Err(Error::InvalidFunctionName(name.trim().to_string()));
    }

    Ok(normalized)
}
