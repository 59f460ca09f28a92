use crate::error::{Error, Result};
use crate::registry::{Arity, FunctionRegistry};
use crate::rpn::{Postfix, PostfixItem};
use log::{debug, trace};

#[derive(Debug, Copy, Clone, PartialEq)]
enum Slot {
    Value(f64),
    ArgCount(usize),
}

/// Runs a postfix program on a fresh operand stack and returns the single
/// value it leaves behind.
pub fn evaluate(postfix: &Postfix, registry: &FunctionRegistry) -> Result<f64> {
    let mut stack: Vec<Slot> = Vec::with_capacity(postfix.len());

    for item in postfix.items() {
        match item {
            PostfixItem::Number(n) => stack.push(Slot::Value(*n)),
            PostfixItem::ArgCount(n) => stack.push(Slot::ArgCount(*n)),
            PostfixItem::Operator(op) => {
                let operands = pop_values(&mut stack, &op.to_string(), 2)?;
                let (lhs, rhs) = (operands[0], operands[1]);
                let result = op.apply(lhs, rhs)?;
                trace!("{} {} {} = {}", lhs, op, rhs, result);
                stack.push(Slot::Value(result));
            }
            PostfixItem::Function(name) => {
                let definition = registry
                    .get(name)
                    .ok_or_else(|| Error::UnknownFunction(name.clone()))?;

                let count = match definition.arity() {
                    Arity::Fixed(n) => n,
                    Arity::Variadic => match stack.pop() {
                        Some(Slot::ArgCount(0)) => {
                            return Err(Error::arity(name.as_str(), "at least 1", 0))
                        }
                        Some(Slot::ArgCount(n)) => n,
                        Some(slot) => {
                            stack.push(slot);
                            return Err(Error::arity(
                                name.as_str(),
                                "an argument count",
                                available(&stack),
                            ));
                        }
                        None => return Err(Error::arity(name.as_str(), "at least 1", 0)),
                    },
                };

                let args = pop_values(&mut stack, name, count)?;
                let result = definition.call(&args);
                trace!("{}({:?}) = {}", name, args, result);
                stack.push(Slot::Value(result));
            }
        }
    }

    match stack.as_slice() {
        [Slot::Value(result)] => {
            debug!("Result: {}", result);
            Ok(*result)
        }
        _ => Err(Error::InvalidExpression(format!(
            "expected a single result, {} item(s) left on the stack",
            stack.len()
        ))),
    }
}

/// Number of plain values sitting above the topmost argument-count marker.
fn available(stack: &[Slot]) -> usize {
    stack
        .iter()
        .rev()
        .take_while(|slot| matches!(slot, Slot::Value(_)))
        .count()
}

/// Pops `count` values, returned in the order they were pushed.
fn pop_values(stack: &mut Vec<Slot>, name: &str, count: usize) -> Result<Vec<f64>> {
    let found = available(stack);
    if found < count {
        return Err(Error::arity(name, count, found));
    }

    let values = stack
        .split_off(stack.len() - count)
        .into_iter()
        .filter_map(|slot| match slot {
            Slot::Value(v) => Some(v),
            Slot::ArgCount(_) => None,
        })
        .collect();
    Ok(values)
}
