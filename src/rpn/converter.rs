use crate::error::{Error, Result};
use crate::registry::{Arity, FunctionRegistry};
use crate::rpn::{Associativity, Operator, Postfix, PostfixItem, Token};
use log::{debug, trace};

#[derive(Debug, PartialEq)]
enum StackItem {
    Operator(Operator),
    LeftParen,
    Function(String),
}

impl StackItem {
    fn into_postfix(self) -> Option<PostfixItem> {
        match self {
            StackItem::Operator(op) => Some(PostfixItem::Operator(op)),
            StackItem::Function(name) => Some(PostfixItem::Function(name)),
            StackItem::LeftParen => None,
        }
    }
}

/// Argument bookkeeping for the parenthesis that opens a function call.
#[derive(Debug)]
struct CallScope {
    name: String,
    separators: usize,
}

/// Reorders `tokens` into postfix with the shunting-yard algorithm.
///
/// Arities come from `registry`: variadic calls get an
/// [`PostfixItem::ArgCount`] marker ahead of the function name, fixed-arity
/// calls are checked against the number of arguments written.
pub fn to_postfix(tokens: &[Token], registry: &FunctionRegistry) -> Result<Postfix> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut stack: Vec<StackItem> = Vec::new();
    // one entry per open '(' on the stack, Some when that paren opens a call
    let mut scopes: Vec<Option<CallScope>> = Vec::new();
    let mut prev: Option<&Token> = None;

    for token in tokens {
        if let Some(Token::FunctionName(name)) = prev {
            if *token != Token::LeftParen {
                return Err(Error::MisplacedParenthesis(format!(
                    "expected '(' after function '{}'",
                    name
                )));
            }
        }

        match token {
            Token::Number(n) => out.push(PostfixItem::Number(*n)),
            Token::FunctionName(name) => stack.push(StackItem::Function(name.clone())),
            Token::LeftParen => {
                let scope = match stack.last() {
                    Some(StackItem::Function(name)) => Some(CallScope {
                        name: name.clone(),
                        separators: 0,
                    }),
                    _ => None,
                };
                scopes.push(scope);
                stack.push(StackItem::LeftParen);
            }
            Token::ArgSeparator => {
                drain_to_left_paren(&mut stack, &mut out, ',')?;
                match scopes.last_mut() {
                    Some(Some(scope)) => scope.separators += 1,
                    _ => {
                        return Err(Error::MisplacedParenthesis(
                            "argument separator outside of a function call".to_string(),
                        ))
                    }
                }
            }
            Token::Operator(op) => {
                while let Some(StackItem::Operator(top)) = stack.last() {
                    let pops = op.precedence() < top.precedence()
                        || (op.precedence() == top.precedence()
                            && op.associativity() == Associativity::Left);
                    if !pops {
                        break;
                    }
                    out.push(PostfixItem::Operator(*top));
                    stack.pop();
                }
                stack.push(StackItem::Operator(*op));
            }
            Token::RightParen => {
                drain_to_left_paren(&mut stack, &mut out, ')')?;
                stack.pop(); // the matching '('

                if let Some(scope) = scopes.pop().flatten() {
                    let args = if prev == Some(&Token::LeftParen) {
                        0
                    } else {
                        scope.separators + 1
                    };
                    close_call(&scope.name, args, registry, &mut out)?;

                    if let Some(StackItem::Function(name)) = stack.pop() {
                        out.push(PostfixItem::Function(name));
                    }
                }
            }
        }

        trace!("{:?} -> stack {:?}", token, stack);
        prev = Some(token);
    }

    if let Some(Token::FunctionName(name)) = prev {
        return Err(Error::MisplacedParenthesis(format!(
            "expected '(' after function '{}'",
            name
        )));
    }

    while let Some(item) = stack.pop() {
        match item.into_postfix() {
            Some(item) => out.push(item),
            None => {
                return Err(Error::MisplacedParenthesis(
                    "'(' is never closed".to_string(),
                ))
            }
        }
    }

    let postfix = Postfix(out);
    debug!("Postfix: {}", postfix);
    Ok(postfix)
}

/// Moves operators to the output until the nearest '(' is on top.
fn drain_to_left_paren(
    stack: &mut Vec<StackItem>,
    out: &mut Vec<PostfixItem>,
    found: char,
) -> Result<()> {
    loop {
        match stack.last() {
            Some(StackItem::LeftParen) => return Ok(()),
            Some(_) => {
                if let Some(item) = stack.pop().and_then(StackItem::into_postfix) {
                    out.push(item);
                }
            }
            None => {
                return Err(Error::MisplacedParenthesis(format!(
                    "'{}' without a matching '('",
                    found
                )))
            }
        }
    }
}

fn close_call(
    name: &str,
    args: usize,
    registry: &FunctionRegistry,
    out: &mut Vec<PostfixItem>,
) -> Result<()> {
    match registry.arity(name) {
        Some(Arity::Variadic) => out.push(PostfixItem::ArgCount(args)),
        Some(Arity::Fixed(expected)) if expected != args => {
            return Err(Error::arity(name, expected, args))
        }
        Some(Arity::Fixed(_)) => {}
        None => return Err(Error::UnknownFunction(name.to_string())),
    }
    Ok(())
}
