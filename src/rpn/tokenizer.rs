use crate::error::{Error, Result};
use crate::rpn::{Operator, Token, ARG_SEPARATOR, DECIMAL_POINT, MOD_KEYWORD};
use log::{debug, trace};

/// Splits `text` into tokens. `function_names` is the set of names the
/// scanner recognises as function calls; matching is case-insensitive and
/// prefers the longest name.
///
/// The input is expected to be free of whitespace; the engine strips it
/// before calling in here.
pub fn tokenize(text: &str, function_names: &[String]) -> Result<Vec<Token>> {
    if text.is_empty() {
        return Err(Error::InvalidExpression(
            "no arithmetic expression provided".to_string(),
        ));
    }

    debug!("Tokenizing expression: {}", text);
    let tokens = Tokenizer::new(text, function_names).run()?;
    debug!("Tokens: {:?}", tokens);
    Ok(tokens)
}

struct Tokenizer<'a> {
    src: Vec<char>,
    names: &'a [String],
    pos: usize,
    tokens: Vec<Token>,
    number: String,
    number_start: usize,
    /// Open `(` tokens emitted so far.
    depth: usize,
    /// Depths at which a synthetic `)` closes a negated power operand.
    pending_closes: Vec<usize>,
}

impl<'a> Tokenizer<'a> {
    fn new(text: &str, names: &'a [String]) -> Self {
        Self {
            src: text.chars().collect(),
            names,
            pos: 0,
            tokens: Vec::new(),
            number: String::new(),
            number_start: 0,
            depth: 0,
            pending_closes: Vec::new(),
        }
    }

    fn run(mut self) -> Result<Vec<Token>> {
        while self.pos < self.src.len() {
            let c = self.src[self.pos];

            if c == '-' && self.number.is_empty() && self.sign_allowed() {
                self.number_start = self.pos;
                self.number.push(c);
                self.pos += 1;
                continue;
            }

            if c.is_ascii_digit() || c == DECIMAL_POINT {
                if self.number.is_empty() {
                    self.number_start = self.pos;
                }
                self.number.push(c);
                self.pos += 1;
                continue;
            }

            let function = self.match_function();
            if !self.number.is_empty() {
                let before_group = c == '(' || function.is_some();
                self.flush_number(before_group)?;
            }

            if let Some(name) = function {
                if matches!(self.tokens.last(), Some(Token::Number(_))) {
                    self.push(Token::Operator(Operator::Multiply));
                }
                self.pos += name.chars().count();
                self.push(Token::FunctionName(name));
                continue;
            }

            match c {
                '(' => {
                    if matches!(
                        self.tokens.last(),
                        Some(Token::Number(_)) | Some(Token::RightParen)
                    ) {
                        self.push(Token::Operator(Operator::Multiply));
                    }
                    self.push(Token::LeftParen);
                    self.pos += 1;
                }
                ')' => {
                    self.push(Token::RightParen);
                    while self.pending_closes.last() == Some(&self.depth) {
                        self.pending_closes.pop();
                        self.push(Token::RightParen);
                    }
                    self.pos += 1;
                }
                ARG_SEPARATOR => {
                    self.push(Token::ArgSeparator);
                    self.pos += 1;
                }
                _ if Operator::is_operator_symbol(c) => {
                    self.push_operator(Operator::try_from(c)?)?;
                    self.pos += 1;
                }
                _ if self.lookahead_is(MOD_KEYWORD) => {
                    self.push_operator(Operator::Modulo)?;
                    self.pos += MOD_KEYWORD.len();
                }
                _ => {
                    return Err(Error::InvalidToken {
                        token: c,
                        position: self.pos,
                    })
                }
            }
        }

        if !self.number.is_empty() {
            self.flush_number(false)?;
        }

        Ok(self.tokens)
    }

    fn push(&mut self, token: Token) {
        trace!("emit {:?}", token);
        match token {
            Token::LeftParen => self.depth += 1,
            Token::RightParen => self.depth = self.depth.saturating_sub(1),
            _ => {}
        }
        self.tokens.push(token);
    }

    /// A `-` is a sign at the very start, or right after `(`, `^` or `,`.
    fn sign_allowed(&self) -> bool {
        match self.pos.checked_sub(1).map(|prev| self.src[prev]) {
            None => true,
            Some(prev) => prev == '(' || prev == '^' || prev == ARG_SEPARATOR,
        }
    }

    fn push_operator(&mut self, op: Operator) -> Result<()> {
        match self.tokens.last() {
            Some(Token::Operator(prev)) => Err(Error::InvalidExpression(format!(
                "operator '{}' directly follows '{}' at position {}",
                op, prev, self.pos
            ))),
            None | Some(Token::LeftParen) | Some(Token::ArgSeparator) => {
                Err(Error::InvalidExpression(format!(
                    "operator '{}' is missing its left operand at position {}",
                    op, self.pos
                )))
            }
            _ => {
                self.push(Token::Operator(op));
                Ok(())
            }
        }
    }

    /// Turns the pending literal into a `Number`. A bare sign in front of
    /// a group or a call (`-(2)`, `-sqrt(4)`) is read as `-1`, so the
    /// implicit multiplication kicks in right after it.
    ///
    /// After `^` the `-1 *` is wrapped in its own group, closed once the
    /// operand's `)` is read, so `2^-(1+1)` means `2^(-1*(1+1))`.
    fn flush_number(&mut self, before_group: bool) -> Result<()> {
        let literal = std::mem::take(&mut self.number);
        let position = self.number_start;
        let invalid = || Error::InvalidNumberFormat {
            literal: literal.clone(),
            position,
        };

        let value = if literal == "-" && before_group {
            if self.follows_power() {
                self.push(Token::LeftParen);
                self.pending_closes.push(self.depth);
            }
            -1.0
        } else if literal.matches(DECIMAL_POINT).count() > 1 {
            return Err(invalid());
        } else {
            literal.parse::<f64>().map_err(|_| invalid())?
        };

        self.push(Token::Number(value));
        Ok(())
    }

    fn follows_power(&self) -> bool {
        self.number_start
            .checked_sub(1)
            .is_some_and(|prev| self.src[prev] == '^')
    }

    fn lookahead_is(&self, word: &str) -> bool {
        let mut i = self.pos;
        for expected in word.chars() {
            match self.src.get(i) {
                Some(c) if c.to_ascii_lowercase() == expected => i += 1,
                _ => return false,
            }
        }
        true
    }

    fn match_function(&self) -> Option<String> {
        self.names
            .iter()
            .filter(|name| !name.is_empty() && self.lookahead_is(name))
            .max_by_key(|name| name.chars().count())
            .cloned()
    }
}
