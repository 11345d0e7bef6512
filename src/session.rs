//! The read/dispatch/print loop driving the stream calculator.

use std::io::{self, BufRead, Write};

use thiserror::Error;
use tracing::error;

use crate::domains::float::FloatField;
use crate::parser::{ReadError, TermReader};
use crate::poly::polynomial::Polynomial;
use crate::printer::{PolynomialPrinter, PrintOptions};

/// Token that ends a session.
const END_TOKEN: &str = "#";

/// A dispatched operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
}

impl Op {
    /// Map a single-character operation token. Anything else, including
    /// longer tokens, is an unknown operation.
    pub fn from_token(token: &str) -> Option<Op> {
        match token {
            "+" => Some(Op::Add),
            "-" => Some(Op::Subtract),
            "*" => Some(Op::Multiply),
            "/" => Some(Op::Divide),
            "%" => Some(Op::Modulo),
            _ => None,
        }
    }

    pub fn apply(&self, a: &Polynomial, b: &Polynomial) -> Polynomial {
        match self {
            Op::Add => a + b,
            Op::Subtract => a - b,
            Op::Multiply => a * b,
            Op::Divide => a.quot_rem(b).0,
            Op::Modulo => a.quot_rem(b).1,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error("output error: {0}")]
    Output(#[from] io::Error),
}

/// Run the operation loop: each round reads an operation token and two
/// polynomials, then prints the result. `#` (or running out of input
/// between rounds) ends the session. An unknown operation token is
/// reported on the error channel; its operands are still consumed, so the
/// stream stays framed for the next round.
pub fn run_session<R: BufRead, W: Write>(input: R, mut output: W) -> Result<(), SessionError> {
    let mut reader = TermReader::new(input);
    let field = FloatField;
    let opts = PrintOptions::default();

    loop {
        let token = match reader.next_token()? {
            None => return Ok(()),
            Some(t) if t == END_TOKEN => return Ok(()),
            Some(t) => t.to_string(),
        };

        let op = Op::from_token(&token);

        let a = reader.read_polynomial(&field)?;
        let b = reader.read_polynomial(&field)?;

        let Some(op) = op else {
            error!("unknown operation `{}`", token);
            continue;
        };

        let result = op.apply(&a, &b);
        write!(output, "{}", PolynomialPrinter { poly: &result, opts })?;
    }
}
