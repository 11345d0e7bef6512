//! Whitespace-token ingestion of polynomials from a byte stream.

use std::io::{self, BufRead};

use thiserror::Error;

use crate::domains::Ring;
use crate::poly::polynomial::Polynomial;

/// Errors raised while reading a polynomial stream. Every variant is
/// fatal to the run: once a token fails to parse, the framing of the
/// remaining input is unknown.
#[derive(Debug, Error)]
pub enum ReadError {
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("malformed count or exponent `{0}`")]
    InvalidInteger(String),
    #[error("malformed coefficient `{0}`")]
    InvalidCoefficient(String),
    #[error("input error: {0}")]
    Io(#[from] io::Error),
}

/// Streaming whitespace tokenizer over buffered input. Tokens may be
/// separated by any amount of whitespace, including newlines, so term
/// tuples are free to span lines.
pub struct TermReader<R> {
    reader: R,
    line: String,
    pos: usize,
}

impl<R: BufRead> TermReader<R> {
    pub fn new(reader: R) -> Self {
        TermReader {
            reader,
            line: String::new(),
            pos: 0,
        }
    }

    /// The next token, or `None` at the end of the input.
    pub fn next_token(&mut self) -> Result<Option<&str>, ReadError> {
        loop {
            while let Some(ch) = self.line[self.pos..].chars().next() {
                if !ch.is_whitespace() {
                    break;
                }
                self.pos += ch.len_utf8();
            }

            if self.pos < self.line.len() {
                let start = self.pos;
                let end = self.line[start..]
                    .find(char::is_whitespace)
                    .map(|i| start + i)
                    .unwrap_or(self.line.len());
                self.pos = end;
                return Ok(Some(&self.line[start..end]));
            }

            self.line.clear();
            self.pos = 0;
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
        }
    }

    fn read_token(&mut self) -> Result<&str, ReadError> {
        self.next_token()?.ok_or(ReadError::UnexpectedEof)
    }

    pub fn read_i64(&mut self) -> Result<i64, ReadError> {
        let token = self.read_token()?;
        token
            .parse()
            .map_err(|_| ReadError::InvalidInteger(token.to_string()))
    }

    pub fn read_i32(&mut self) -> Result<i32, ReadError> {
        let token = self.read_token()?;
        token
            .parse()
            .map_err(|_| ReadError::InvalidInteger(token.to_string()))
    }

    pub fn read_f64(&mut self) -> Result<f64, ReadError> {
        let token = self.read_token()?;
        token
            .parse()
            .map_err(|_| ReadError::InvalidCoefficient(token.to_string()))
    }

    /// Read a term count followed by that many `ex ey ez coeff` tuples.
    /// Every tuple goes through [`Polynomial::append_term`], so unsorted,
    /// duplicate and negligible input terms canonicalize on ingestion. A
    /// negative count reads zero terms.
    pub fn read_polynomial<F: Ring<Element = f64>>(
        &mut self,
        field: &F,
    ) -> Result<Polynomial<F>, ReadError> {
        let n = self.read_i64()?;

        let mut p = Polynomial::new(field);
        for _ in 0..n {
            let ex = self.read_i32()?;
            let ey = self.read_i32()?;
            let ez = self.read_i32()?;
            let c = self.read_f64()?;
            p.append_term(c, [ex, ey, ez]);
        }
        Ok(p)
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use crate::domains::float::FloatField;

    use super::{ReadError, TermReader};

    fn read(input: &str) -> Result<crate::poly::polynomial::Polynomial, ReadError> {
        TermReader::new(Cursor::new(input)).read_polynomial(&FloatField)
    }

    #[test]
    fn reads_terms_across_lines() {
        let p = read("3\n1 0 0 2.0\n0 1\n0 -1.0\n1 0 0 0.5").unwrap();
        p.check_consistency();

        assert_eq!(p.exponents, vec![[1, 0, 0], [0, 1, 0]]);
        assert_eq!(p.coefficients, vec![2.5, -1.]);
    }

    #[test]
    fn canonicalizes_on_ingestion() {
        // unsorted, duplicated and negligible terms in one stream
        let p = read("4  0 0 1 1.0  2 0 0 1.5  2 0 0 1.5  1 0 0 0.0000000001").unwrap();
        p.check_consistency();

        assert_eq!(p.exponents, vec![[2, 0, 0], [0, 0, 1]]);
        assert_eq!(p.coefficients, vec![3., 1.]);
    }

    #[test]
    fn zero_coefficients_are_dropped() {
        let p = read("1\n0 0 0 0.0").unwrap();
        assert!(p.is_zero());
    }

    #[test]
    fn negative_count_reads_nothing() {
        let mut reader = TermReader::new(Cursor::new("-2 rest"));
        let p = reader.read_polynomial(&FloatField).unwrap();
        assert!(p.is_zero());

        // the stream is still positioned at the next token
        assert_eq!(reader.next_token().unwrap(), Some("rest"));
    }

    #[test]
    fn malformed_count_is_an_error() {
        assert!(matches!(read("one"), Err(ReadError::InvalidInteger(_))));
    }

    #[test]
    fn malformed_coefficient_is_an_error() {
        assert!(matches!(
            read("1\n0 0 0 abc"),
            Err(ReadError::InvalidCoefficient(_))
        ));
    }

    #[test]
    fn truncated_term_is_an_error() {
        assert!(matches!(read("2\n1 0 0 1.0"), Err(ReadError::UnexpectedEof)));
        assert!(matches!(read(""), Err(ReadError::UnexpectedEof)));
    }
}
