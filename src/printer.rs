//! Rendering of polynomials in the line-per-term exchange format.

use std::fmt;

use crate::domains::float::FloatField;
use crate::domains::Ring;
use crate::poly::polynomial::Polynomial;

#[derive(Debug, Clone, Copy)]
pub struct PrintOptions {
    /// Fixed number of decimal places for coefficients.
    pub precision: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        PrintOptions { precision: 4 }
    }
}

/// Renders a `---` separator line followed by one `ex ey ez coeff` line
/// per term, in descending term order. The zero polynomial renders as the
/// single line `0 0 0 0.0000` rather than as nothing.
///
/// The term list is printed as stored: the canonical form is maintained
/// at insertion time, so no filtering happens here.
pub struct PolynomialPrinter<'a, F: Ring = FloatField> {
    pub poly: &'a Polynomial<F>,
    pub opts: PrintOptions,
}

impl<'a, F: Ring> PolynomialPrinter<'a, F> {
    pub fn new(poly: &'a Polynomial<F>) -> Self {
        PolynomialPrinter {
            poly,
            opts: PrintOptions::default(),
        }
    }
}

impl<'a, F: Ring<Element = f64>> fmt::Display for PolynomialPrinter<'a, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "---")?;

        if self.poly.is_zero() {
            return writeln!(f, "0 0 0 {:.prec$}", 0., prec = self.opts.precision);
        }

        for term in self.poly {
            writeln!(
                f,
                "{} {} {} {:.prec$}",
                term.exponents[0],
                term.exponents[1],
                term.exponents[2],
                term.coefficient,
                prec = self.opts.precision
            )?;
        }
        Ok(())
    }
}
