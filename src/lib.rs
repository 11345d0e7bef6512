//! Sparse trivariate polynomial arithmetic with exact term-ordered
//! storage and long division.
//!
//! Polynomials in `x`, `y`, `z` are stored as a strictly descending,
//! deduplicated term sequence over `f64` coefficients. A single
//! insert-or-merge primitive maintains that canonical form, so every
//! operator produces canonical output by construction; on top of it sit
//! the ring operators and a quotient/remainder long division by repeated
//! leading-term elimination.
//!
//! ```
//! use tripoly::domains::float::FloatField;
//! use tripoly::poly::polynomial::Polynomial;
//!
//! // x^2 - 4
//! let mut a = Polynomial::new(&FloatField);
//! a.append_term(1.0, [2, 0, 0]);
//! a.append_term(-4.0, [0, 0, 0]);
//!
//! // x - 2
//! let mut b = Polynomial::new(&FloatField);
//! b.append_term(1.0, [1, 0, 0]);
//! b.append_term(-2.0, [0, 0, 0]);
//!
//! let (q, r) = a.quot_rem(&b);
//! assert_eq!(q.to_string(), "x + 2");
//! assert!(r.is_zero());
//! ```

pub mod domains;
pub mod parser;
pub mod poly;
pub mod printer;
pub mod session;
