use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

use tracing::debug;

use crate::domains::float::FloatField;
use crate::domains::{Field, Ring};

use super::{Exponents, LexOrder, MonomialOrder, VARS};

/// Sparse polynomial in `x`, `y`, `z`.
///
/// Data format: the i-th term is `coefficients[i]` over `exponents[i]`.
/// Terms are kept strictly descending in [`LexOrder`], so the leading term
/// sits at index 0, every exponent triple occurs at most once and no
/// stored coefficient is zero under the ring's tolerance. The empty term
/// list is the only representation of the zero polynomial.
#[derive(Clone)]
pub struct Polynomial<F: Ring = FloatField> {
    pub coefficients: Vec<F::Element>,
    pub exponents: Vec<Exponents>,
    pub field: F,
}

impl<F: Ring> Polynomial<F> {
    /// Constructs a zero polynomial.
    #[inline]
    pub fn new(field: &F) -> Self {
        Self {
            coefficients: vec![],
            exponents: vec![],
            field: field.clone(),
        }
    }

    /// Constructs a zero polynomial, inheriting the field from `self`.
    #[inline]
    pub fn zero(&self) -> Self {
        Self::new(&self.field)
    }

    /// Constructs a zero polynomial with room for `cap` terms.
    #[inline]
    pub fn zero_with_capacity(&self, cap: usize) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap),
            exponents: Vec::with_capacity(cap),
            field: self.field.clone(),
        }
    }

    /// Constructs a constant polynomial.
    #[inline]
    pub fn constant(&self, coeff: F::Element) -> Self {
        self.monomial(coeff, [0, 0, 0])
    }

    /// Constructs a polynomial with a single term.
    #[inline]
    pub fn monomial(&self, coeff: F::Element, exponents: Exponents) -> Self {
        if F::is_zero(&coeff) {
            return self.zero();
        }

        Self {
            coefficients: vec![coeff],
            exponents: vec![exponents],
            field: self.field.clone(),
        }
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.nterms() == 0
    }

    /// Returns the number of terms.
    #[inline]
    pub fn nterms(&self) -> usize {
        self.coefficients.len()
    }

    /// Get the leading coefficient, which is zero only for the zero
    /// polynomial.
    pub fn lcoeff(&self) -> F::Element {
        if self.is_zero() {
            return self.field.zero();
        }
        self.coefficients[0].clone()
    }

    /// Insert a term, keeping the polynomial canonical. This is the single
    /// mutation primitive: a negligible coefficient is dropped, an equal
    /// exponent triple merges into the existing term (removing it when the
    /// sum cancels), and anything else is spliced in at its ordered
    /// position.
    pub fn append_term(&mut self, coefficient: F::Element, exponents: Exponents) {
        if F::is_zero(&coefficient) {
            return;
        }

        // Fast paths: the new key sorts below the current minimum or above
        // the current maximum.
        match self.exponents.last() {
            None => {
                self.coefficients.push(coefficient);
                self.exponents.push(exponents);
                return;
            }
            Some(last) => {
                if LexOrder::cmp(last, &exponents).is_gt() {
                    self.coefficients.push(coefficient);
                    self.exponents.push(exponents);
                    return;
                }
            }
        }

        if LexOrder::cmp(&self.exponents[0], &exponents).is_lt() {
            self.coefficients.insert(0, coefficient);
            self.exponents.insert(0, exponents);
            return;
        }

        // Storage is descending, so the probe goes on the right-hand side
        // of the comparison.
        match self
            .exponents
            .binary_search_by(|probe| LexOrder::cmp(&exponents, probe))
        {
            Ok(i) => {
                self.field.add_assign(&mut self.coefficients[i], &coefficient);
                if F::is_zero(&self.coefficients[i]) {
                    // The coefficients cancelled. Remove the term.
                    self.coefficients.remove(i);
                    self.exponents.remove(i);
                }
            }
            Err(i) => {
                self.coefficients.insert(i, coefficient);
                self.exponents.insert(i, exponents);
            }
        }
    }

    /// Append a term to the back, merging with the last term if the
    /// exponents are equal. The caller must feed keys in descending order.
    #[inline]
    pub fn append_term_back(&mut self, coefficient: F::Element, exponents: Exponents) {
        if F::is_zero(&coefficient) {
            return;
        }

        let nterms = self.nterms();
        if nterms > 0 && self.exponents[nterms - 1] == exponents {
            self.field
                .add_assign(&mut self.coefficients[nterms - 1], &coefficient);

            if F::is_zero(&self.coefficients[nterms - 1]) {
                self.coefficients.pop();
                self.exponents.pop();
            }
        } else {
            self.coefficients.push(coefficient);
            self.exponents.push(exponents);
        }
    }

    /// Multiply by the monomial `coefficient * x^e0*y^e1*z^e2`. The term
    /// order is preserved; products that fall below the tolerance are
    /// dropped.
    pub fn mul_monomial(&self, coefficient: &F::Element, exponents: &Exponents) -> Self {
        let mut res = self.zero_with_capacity(self.nterms());
        for t in self {
            res.append_term_back(
                self.field.mul(t.coefficient, coefficient),
                [
                    t.exponents[0] + exponents[0],
                    t.exponents[1] + exponents[1],
                    t.exponents[2] + exponents[2],
                ],
            );
        }
        res
    }

    /// Check that the term list is strictly descending, deduplicated and
    /// free of negligible coefficients.
    pub fn check_consistency(&self) {
        assert_eq!(self.coefficients.len(), self.exponents.len());

        for c in &self.coefficients {
            if F::is_zero(c) {
                panic!("inconsistent polynomial (negligible coefficient): {:?}", self);
            }
        }

        for t in 1..self.nterms() {
            match LexOrder::cmp(&self.exponents[t], &self.exponents[t - 1]) {
                Ordering::Equal => panic!("inconsistent polynomial (equal monomials): {:?}", self),
                Ordering::Greater => {
                    panic!("inconsistent polynomial (wrong monomial ordering): {:?}", self)
                }
                Ordering::Less => {}
            }
        }
    }
}

impl<F: Field> Polynomial<F> {
    /// Divide `self` by `div`, returning the quotient and remainder of a
    /// leading-term long division.
    ///
    /// Each round checks component-wise monomial divisibility of the two
    /// leading terms; as soon as the test fails the remainder is final, so
    /// a non-zero remainder is a defined outcome rather than an error.
    /// Division by the zero polynomial (or a divisor whose leading
    /// coefficient is negligible) yields an empty quotient and an
    /// untouched copy of the dividend.
    pub fn quot_rem(&self, div: &Self) -> (Self, Self) {
        if F::is_zero(&div.lcoeff()) {
            return (self.zero(), self.clone());
        }

        let lb_coeff = div.coefficients[0].clone();
        let lb_exp = div.exponents[0];

        let mut quotient = self.zero();
        let mut remainder = self.clone();

        while !remainder.is_zero() {
            let lr_exp = remainder.exponents[0];

            // Component-wise monomial divisibility of the leading terms.
            if lr_exp.iter().zip(&lb_exp).any(|(a, b)| a < b) {
                break;
            }

            let c = self.field.div(&remainder.coefficients[0], &lb_coeff);
            if F::is_zero(&c) {
                // The quotient coefficient underflowed the tolerance.
                break;
            }

            let exponents = [
                lr_exp[0] - lb_exp[0],
                lr_exp[1] - lb_exp[1],
                lr_exp[2] - lb_exp[2],
            ];

            debug!("quotient term {} * {:?}", c, exponents);
            quotient.append_term(c.clone(), exponents);

            // Cancels the leading term of the old remainder, so the
            // leading monomial strictly decreases every round.
            remainder = &remainder - &div.mul_monomial(&c, &exponents);
        }

        (quotient, remainder)
    }

    /// Compute the remainder of `self % div`.
    pub fn rem(&self, div: &Self) -> Self {
        self.quot_rem(div).1
    }
}

impl<F: Ring> PartialEq for Polynomial<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.exponents.eq(&other.exponents) && self.coefficients.eq(&other.coefficients)
    }
}

impl<F: Ring> fmt::Debug for Polynomial<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return write!(f, "[]");
        }
        let mut first = true;
        write!(f, "[ ")?;
        for term in self {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{{ {:?}, {:?} }}", term.coefficient, term.exponents)?;
        }
        write!(f, " ]")
    }
}

/// Algebraic rendering (`2*x^2*y - 4`) for logs and diagnostics. The wire
/// format lives in [`crate::printer`].
impl<F: Ring<Element = f64>> fmt::Display for Polynomial<F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_zero() {
            return f.write_str("0");
        }

        for (i, term) in self.into_iter().enumerate() {
            let c = *term.coefficient;
            if i == 0 {
                if c < 0. {
                    f.write_str("-")?;
                }
            } else if c < 0. {
                f.write_str(" - ")?;
            } else {
                f.write_str(" + ")?;
            }

            let magnitude = c.abs();
            let has_vars = term.exponents.iter().any(|e| *e != 0);

            let mut wrote_factor = false;
            if !has_vars || magnitude != 1. {
                write!(f, "{}", magnitude)?;
                wrote_factor = true;
            }

            for (v, e) in VARS.iter().zip(term.exponents) {
                if *e == 0 {
                    continue;
                }
                if wrote_factor {
                    f.write_str("*")?;
                }
                if *e == 1 {
                    f.write_str(v)?;
                } else {
                    write!(f, "{}^{}", v, e)?;
                }
                wrote_factor = true;
            }
        }

        Ok(())
    }
}

impl<F: Ring> Neg for Polynomial<F> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for c in &mut self.coefficients {
            *c = self.field.neg(c);
        }
        self
    }
}

impl<'a, 'b, F: Ring> Add<&'a Polynomial<F>> for &'b Polynomial<F> {
    type Output = Polynomial<F>;

    /// Merge the two term lists, which are both descending, in a single
    /// walk. Coefficient sums that cancel below the tolerance are skipped.
    fn add(self, other: &'a Polynomial<F>) -> Polynomial<F> {
        debug_assert_eq!(self.field, other.field);

        if self.is_zero() {
            return other.clone();
        }
        if other.is_zero() {
            return self.clone();
        }

        let mut res = self.zero_with_capacity(self.nterms() + other.nterms());
        let mut i = 0;
        let mut j = 0;

        macro_rules! push_term {
            ($source:expr, $index:expr) => {
                res.coefficients.push($source.coefficients[$index].clone());
                res.exponents.push($source.exponents[$index]);
            };
        }

        while i < self.nterms() && j < other.nterms() {
            match LexOrder::cmp(&self.exponents[i], &other.exponents[j]) {
                Ordering::Greater => {
                    push_term!(self, i);
                    i += 1;
                }
                Ordering::Less => {
                    push_term!(other, j);
                    j += 1;
                }
                Ordering::Equal => {
                    let c = self.field.add(&self.coefficients[i], &other.coefficients[j]);
                    if !F::is_zero(&c) {
                        res.coefficients.push(c);
                        res.exponents.push(self.exponents[i]);
                    }
                    i += 1;
                    j += 1;
                }
            }
        }

        while i < self.nterms() {
            push_term!(self, i);
            i += 1;
        }

        while j < other.nterms() {
            push_term!(other, j);
            j += 1;
        }

        res
    }
}

impl<'a, 'b, F: Ring> Sub<&'a Polynomial<F>> for &'b Polynomial<F> {
    type Output = Polynomial<F>;

    fn sub(self, other: &'a Polynomial<F>) -> Polynomial<F> {
        self + &other.clone().neg()
    }
}

impl<'a, 'b, F: Ring> Mul<&'a Polynomial<F>> for &'b Polynomial<F> {
    type Output = Polynomial<F>;

    /// Expand every pair of terms and route the products through
    /// [`Polynomial::append_term`], which merges and cancels on the fly.
    /// Quadratic in the term counts; sparse trivariate products have no
    /// cheaper general expansion without extra indexing.
    fn mul(self, rhs: &'a Polynomial<F>) -> Polynomial<F> {
        debug_assert_eq!(self.field, rhs.field);

        if self.is_zero() || rhs.is_zero() {
            return self.zero();
        }

        let mut res = self.zero_with_capacity(self.nterms() + rhs.nterms());
        for t1 in self {
            for t2 in rhs {
                res.append_term(
                    self.field.mul(t1.coefficient, t2.coefficient),
                    [
                        t1.exponents[0] + t2.exponents[0],
                        t1.exponents[1] + t2.exponents[1],
                        t1.exponents[2] + t2.exponents[2],
                    ],
                );
            }
        }
        res
    }
}

/// View object for a term in a polynomial.
#[derive(Copy, Clone, Debug)]
pub struct TermView<'a, F: 'a + Ring> {
    pub coefficient: &'a F::Element,
    pub exponents: &'a Exponents,
}

/// Iterator over the terms in a polynomial, in storage (descending)
/// order.
pub struct TermViewIterator<'a, F: Ring> {
    poly: &'a Polynomial<F>,
    index: usize,
}

impl<'a, F: Ring> Iterator for TermViewIterator<'a, F> {
    type Item = TermView<'a, F>;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.index == self.poly.nterms() {
            None
        } else {
            let view = TermView {
                coefficient: &self.poly.coefficients[self.index],
                exponents: &self.poly.exponents[self.index],
            };
            self.index += 1;
            Some(view)
        }
    }
}

impl<'a, F: Ring> IntoIterator for &'a Polynomial<F> {
    type Item = TermView<'a, F>;
    type IntoIter = TermViewIterator<'a, F>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        Self::IntoIter {
            poly: self,
            index: 0,
        }
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use crate::domains::float::{FloatField, EPSILON};
    use crate::domains::Ring;

    use super::Polynomial;

    fn poly(terms: &[(i32, i32, i32, f64)]) -> Polynomial {
        let mut p = Polynomial::new(&FloatField);
        for &(x, y, z, c) in terms {
            p.append_term(c, [x, y, z]);
        }
        p
    }

    fn random_poly(rng: &mut StdRng, nterms: usize, max_exp: i32) -> Polynomial {
        let field = FloatField;
        let mut p = Polynomial::new(&field);
        for _ in 0..nterms {
            let e = [
                rng.gen_range(0..max_exp),
                rng.gen_range(0..max_exp),
                rng.gen_range(0..max_exp),
            ];
            p.append_term(field.sample(rng, (-9, 10)), e);
        }
        p
    }

    #[test]
    fn insert_sorts_and_merges() {
        let p = poly(&[
            (0, 0, 1, 1.),
            (2, 0, 0, 1.5),
            (0, 3, 0, -2.),
            (2, 0, 0, 1.5),
        ]);
        p.check_consistency();

        assert_eq!(p.nterms(), 3);
        assert_eq!(p.exponents, vec![[2, 0, 0], [0, 3, 0], [0, 0, 1]]);
        assert_eq!(p.coefficients, vec![3., -2., 1.]);
    }

    #[test]
    fn insert_cancels_to_zero() {
        let p = poly(&[(1, 0, 0, 2.), (1, 0, 0, -2.)]);
        assert!(p.is_zero());
        assert_eq!(p.nterms(), 0);
    }

    #[test]
    fn negligible_insert_is_noop() {
        let p = poly(&[(5, 5, 5, 1e-12)]);
        assert!(p.is_zero());

        let p = poly(&[(1, 0, 0, 1.), (1, 0, 0, -1. + 1e-12)]);
        // the merged coefficient lands below the tolerance
        assert!(p.is_zero());
    }

    #[test]
    fn insert_matches_model() {
        let field = FloatField;
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            let mut p = Polynomial::new(&field);
            let mut model: BTreeMap<[i32; 3], f64> = BTreeMap::new();

            // a narrow exponent range forces plenty of collisions
            for _ in 0..200 {
                let e = [
                    rng.gen_range(0..3),
                    rng.gen_range(0..3),
                    rng.gen_range(0..3),
                ];
                let c = field.sample(&mut rng, (-4, 5));

                p.append_term(c, e);
                if c.abs() >= EPSILON {
                    let entry = model.entry(e).or_insert(0.);
                    *entry += c;
                    if entry.abs() < EPSILON {
                        model.remove(&e);
                    }
                }
            }

            p.check_consistency();
            assert_eq!(p.nterms(), model.len());
            for (term, (e, c)) in p.into_iter().zip(model.iter().rev()) {
                assert_eq!(term.exponents, e);
                assert_eq!(term.coefficient, c);
            }
        }
    }

    #[test]
    fn add_merges_common_terms() {
        let a = poly(&[(2, 0, 0, 1.), (0, 2, 0, 1.)]);
        let b = poly(&[(2, 0, 0, 1.)]);

        let sum = &a + &b;
        sum.check_consistency();
        assert_eq!(sum, poly(&[(2, 0, 0, 2.), (0, 2, 0, 1.)]));
    }

    #[test]
    fn add_zero_is_identity() {
        let p = poly(&[(3, 1, 0, 2.), (0, 0, 2, -1.)]);
        let zero = p.zero();

        assert_eq!(&p + &zero, p);
        assert_eq!(&zero + &p, p);
    }

    #[test]
    fn sub_self_is_zero() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let p = random_poly(&mut rng, 8, 4);
            assert!((&p - &p).is_zero());
        }
    }

    #[test]
    fn mul_single_terms() {
        let a = poly(&[(1, 0, 0, 2.)]);
        let b = poly(&[(0, 1, 0, 3.)]);

        assert_eq!(&a * &b, poly(&[(1, 1, 0, 6.)]));
    }

    #[test]
    fn mul_expands_and_cancels() {
        // (x + 1) * (x - 1) = x^2 - 1
        let a = poly(&[(1, 0, 0, 1.), (0, 0, 0, 1.)]);
        let b = poly(&[(1, 0, 0, 1.), (0, 0, 0, -1.)]);

        let product = &a * &b;
        product.check_consistency();
        assert_eq!(product, poly(&[(2, 0, 0, 1.), (0, 0, 0, -1.)]));
    }

    #[test]
    fn mul_drops_negligible_products() {
        // both factors are above the tolerance, their product is not
        let a = poly(&[(1, 0, 0, 1e-5)]);
        let b = poly(&[(0, 1, 0, 1e-5)]);

        assert!((&a * &b).is_zero());
    }

    #[test]
    fn arithmetic_laws() {
        let mut rng = StdRng::seed_from_u64(23);
        // integer-valued coefficients keep every f64 operation exact, so
        // the laws can be asserted with bitwise equality
        for _ in 0..25 {
            let p = random_poly(&mut rng, 6, 3);
            let q = random_poly(&mut rng, 6, 3);
            let r = random_poly(&mut rng, 6, 3);

            assert_eq!(&p + &q, &q + &p);
            assert_eq!(&p * &q, &q * &p);

            let left = &p * &(&q + &r);
            let right = &(&p * &q) + &(&p * &r);
            left.check_consistency();
            assert_eq!(left, right);
        }
    }

    #[test]
    fn mul_monomial_preserves_order() {
        let p = poly(&[(2, 1, 0, 3.), (1, 0, 0, -1.), (0, 0, 0, 4.)]);
        let shifted = p.mul_monomial(&2., &[1, 2, 0]);

        shifted.check_consistency();
        assert_eq!(
            shifted,
            poly(&[(3, 3, 0, 6.), (2, 2, 0, -2.), (1, 2, 0, 8.)])
        );
    }

    #[test]
    fn quot_rem_exact() {
        // (x^2 - 4) / (x - 2) = x + 2, remainder 0
        let a = poly(&[(2, 0, 0, 1.), (0, 0, 0, -4.)]);
        let b = poly(&[(1, 0, 0, 1.), (0, 0, 0, -2.)]);

        let (q, r) = a.quot_rem(&b);
        assert_eq!(q, poly(&[(1, 0, 0, 1.), (0, 0, 0, 2.)]));
        assert!(r.is_zero());
    }

    #[test]
    fn quot_rem_not_divisible() {
        // y / x: the leading exponents fail the component-wise test
        let a = poly(&[(0, 1, 0, 1.)]);
        let b = poly(&[(1, 0, 0, 1.)]);

        let (q, r) = a.quot_rem(&b);
        assert!(q.is_zero());
        assert_eq!(r, a);
    }

    #[test]
    fn quot_rem_partial_reduction() {
        // (x^2 + y) / x reduces the x^2 term and then stops
        let a = poly(&[(2, 0, 0, 1.), (0, 1, 0, 1.)]);
        let b = poly(&[(1, 0, 0, 1.)]);

        let (q, r) = a.quot_rem(&b);
        assert_eq!(q, poly(&[(1, 0, 0, 1.)]));
        assert_eq!(r, poly(&[(0, 1, 0, 1.)]));
    }

    #[test]
    fn quot_rem_by_zero() {
        let a = poly(&[(2, 0, 0, 1.), (0, 0, 0, -4.)]);
        let zero = a.zero();

        let (q, r) = a.quot_rem(&zero);
        assert!(q.is_zero());
        assert_eq!(r, a);
    }

    #[test]
    fn quot_rem_underflow_guard() {
        // the quotient coefficient 1e-10 falls below the tolerance, so
        // the loop must stop instead of spinning on negligible terms
        let a = poly(&[(1, 0, 0, 1e-5)]);
        let b = poly(&[(1, 0, 0, 1e5)]);

        let (q, r) = a.quot_rem(&b);
        assert!(q.is_zero());
        assert_eq!(r, a);
    }

    #[test]
    fn division_identity_on_constructed_products() {
        let mut rng = StdRng::seed_from_u64(42);

        for _ in 0..50 {
            let mut b = random_poly(&mut rng, 4, 3);
            // a monic leading term above every random monomial keeps the
            // quotient coefficients integral, hence exact
            b.append_term(1., [5, 0, 0]);

            let q = random_poly(&mut rng, 4, 3);
            if q.is_zero() {
                continue;
            }

            let a = &b * &q;
            let (quot, rem) = a.quot_rem(&b);
            assert_eq!(quot, q);
            assert!(rem.is_zero());

            // B * Q + R == A
            assert_eq!(&(&b * &quot) + &rem, a);
        }
    }

    #[test]
    fn random_results_stay_canonical() {
        let mut rng = StdRng::seed_from_u64(5);
        for _ in 0..20 {
            let p = random_poly(&mut rng, 10, 4);
            let q = random_poly(&mut rng, 10, 4);

            (&p + &q).check_consistency();
            (&p - &q).check_consistency();
            (&p * &q).check_consistency();

            let (quot, rem) = p.quot_rem(&q);
            quot.check_consistency();
            rem.check_consistency();
        }
    }

    #[test]
    fn display_algebraic_form() {
        let p = poly(&[(2, 1, 0, -2.), (0, 0, 1, 1.), (0, 0, 0, 4.)]);
        assert_eq!(format!("{}", p), "-2*x^2*y + z + 4");
        assert_eq!(format!("{}", p.zero()), "0");
        assert_eq!(format!("{}", p.constant(-1.5)), "-1.5");
        assert_eq!(format!("{}", p.monomial(1., [0, 2, 0])), "y^2");
    }
}
