//! Display implementation for `Series`.
//!
//! Format: "1 - x + 2*x^3 + O(x^10)". Zero series: "O(x^10)". Uses "x" as the variable name
//! and shows [`super::PREFIX_EQ_LEN`] terms, the same bound `PartialEq` compares — printing
//! more terms than that would suggest a precision the type doesn't claim to have.

use std::fmt;

use crate::rational::Rational;

use super::{Series, PREFIX_EQ_LEN};

impl fmt::Display for Series {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let var = "x";
        let mut first = true;
        let mut cursor = self.coeffs_cursor();

        for k in 0..PREFIX_EQ_LEN {
            let c = cursor.next();
            if c.is_zero() {
                continue;
            }

            let is_negative = c.is_negative();
            let abs_c: Rational = if is_negative { -c.clone() } else { c.clone() };
            let abs_is_one = abs_c == Rational::one();

            if first {
                if is_negative {
                    write!(f, "-")?;
                }
                first = false;
            } else {
                write!(f, "{}", if is_negative { " - " } else { " + " })?;
            }

            match (k, abs_is_one) {
                (0, _) => write!(f, "{}", abs_c)?,
                (1, true) => write!(f, "{}", var)?,
                (1, false) => write!(f, "{}*{}", abs_c, var)?,
                (_, true) => write!(f, "{}^{}", var, k)?,
                (_, false) => write!(f, "{}*{}^{}", abs_c, var, k)?,
            }
        }

        if first {
            write!(f, "O({}^{})", var, PREFIX_EQ_LEN)
        } else {
            write!(f, " + O({}^{})", var, PREFIX_EQ_LEN)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::Series;
    use crate::rational::Rational;

    fn r(n: i64, d: i64) -> Rational {
        Rational::from_integers(n, d)
    }

    #[test]
    fn zero_series_displays_as_big_o() {
        let s = Series::empty();
        assert_eq!(format!("{}", s), "O(x^10)");
    }

    #[test]
    fn displays_signs_and_unit_coefficients() {
        let s = Series::from_list(vec![r(1, 1), r(-1, 1), r(0, 1), r(2, 1)]);
        assert_eq!(format!("{}", s), "1 - x + 2*x^3 + O(x^10)");
    }
}
