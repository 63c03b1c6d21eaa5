//! Pure arithmetic with fixed-precision rounding.

use thiserror::Error;

/// Why an operation produced no result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The divisor was exactly zero.
    #[error("division by zero")]
    DivisionByZero,

    /// The result was NaN.
    #[error("result is not a number (NaN)")]
    NotANumber,

    /// The result was infinite.
    #[error("result is infinite (overflow)")]
    Overflow,
}

/// The four supported operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// `a + b`
    Add,
    /// `a - b`
    Subtract,
    /// `a * b`
    Multiply,
    /// `a / b`
    Divide,
}

impl Operation {
    /// The operator symbol used in expressions.
    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
        }
    }

    fn apply(self, a: f64, b: f64) -> f64 {
        match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => a / b,
        }
    }
}

/// A successful, rounded result and its display form.
#[derive(Debug, Clone, PartialEq)]
pub struct Calculation {
    /// The result rounded to the calculator's precision.
    pub value: f64,
    /// `"{a} {op} {b} = {value}"`, every number at the same precision.
    pub expression: String,
}

/// Stateless calculator with a fixed number of decimal places.
///
/// ```
/// use abacus_calculator::Calculator;
///
/// let calc = Calculator::new(2);
/// let result = calc.add(1.5, 2.3).unwrap();
/// assert_eq!(result.value, 3.8);
/// assert_eq!(result.expression, "1.50 + 2.30 = 3.80");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Calculator {
    precision: u32,
}

impl Calculator {
    /// Creates a calculator rounding to `precision` decimal places.
    #[must_use]
    pub fn new(precision: u32) -> Self {
        Self { precision }
    }

    /// Decimal places used for rounding and formatting.
    #[must_use]
    pub fn precision(&self) -> u32 {
        self.precision
    }

    /// `a + b`
    pub fn add(&self, a: f64, b: f64) -> Result<Calculation, CalcError> {
        self.compute(Operation::Add, a, b)
    }

    /// `a - b`
    pub fn subtract(&self, a: f64, b: f64) -> Result<Calculation, CalcError> {
        self.compute(Operation::Subtract, a, b)
    }

    /// `a * b`
    pub fn multiply(&self, a: f64, b: f64) -> Result<Calculation, CalcError> {
        self.compute(Operation::Multiply, a, b)
    }

    /// `a / b`; fails when `b` is exactly zero.
    pub fn divide(&self, a: f64, b: f64) -> Result<Calculation, CalcError> {
        self.compute(Operation::Divide, a, b)
    }

    /// Applies `op`, validates, rounds, then formats.
    pub fn compute(&self, op: Operation, a: f64, b: f64) -> Result<Calculation, CalcError> {
        if op == Operation::Divide && b == 0.0 {
            return Err(CalcError::DivisionByZero);
        }

        let raw = op.apply(a, b);
        if raw.is_nan() {
            return Err(CalcError::NotANumber);
        }
        if raw.is_infinite() {
            return Err(CalcError::Overflow);
        }

        let value = self.round(raw);
        let p = self.precision as usize;
        let expression = format!("{a:.p$} {} {b:.p$} = {value:.p$}", op.symbol());

        Ok(Calculation { value, expression })
    }

    /// Rounds half away from zero.
    fn round(&self, value: f64) -> f64 {
        let scale = 10f64.powi(self.precision as i32);
        let scaled = value * scale;
        // Magnitudes this large have no fractional digits left to round.
        if scaled.is_finite() {
            scaled.round() / scale
        } else {
            value
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check(calc: Calculator, op: Operation, a: f64, b: f64, value: f64, expression: &str) {
        let result = calc.compute(op, a, b).unwrap();
        assert_eq!(result.value, value, "{expression}");
        assert_eq!(result.expression, expression);
    }

    #[test]
    fn test_add() {
        check(Calculator::new(2), Operation::Add, 1.5, 2.3, 3.8, "1.50 + 2.30 = 3.80");
        check(Calculator::new(1), Operation::Add, 0.0, 5.2, 5.2, "0.0 + 5.2 = 5.2");
        check(Calculator::new(0), Operation::Add, 0.0, 0.0, 0.0, "0 + 0 = 0");
        check(Calculator::new(2), Operation::Add, -1.1, -2.2, -3.3, "-1.10 + -2.20 = -3.30");
        check(
            Calculator::new(0),
            Operation::Add,
            1e10,
            2e10,
            3e10,
            "10000000000 + 20000000000 = 30000000000",
        );
        check(
            Calculator::new(10),
            Operation::Add,
            1.000_000_000_1,
            2.000_000_000_2,
            3.000_000_000_3,
            "1.0000000001 + 2.0000000002 = 3.0000000003",
        );
    }

    #[test]
    fn test_subtract_multiply_divide() {
        let calc = Calculator::new(2);
        check(calc, Operation::Subtract, 5.0, 3.0, 2.0, "5.00 - 3.00 = 2.00");
        check(calc, Operation::Multiply, 3.0, 4.0, 12.0, "3.00 * 4.00 = 12.00");
        check(calc, Operation::Divide, 5.0, 2.0, 2.5, "5.00 / 2.00 = 2.50");
        check(calc, Operation::Divide, 1.0, 3.0, 0.33, "1.00 / 3.00 = 0.33");
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        let calc = Calculator::new(0);
        assert_eq!(calc.add(2.0, 0.5).unwrap().value, 3.0);
        assert_eq!(calc.subtract(-2.0, 0.5).unwrap().value, -3.0);
    }

    #[test]
    fn test_division_by_zero() {
        let calc = Calculator::new(2);
        assert_eq!(calc.divide(1.0, 0.0), Err(CalcError::DivisionByZero));
        assert_eq!(calc.divide(0.0, -0.0), Err(CalcError::DivisionByZero));
        assert_eq!(CalcError::DivisionByZero.to_string(), "division by zero");
    }

    #[test]
    fn test_nan_and_overflow_are_rejected_before_rounding() {
        let calc = Calculator::new(2);
        assert_eq!(
            calc.add(f64::INFINITY, f64::NEG_INFINITY),
            Err(CalcError::NotANumber)
        );
        assert_eq!(calc.add(f64::MAX, f64::MAX), Err(CalcError::Overflow));
        assert_eq!(calc.multiply(f64::MAX, 2.0), Err(CalcError::Overflow));
        assert_eq!(
            CalcError::NotANumber.to_string(),
            "result is not a number (NaN)"
        );
        assert_eq!(
            CalcError::Overflow.to_string(),
            "result is infinite (overflow)"
        );
    }

    #[test]
    fn test_huge_finite_result_is_kept() {
        let calc = Calculator::new(4);
        let result = calc.add(f64::MAX, 0.0).unwrap();
        assert_eq!(result.value, f64::MAX);
    }
}
