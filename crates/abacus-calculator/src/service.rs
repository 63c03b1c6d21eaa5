//! Computes results and records the successful ones.

use std::sync::Arc;

use abacus_store::{Record, ResultSink};
use chrono::Utc;

use crate::calculator::{CalcError, Calculator, Operation};

/// Runs calculations and inserts every success into the store.
#[derive(Clone)]
pub struct CalculatorService {
    calculator: Calculator,
    sink: Arc<dyn ResultSink>,
}

impl CalculatorService {
    /// Creates a service rounding to `precision` places and writing to `sink`.
    #[must_use]
    pub fn new(precision: u32, sink: Arc<dyn ResultSink>) -> Self {
        Self {
            calculator: Calculator::new(precision),
            sink,
        }
    }

    /// `a + b`
    pub fn add(&self, a: f64, b: f64) -> Result<Record, CalcError> {
        self.run(Operation::Add, a, b)
    }

    /// `a - b`
    pub fn subtract(&self, a: f64, b: f64) -> Result<Record, CalcError> {
        self.run(Operation::Subtract, a, b)
    }

    /// `a * b`
    pub fn multiply(&self, a: f64, b: f64) -> Result<Record, CalcError> {
        self.run(Operation::Multiply, a, b)
    }

    /// `a / b`
    pub fn divide(&self, a: f64, b: f64) -> Result<Record, CalcError> {
        self.run(Operation::Divide, a, b)
    }

    fn run(&self, op: Operation, a: f64, b: f64) -> Result<Record, CalcError> {
        let calculation = self.calculator.compute(op, a, b)?;
        let record = Record::new(calculation.value, calculation.expression, Utc::now());
        self.sink.insert(record.clone());
        Ok(record)
    }
}

impl std::fmt::Debug for CalculatorService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CalculatorService")
            .field("calculator", &self.calculator)
            .finish_non_exhaustive()
    }
}
