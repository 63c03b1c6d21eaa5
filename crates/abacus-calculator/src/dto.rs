//! Request and response bodies for the calculator routes.
//!
//! A missing operand in a request body reads as `0.0`.

#![allow(missing_docs)]

use abacus_store::PageMetadata;
use serde::{Deserialize, Serialize};

/// `POST /addition` body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdditionRequest {
    pub summand_one: f64,
    pub summand_two: f64,
}

/// `POST /addition` response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdditionResponse {
    pub sum: f64,
}

/// `POST /subtraction` body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubtractionRequest {
    pub minuend: f64,
    pub subtrahend: f64,
}

/// `POST /subtraction` response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SubtractionResponse {
    pub difference: f64,
}

/// `POST /multiplication` body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MultiplicationRequest {
    pub factor_one: f64,
    pub factor_two: f64,
}

/// `POST /multiplication` response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplicationResponse {
    pub product: f64,
}

/// `POST /division` body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DivisionRequest {
    pub dividend: f64,
    pub divisor: f64,
}

/// `POST /division` response.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivisionResponse {
    pub quotient: f64,
}

/// `GET /recent` response: expressions newest first plus page metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentResponse {
    pub calculations: Vec<String>,
    pub pagination: PageMetadata,
}
