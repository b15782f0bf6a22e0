//! Wage Tax Engine for German payroll
//!
//! This crate computes the German wage withholding tax (Lohnsteuer) with its
//! solidarity surcharge and church tax, the employee and employer shares of
//! the four statutory social insurances, and the resulting gross-to-net
//! figures for the accounting years 2019 to 2025.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
