//! # ShopCart Quote CLI
//!
//! Command-line caller for `shopcart-core`: reads shop rows and a request
//! body from JSON files, prices them, and prints a JSON response envelope.

pub mod commands;
pub mod config;
pub mod error;
pub mod shops;
