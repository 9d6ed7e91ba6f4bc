//! Chinook Storefront library.
//!
//! This crate provides the storefront functionality as a library,
//! allowing it to be tested and reused by the CLI.
//!
//! - [`cart`]: the shopper's cart and its persistence
//! - [`api`]: client for the catalog REST backend
//! - [`checkout`]: turning the cart into an invoice
//! - [`routes`]: the JSON HTTP surface

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod api;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod state;

#[cfg(test)]
mod fixtures;
