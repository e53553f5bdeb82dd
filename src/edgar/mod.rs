// src/edgar/mod.rs
pub mod cik;
pub mod client;
pub mod models;

pub use cik::Cik;
pub use client::{EdgarClient, JsonFetcher};
