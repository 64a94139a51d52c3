// src/lib.rs

//! sitecorpus: single-site crawler that builds a deduplicated markdown corpus

pub mod error;
pub mod models;
pub mod pipeline;
pub mod services;
pub mod storage;
pub mod utils;
