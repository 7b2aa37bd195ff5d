//! Text emission of lowered circuits.

mod circom;

#[cfg(test)]
mod circom_tests;

pub use circom::render;
