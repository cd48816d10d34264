#![no_std]
extern crate alloc;

pub mod decode;
pub mod encode;
pub mod header;
pub mod shape;
pub mod value;


#[cfg(test)]
mod encode_tests;
