//! A library containing an implementation of a compact radix tree (PATRICIA
//! trie) that stores byte string keys as a multiset.

#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    rustdoc::all,
    missing_debug_implementations
)]
#![deny(clippy::all, missing_docs, rust_2018_idioms, rust_2021_compatibility)]

mod ops;
mod raw;
mod tree;

#[cfg(test)]
mod proptests;

pub use tree::*;
