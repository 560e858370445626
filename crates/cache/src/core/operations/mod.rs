//! Cache operations module
//!
//! Each submodule adds inherent methods to [`DiskCache`](super::DiskCache).

mod clear;
mod get;
mod inspect;
mod remove;
mod set;
