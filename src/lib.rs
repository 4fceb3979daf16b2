//! Core library for the shopify-import command line application.
//!
//! The library turns a flat Shopify product export, where every variant of a
//! product occupies its own row, into one record per product carrying its
//! variants as `|`-joined columns. IO adapters live under
//! [`shopify::import::io`], row and record types inside
//! [`shopify::import::model`], the grouping fold in
//! [`shopify::import::aggregate`], and the read/aggregate/write orchestration
//! under [`shopify::import::sync`].

pub mod shopify;

pub use shopify::import::{ImportError, Result, aggregate, error, io, model, sync};
