#![warn(missing_docs)]
#![doc = include_str!("../README.md")]
//!
//! ## Entry points
//!
//! Regexes are built from the leaf constructors [`eps`], [`fail`], [`sym`],
//! [`psym`], [`msym`], [`any_sym`], [`pure`] and [`string`], composed with
//! the methods on [`Regex`] (and the free function [`app`]), and run with
//! [`Regex::match_iter`] or incrementally through a [`Matcher`].

mod compile;
mod matcher;
mod regex;
mod value;

pub use compile::ThreadId;
pub use matcher::Matcher;
pub use regex::{any_sym, app, eps, fail, msym, psym, pure, string, sym, Greediness, Regex};
