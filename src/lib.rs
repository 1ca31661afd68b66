//! Comparison plots for cosmological transfer functions.
//!
//! * [`data`] – whitespace table loading, series, normalization and ratios
//! * [`plot`] – figure description and PNG rendering
//! * [`compare`] – the two command-line pipelines
//! * [`sample`] – synthetic input tables

pub mod compare;
pub mod data;
pub mod plot;
pub mod sample;
