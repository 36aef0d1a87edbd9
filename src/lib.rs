//! Core library for the suivi-tools command line application.
//!
//! The library turns the designers' tracking workbook (one sheet per
//! designer plus archive, franchise and project sheets) into a normalised
//! workbook with four uniform tables. IO adapters live under
//! [`suivi::tools::io`], record types inside [`suivi::tools::model`], the
//! reshaping rules in [`suivi::tools::normalize`], and the end-to-end
//! orchestration under [`suivi::tools::pipeline`].

pub mod suivi;

pub use suivi::tools::{
    Result, ToolError, dates, error, inspect, io, model, normalize, pipeline, roster, status,
};
