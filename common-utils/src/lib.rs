//! # Common utils
//!
//! This library provides the date, file and parsing functionality shared by the synthetic traffic tooling.

pub mod date_utils;
pub mod file_utils;
pub mod parsing_utils;
