//! Core domain types shared by every dispatch component

pub mod error;
