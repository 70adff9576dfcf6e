//! CLI infrastructure for the smartcab toolkit
//!
//! This module provides the command-line interface for training, evaluating,
//! and comparing driving agents.

pub mod commands;
