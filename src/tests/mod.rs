//! Test suite for the block code generator
//!
//! This module organizes tests into logical groups: the kind registry, the
//! workspace graph, end-to-end generation, properties and service hand-off.

#[cfg(test)]
mod generator_tests;
