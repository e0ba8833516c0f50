//! Shared types used by both the protocol layer and the tool layer.

pub mod tool;
