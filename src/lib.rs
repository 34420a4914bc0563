//! Choice Tree - decision tree engine
//!
//! Turns a situation and an intended action into a tree of possible
//! outcomes, lays the tree out on a 2-D canvas, and tracks the interaction
//! state (selection, editing, generation in flight) as the user explores it.

pub mod adapters;
pub mod application;
pub mod bootstrap;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
