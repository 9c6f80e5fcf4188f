//! Chorewheel - Family Chore Scheduling and Rewards
//!
//! This crate turns recurring chore templates into dated task instances,
//! drives each instance through a completion/verification state machine,
//! and converts verified work into a points ledger exactly once.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
