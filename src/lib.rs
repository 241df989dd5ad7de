//! Fortune Calendar - Saju and astrology daily fortune engine
//!
//! This crate grades calendar days against a natal four-pillars chart, finds
//! windows for life events, and summarizes multi-year trends keyed to Daeun
//! cycles. Astrology enters through injected transit snapshots.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
