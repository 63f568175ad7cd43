//! Monthly 24/7 shift roster optimizer for guarded posts.
//!
//! This crate plans one calendar month of round-the-clock coverage for a
//! fixed set of posts, assigning every generated shift slot to exactly one
//! employee while minimising an ordered hierarchy of labour-cost drivers:
//! overtime first, then holiday and Sunday surcharge exposure, then night
//! hours. Shifts that cross midnight are decomposed onto the calendar
//! dates they touch so payroll surcharges stay bit-exact.

#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod models;
pub mod schedule;
pub mod solver;
pub mod verify;
