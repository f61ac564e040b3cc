//! Route handlers

pub mod efficiency;
pub mod interlock;
pub mod trust;
