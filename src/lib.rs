//! # Parrot Shop
//!
//! Client core of a parrot breeding shop: bird records, the sale and
//! breeding lifecycles, incubation tracking, share links and statistics,
//! all backed by the shop REST API.

pub mod action;
pub mod api;
pub mod config;
pub mod consts;
pub mod front;
pub mod logger;
pub mod metric;
pub mod models;
pub mod repo;
