// Student skill set: snapshot reconciliation, single-skill upserts and listings.

pub mod handlers;
pub mod reconcile;
pub mod service;
pub mod views;
