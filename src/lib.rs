//! Attendee reports for Eventbrite events.
//!
//! The reconciliation core ([`identity`], [`questions`], [`roster`],
//! [`attendance`]) is pure and network-free; [`infra::eventbrite`] supplies
//! registrations and [`output`] / [`pdf`] / [`badges`] write the results.

pub mod attendance;
pub mod badges;
pub mod fetch;
pub mod identity;
pub mod infra;
pub mod output;
pub mod pdf;
pub mod questions;
pub mod registration;
pub mod roster;
pub mod services;
