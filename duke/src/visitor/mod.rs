//! The visitor traits a class is read into and written from.
//!
//! Each visitor may have a delegate, the next visitor in the chain. All the methods that have a default
//! implementation forward to that delegate, so a visitor in the middle of the chain only needs to implement
//! the methods for the events it wants to change.

mod implementations;

pub mod class;
pub mod method;
