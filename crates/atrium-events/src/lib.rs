//! Atrium Observable Values
//!
//! Small synchronous publish-subscribe primitive: a current value plus
//! registered change listeners, with drop-to-unsubscribe handles.

mod observable;

pub use observable::{Observable, Subscription};
