//! # Forum Domain Logic
//!
//! Pure, synchronous decision logic for the CoBoard client. Everything in this
//! module operates on data already fetched from the backend and returns
//! without suspension points; the requesting identity is always an explicit
//! parameter, never ambient state.
//!
//! ## Submodules
//!
//! - [`access`] - Forum access resolution (who may view/join a forum)
//! - [`schedule`] - Topic publish/expiry gating (what is visible, what is locked)
//! - [`slug`] - Forum name to URL slug normalization (the route addressing scheme)
//! - [`filter`] - Listing filters and sort orders for forums and topics
//!
//! Every function here is total over well-formed inputs and idempotent given
//! identical inputs, which keeps the whole layer trivially testable.

pub mod access;
pub mod filter;
pub mod schedule;
pub mod slug;

pub use access::{resolve_access, AccessDecision, Requester, Role};
pub use schedule::TopicWindow;
pub use slug::slugify;
