//! SMS webhook boundary for menucheck
//!
//! - **Inbound** (`inbound`) - webhook payload fields and the `query @ location` split
//! - **TwiML** (`twiml`) - `<Response><Message>` reply encoding
//! - **Router** (`router`) - runs a menu check for one inbound text and builds the reply
//!
//! # Flow
//!
//! ```text
//! Twilio webhook → InboundSms → MenuQuery → MenuCheckService → MenuReply
//!                                                  ↓
//!                         MessagingResponse ← cap_reply
//! ```
//!
//! Reply truncation happens once, in the router, right before encoding.

pub mod inbound;
pub mod router;
pub mod twiml;
