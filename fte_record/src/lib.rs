//! Record-layer framing on top of a DFA-ranked language: capacity
//! negotiation, the AE tail, and the encrypted covertext header.
//!
//! See spec.md §4.3 for the algorithmic contract this module implements.

mod codec;
mod error;
mod header;

pub use codec::{
    Codec,
    RecordConfig,
};
pub use error::{
    DecodeReason,
    Error,
};
pub use header::{
    fresh_padding,
    AeadHeader,
    Aes128Header,
    IdentityHeader,
};
