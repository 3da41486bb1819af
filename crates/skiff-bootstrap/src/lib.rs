//! Skiff Bootstrap: relay bootstrap fragment handling.
//!
//! Responsibilities:
//! - transcoding between the URL-safe and standard base64 alphabets,
//!   restoring stripped padding
//! - recovering a relay endpoint descriptor from a URL fragment, in either
//!   the legacy `@host[:port]` grammar or the base64url JSON form

pub mod base64url;
pub mod fragment;

pub use base64url::CodecError;
pub use fragment::{parse, FragmentError, RelayEndpoint};
