//! Transformation requests and their provider encodings.
//!
//! - **Parameters**: [`TransformationRequest`] and its field types
//! - **Encoding**: [`encode`] spells a request for one [`Convention`]

mod encode;
mod params;

pub use encode::{Convention, encode};
pub use params::{Fit, Format, Gravity, Quality, TransformationRequest};
