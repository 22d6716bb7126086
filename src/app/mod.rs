// Presentation layer: form state machine, PNG rendering, share links.

pub mod form;
pub mod render;
pub mod share;

pub use form::{submit, FormState, FortuneForm};
