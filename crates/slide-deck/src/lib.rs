//! Turns a proposal's rich-text HTML into an ordered deck of slides.
//!
//! [`segment`] is the entry point. It never fails: blank input gives an empty
//! deck and anything it cannot split becomes a single page.
pub mod category;
pub mod error;
pub mod model;
pub mod navigation;
pub(crate) mod scan;
pub mod segment;

pub use category::{categorize, CategoryRules};
pub use error::DeckError;
pub use model::{Category, Page, Strategy};
pub use navigation::{Navigator, Progress};
pub use segment::{segment, Segmenter};
