//! Extraction over a built document.
//!
//! # Module Structure
//!
//! - `text`: one entry per text node under each selected node
//! - `links`: `src`/`href` values of every element, `src` first
//! - `postprocess`: optional crawler-style cleanup of the produced lines
//!
//! Both extraction modes are single-pass, stateless walks over an immutable
//! [`Document`](crate::dom::Document).

pub mod links;
pub mod postprocess;
pub mod text;

pub use links::{collect_links, link_of};
pub use text::collect_text;
