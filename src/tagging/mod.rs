//! Automatic tagging
//!
//! Expands a seed into one seed per link of the site's own navigation menu,
//! tagging each link with the seed's tags plus the tags of its menu section.

mod expander;

pub use expander::{merge_tags, AutomaticTagExpander};
