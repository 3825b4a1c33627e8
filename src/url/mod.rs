//! URL helpers for seed handling
//!
//! Domain extraction and wildcard matching back `allowed_domains`; link
//! resolution turns menu hrefs into absolute seed URLs.

mod domain;
mod links;

pub use domain::{domain_of, extract_domain, matches_wildcard};
pub use links::resolve_link;
