//! Validation and normalization of Parca scrape targets.
//!
//! The entry point is [`scrape::evaluate`], which turns the raw, user supplied
//! options into a [`scrape::Evaluation`]: the scrape job to publish (if any)
//! together with the diagnostics needed to compute a [`status::Status`].
//! Publishing the result is left to a host, see [`relation::update`].

pub mod config;
pub mod parser;
pub mod prometheus;
pub mod relation;
pub mod scrape;
pub mod status;
pub mod tls;
pub mod topology;
