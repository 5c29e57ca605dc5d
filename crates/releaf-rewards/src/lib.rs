//! Carbon-credit scoring pipeline for the ReLeaf platform.
//!
//! The crate turns a user-submitted post (image reference plus metadata) into
//! a carbon-credit point value. The pipeline fetches the image, extracts a
//! color-based feature vector, classifies it into a greenness category, and
//! maps the category to points. Every downstream failure after request
//! validation degrades to a safe fallback value instead of an error, so the
//! caller always receives a usable answer.

pub mod config;
pub mod error;
pub mod rewards;
pub mod telemetry;
