//! Locus Core
//!
//! Parsing of AWS DataSync location URIs and ARNs, plus the resource state
//! model shared by providers

pub mod arn;
pub mod location;
pub mod provider;
pub mod resource;
pub mod uri;
