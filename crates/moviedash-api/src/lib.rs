//! API client library for moviedash.
//!
//! Provides clients for the OMDb and JustWatch APIs, the normalizers that
//! turn their responses into display tables, and outbound link building.

/// JustWatch API client and offer normalizer.
pub mod justwatch;

/// Outbound links to movie pages on third-party sites.
pub mod links;

/// OMDb API client and metadata normalizer.
pub mod omdb;
