//! Package registry access

pub mod npm;

pub use npm::RegistryClient;
