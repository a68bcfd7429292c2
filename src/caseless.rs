//! Main module for caseless maps

pub mod attr;
pub mod cases;
pub mod error;
pub mod key;
pub mod map;
pub mod normalizer;
pub mod settings;
pub mod source;
