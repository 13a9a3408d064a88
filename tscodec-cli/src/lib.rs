//! Command implementations behind the `tscodec` binary, exposed for testing.

pub mod config;
pub mod convert;
pub mod diff;
pub mod edit;
pub mod extract;
pub mod import;
pub mod lookup;
pub mod normalize;
pub mod path_glob;
pub mod stats;
pub mod update;
pub mod validate;
pub mod validation;
pub mod view;

pub use config::Config;
