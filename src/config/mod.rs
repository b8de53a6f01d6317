//! all logic related to instantiating a running configuration

mod container;
mod utils;

pub use self::container::Configuration;
