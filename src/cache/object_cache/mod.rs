pub mod moka;

pub use moka::MokaCacheWrapper;
