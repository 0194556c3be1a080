pub mod extractor;
pub mod jwt;
pub mod locks;
pub mod parameter_error_handler;

pub use extractor::SafeIDI64;
pub use locks::KeyedLocks;
pub use parameter_error_handler::json_error_handler;
pub use parameter_error_handler::query_error_handler;
