mod json;
mod ron;

pub use self::json::JsonCoder;
pub use self::ron::RonCoder;
