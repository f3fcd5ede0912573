pub mod fields;
pub mod models;

pub use fields::*;
pub use models::*;
