pub mod error;
pub mod lenient;
pub mod post;
