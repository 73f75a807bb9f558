//! Route handlers for the TaskFlow API.

pub mod health;
pub use self::health::health;

pub mod root;
pub use self::root::{root, test};

pub mod user_register;
pub use self::user_register::register;
