//! Domain models for the storefront.

pub mod cart;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use cart::{Cart, CartItem};
pub use order::{Order, OrderItem};
pub use product::Product;
pub use session::{CurrentUser, session_keys};
pub use user::User;
