//! Domain types shared across shopsync components.

mod cart;
mod catalog;
mod id;
mod user;

pub use cart::CartItem;
pub use catalog::{
    ALL_CATEGORIES, Category, CategoryChanges, DEFAULT_CATEGORY_ID, DEFAULT_CATEGORY_NAME, Product,
};
pub use id::{LOCAL_ID_PREFIX, is_local_id, local_id};
pub use user::{AuthTokens, CreateUserInput, UpdateUserInput, User};
