pub mod config;
pub mod db;
pub mod error;
pub mod user;

pub use error::StoreError;
pub use user::model::{NewUser, User, UserChanges};
pub use user::store::UserStore;
