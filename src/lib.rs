pub mod core;
pub mod db;
pub mod password;
pub mod redirect;
pub mod util;

pub use crate::password::{generate_default_password, generate_password, PasswordError, PasswordGenerator};
pub use crate::redirect::{RedirectPolicy, RedirectRequest, SafeRedirectChecker};
