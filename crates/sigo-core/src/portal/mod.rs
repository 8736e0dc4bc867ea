//! View models for the screens shown after login.

mod dashboard;
mod profile;

pub use dashboard::{Dashboard, MenuEntry};
pub use profile::{ProfileForm, Sex, account_rows};
