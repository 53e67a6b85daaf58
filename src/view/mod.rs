//! Terminal presentation of the tracker.
//!
//! Rendering functions are pure: they take the items and "today" and return
//! strings. Nothing in here mutates the inventory; edits flow back through
//! [`crate::app::App`].

mod chrome;
mod form;
mod list;
mod modal;

pub use chrome::{footer, header, APP_TITLE};
pub use form::{FormMode, ItemForm};
pub use list::{badge, render_item, render_list, render_summary, Palette};
pub use modal::Modal;
