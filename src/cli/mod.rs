mod commands;
mod handlers;

pub use commands::{AddArgs, Cli, Commands, EditArgs};
pub use handlers::{
    handle_add, handle_delete, handle_edit, handle_get, handle_init, handle_list, handle_lock,
    handle_status, handle_unlock, init_logging,
};
