//! CLI command handlers.

mod books;
mod download;
mod init;
mod update;
mod url;

pub use books::{run_add_command, run_list_command, run_remove_command};
pub use download::run_download_command;
pub use init::run_init_command;
pub use update::run_update_command;
pub use url::run_url_command;
