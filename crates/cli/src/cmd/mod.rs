mod bind;
mod env;
mod info;

pub use bind::{BindArgs, cmd_bind_python};
pub use env::cmd_env;
pub use info::cmd_info;
