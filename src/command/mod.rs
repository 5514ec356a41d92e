mod explain;
mod login;
mod logout;
pub(crate) mod output;
mod status;

pub use explain::Explain;
pub use login::Login;
pub use logout::Logout;
pub use output::RipplingOutput;
pub use status::Status;
