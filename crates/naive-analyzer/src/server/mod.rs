pub(crate) mod handler;
pub(crate) mod state;

pub use state::NaiveLanguageServer;
