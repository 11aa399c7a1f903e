pub mod app;
pub mod cache;
pub mod coordinator;
pub mod intent;
pub mod session;

pub use app::WatchlistApp;
pub use cache::{MovieCache, WatchlistView};
pub use coordinator::{CreateOutcome, MutationCoordinator};
pub use intent::{ActionOutcome, UserIntent};
pub use session::WatchlistSession;
pub use watchlog_backend::BackendError;
