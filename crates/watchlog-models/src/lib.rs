pub mod movie;
pub mod patch;
pub mod poster;
pub mod session;
pub mod sort;

pub use movie::{Movie, MovieId, NewMovie};
pub use patch::MoviePatch;
pub use poster::PosterSource;
pub use session::{Session, UserId};
pub use sort::SortMode;
