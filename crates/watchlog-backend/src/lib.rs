pub mod error;
pub mod supabase;
pub mod traits;

pub use error::BackendError;
pub use supabase::SupabaseClient;
pub use traits::{IdentityService, InsertOutcome, MovieStore, ObjectStore};
