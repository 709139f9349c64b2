pub mod audio;
pub mod backend;
pub mod errors;
pub mod filters;
pub mod fulfillment;
pub mod lookup;
pub mod models;
pub mod progress;
pub mod repair;
pub mod repo;
pub mod snapshot;
pub mod stats;
pub mod tutor;

pub use backend::*;
pub use errors::*;
pub use filters::*;
pub use fulfillment::*;
pub use lookup::*;
pub use models::*;
pub use progress::{apply_action, ProgressAction};
pub use repair::*;
pub use repo::*;
pub use snapshot::*;
pub use stats::*;
