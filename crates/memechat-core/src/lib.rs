pub mod config;
pub mod error;
pub mod fallback;
pub mod grouping;
pub mod history;
pub mod media;
pub mod mock;
pub mod orchestrator;
pub mod random;
pub mod session;
pub mod tone;

pub use config::*;
pub use error::*;
pub use fallback::*;
pub use grouping::*;
pub use history::*;
pub use media::*;
pub use orchestrator::*;
pub use random::*;
pub use session::*;
