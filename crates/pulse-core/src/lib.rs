pub mod audio;
pub mod bridge;
pub mod config;
pub mod constants;
pub mod energy;
pub mod envelope;
pub mod error;
pub mod field;
pub mod impulse;
pub mod motion;
pub mod phase;
pub mod stage;
pub mod transient;

pub use audio::*;
pub use bridge::*;
pub use config::*;
pub use constants::*;
pub use energy::*;
pub use envelope::*;
pub use error::*;
pub use field::*;
pub use impulse::*;
pub use motion::*;
pub use phase::*;
pub use stage::*;
pub use transient::*;
