//! hb-core: selectable-power menu engine
//!
//! Everything needed to let a player pick a spell, racial power, blue-magic
//! imitation, eaten device, smith essence or item from a lettered list and
//! then attempt it. The crate has no terminal dependency; drawing and key
//! reading go through the [`io::Ui`] trait.

pub mod catalog;
pub mod chance;
pub mod confirm;
pub mod dispatch;
pub mod errors;
pub mod game;
pub mod io;
pub mod options;
pub mod player;
pub mod render;
pub mod repeat;
pub mod rng;
pub mod selection;
pub mod tags;
pub mod testing;

pub use catalog::{PowerCatalog, PowerDescriptor, PowerSource};
pub use dispatch::{Dispatcher, UseOutcome};
pub use errors::{OptionsError, UiError};
pub use game::{GameState, Session};
pub use options::UiOptions;
pub use player::PlayerState;
pub use selection::{NavigationMode, Selection, SelectionConfig, SelectionMachine};
