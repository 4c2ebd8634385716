pub mod alias;
pub mod block;
pub mod debug;
pub mod error;
pub mod mapping;
pub mod plugin;
pub mod populator;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod settings;

pub use alias::AliasResolver;
pub use block::{BlockState, BlockTrait, BlockType, Namespace, PopulatorType};
pub use error::{LoadIssue, LoadReport, SwapError};
pub use plugin::SwapPlugin;
pub use populator::{ReplacementEntry, ReplacementResolver};
