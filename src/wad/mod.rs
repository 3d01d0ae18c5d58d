mod level;
mod loader;
mod raw;

pub use level::{LevelError, RawLevel};
pub use loader::{LoadError, load_level, load_palette};
pub use raw::{LumpInfo, Wad, WadError, WadKind};
