mod geometry;
mod palette;

pub use geometry::{
    Level, Linedef, LinedefFlags, LinedefId, Sector, SectorId, Sidedef, SidedefId, Thing, Vertex,
    VertexId,
};

pub use palette::Palette;
