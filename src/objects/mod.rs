pub mod catalog;
pub mod placement;
pub mod registry;

pub use catalog::{ObjectCatalog, ObjectType};
pub use placement::{ARMY_ZONE_RADIUS, NEUTRAL_ARMY, ObjectPlacer, place_armies};
pub use registry::ObjectRegistry;
