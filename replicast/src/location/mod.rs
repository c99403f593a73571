//! Location resolution: which regional replica serves a request.
//!
//! ```text
//! request ──origin_code──► POP table ──► Region ──► "global-<region>"
//!   (e.g. "FRA")                          (weur)      placed in weur
//! ```
//!
//! Unknown or missing origin codes are not errors; they resolve to the
//! configured fallback region.

mod config;
mod origin;
mod region;
mod resolver;

pub use config::{LocatorConfig, LocatorConfigBuilder, DEFAULT_NAME_PREFIX};
pub use origin::{region_for_code, OriginHint, RequestOrigin};
pub use region::Region;
pub use resolver::{
    classify_origin, list_known_regions, read_write_accessors, resolve_nearest_descriptor,
    LocationResolver, ReadWriteAccessors,
};
