//! Nearest-replica selection and the read/write accessor pair.
//!
//! Every region hosts one replica named `"<prefix><region>"`. Reads go to
//! the replica of the caller's region; writes go to all of them through a
//! [`BroadcastDispatcher`] whose primary is the first region of
//! [`Region::ALL`].

use crate::actors::{ActorDirectory, ReplicaDescriptor};
use crate::broadcast::{BackgroundTasks, BroadcastDispatcher};
use crate::error::ReplicaError;

use super::config::LocatorConfig;
use super::origin::{region_for_code, OriginHint};
use super::Region;

/// Handles for one request: read nearby, write everywhere.
#[derive(Debug)]
pub struct ReadWriteAccessors<H> {
    /// Replica of the caller's region.
    pub reader: H,
    /// Broadcast over every regional replica.
    pub writer: BroadcastDispatcher<H>,
}

/// Maps request origins to regional replicas.
#[derive(Debug, Clone, Default)]
pub struct LocationResolver {
    config: LocatorConfig,
}

impl LocationResolver {
    /// Resolver with the given configuration.
    pub fn new(config: LocatorConfig) -> Self {
        Self { config }
    }

    /// Active configuration.
    pub fn config(&self) -> &LocatorConfig {
        &self.config
    }

    /// Name of the replica hosted in `region`.
    pub fn replica_name(&self, region: Region) -> String {
        format!("{}{}", self.config.name_prefix(), region.code())
    }

    /// Descriptor of the replica hosted in `region`, placed there.
    pub fn regional_descriptor(&self, region: Region) -> ReplicaDescriptor {
        ReplicaDescriptor::named(self.replica_name(region)).placed_in(region)
    }

    /// One descriptor per region, in [`Region::ALL`] order.
    pub fn list_known_regions(&self) -> Vec<ReplicaDescriptor> {
        Region::ALL
            .into_iter()
            .map(|region| self.regional_descriptor(region))
            .collect()
    }

    /// Region containing the request's point of presence.
    ///
    /// Never fails: absent or unknown codes map to the fallback region.
    pub fn classify_origin<O: OriginHint + ?Sized>(&self, origin: &O) -> Region {
        match origin.origin_code() {
            Some(code) => region_for_code(code).unwrap_or_else(|| {
                tracing::debug!(
                    code,
                    fallback = %self.config.fallback_region(),
                    "unknown point of presence, using fallback region"
                );
                self.config.fallback_region()
            }),
            None => self.config.fallback_region(),
        }
    }

    /// Descriptor of the replica nearest to the request.
    pub fn resolve_nearest_descriptor<O: OriginHint + ?Sized>(
        &self,
        origin: &O,
    ) -> ReplicaDescriptor {
        self.regional_descriptor(self.classify_origin(origin))
    }

    /// Resolve the reader and writer for a request. Invokes nothing.
    pub fn read_write_accessors<O, D>(
        &self,
        origin: &O,
        directory: &D,
        tasks: &BackgroundTasks,
    ) -> Result<ReadWriteAccessors<D::Handle>, ReplicaError>
    where
        O: OriginHint + ?Sized,
        D: ActorDirectory + ?Sized,
    {
        let nearest = self.resolve_nearest_descriptor(origin);
        let reader = directory.resolve(&nearest)?;
        let handles = directory.resolve_all(&self.list_known_regions())?;
        let writer = BroadcastDispatcher::new(handles, tasks.clone())?;
        tracing::debug!(
            reader = %nearest,
            replicas = writer.replica_count(),
            "assembled read/write accessors"
        );
        Ok(ReadWriteAccessors { reader, writer })
    }
}

/// [`LocationResolver::list_known_regions`] with the default configuration.
pub fn list_known_regions() -> Vec<ReplicaDescriptor> {
    LocationResolver::default().list_known_regions()
}

/// [`LocationResolver::classify_origin`] with the default configuration.
pub fn classify_origin<O: OriginHint + ?Sized>(origin: &O) -> Region {
    LocationResolver::default().classify_origin(origin)
}

/// [`LocationResolver::resolve_nearest_descriptor`] with the default configuration.
pub fn resolve_nearest_descriptor<O: OriginHint + ?Sized>(origin: &O) -> ReplicaDescriptor {
    LocationResolver::default().resolve_nearest_descriptor(origin)
}

/// [`LocationResolver::read_write_accessors`] with the default configuration.
pub fn read_write_accessors<O, D>(
    origin: &O,
    directory: &D,
    tasks: &BackgroundTasks,
) -> Result<ReadWriteAccessors<D::Handle>, ReplicaError>
where
    O: OriginHint + ?Sized,
    D: ActorDirectory + ?Sized,
{
    LocationResolver::default().read_write_accessors(origin, directory, tasks)
}
