//! In-memory attribute store.
//!
//! A [`MemoryStage`] holds every prim's attributes behind one shared lock.
//! Each prim is addressed through a [`MemoryPrim`] handle, which is what an
//! entity owns as its [`AttributeStore`].

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::{AttributeStore, AttributeValue, Time, TimeRange, ValueMut, ValueRef};
use crate::context::Context;
use crate::error::MeshResult;
use crate::mesh::ImportSettings;
use crate::schema::{SchemaId, SchemaKind};

/// How values between two time samples are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum Interpolation {
    /// Use the sample at or before the requested time.
    Held,
    /// Blend float values between the surrounding samples.
    #[default]
    Linear,
}

#[derive(Debug, Default)]
struct Track {
    default: Option<AttributeValue>,
    /// Sorted by time.
    samples: Vec<(Time, AttributeValue)>,
}

impl Track {
    fn set(&mut self, t: Time, value: AttributeValue) {
        if t.is_nan() {
            self.default = Some(value);
            return;
        }
        match self.samples.binary_search_by(|(st, _)| st.total_cmp(&t)) {
            Ok(i) => self.samples[i].1 = value,
            Err(i) => self.samples.insert(i, (t, value)),
        }
    }

    fn has_value(&self) -> bool {
        self.default.is_some() || !self.samples.is_empty()
    }

    fn sample(&self, t: Time, interpolation: Interpolation, dst: ValueMut<'_>) -> bool {
        if t.is_nan() || self.samples.is_empty() {
            let value = self
                .default
                .as_ref()
                .or_else(|| self.samples.first().map(|(_, v)| v));
            return value.is_some_and(|v| v.read_into(dst));
        }

        let upper = self.samples.partition_point(|(st, _)| *st <= t);
        if upper == 0 {
            return self.samples[0].1.read_into(dst);
        }
        let (t0, v0) = &self.samples[upper - 1];
        if upper == self.samples.len() || *t0 == t || interpolation == Interpolation::Held {
            return v0.read_into(dst);
        }
        let (t1, v1) = &self.samples[upper];
        let w = ((t - t0) / (t1 - t0)) as f32;
        v0.lerp_into(v1, w, dst)
    }

    fn range(&self) -> Option<TimeRange> {
        let (first, _) = self.samples.first()?;
        let (last, _) = self.samples.last()?;
        Some(TimeRange::new(*first, *last))
    }
}

#[derive(Debug)]
struct PrimRecord {
    path: String,
    kind: SchemaKind,
    attributes: HashMap<String, Track>,
}

#[derive(Debug, Default)]
struct StageData {
    prims: Vec<PrimRecord>,
    interpolation: Interpolation,
    read_only: bool,
}

/// Shared in-memory storage for a tree of prims.
///
/// Cloning a stage clones the handle, not the data.
#[derive(Debug, Clone, Default)]
pub struct MemoryStage {
    data: Arc<RwLock<StageData>>,
}

impl MemoryStage {
    /// Create an empty stage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the prim at `path`, defining it if it does not exist yet.
    pub fn define_prim(&self, path: &str, kind: SchemaKind) -> MemoryPrim {
        let mut data = self.data.write();
        if let Some(index) = data.prims.iter().position(|p| p.path == path) {
            if data.prims[index].kind != kind {
                log::warn!(
                    "prim {path} already defined as {:?}, keeping it",
                    data.prims[index].kind
                );
            }
            return MemoryPrim {
                stage: self.clone(),
                index,
            };
        }
        data.prims.push(PrimRecord {
            path: path.to_string(),
            kind,
            attributes: HashMap::new(),
        });
        log::trace!("defined {kind:?} prim {path}");
        MemoryPrim {
            stage: self.clone(),
            index: data.prims.len() - 1,
        }
    }

    /// Look up an existing prim.
    pub fn prim(&self, path: &str) -> Option<MemoryPrim> {
        let data = self.data.read();
        let index = data.prims.iter().position(|p| p.path == path)?;
        Some(MemoryPrim {
            stage: self.clone(),
            index,
        })
    }

    /// Number of defined prims.
    pub fn prim_count(&self) -> usize {
        self.data.read().prims.len()
    }

    /// Interpolation used for reads between samples.
    pub fn interpolation(&self) -> Interpolation {
        self.data.read().interpolation
    }

    pub fn set_interpolation(&self, interpolation: Interpolation) {
        self.data.write().interpolation = interpolation;
    }

    /// Make every subsequent write fail.
    pub fn set_read_only(&self, read_only: bool) {
        self.data.write().read_only = read_only;
    }

    /// Define a prim for a new entity and register the entity in `ctx`.
    pub fn create_schema(
        &self,
        ctx: &mut Context,
        kind: SchemaKind,
        parent: Option<SchemaId>,
        name: &str,
    ) -> MeshResult<SchemaId> {
        let path = ctx.make_path(parent, name)?;
        let prim = self.define_prim(&path, kind);
        ctx.create_schema(kind, parent, name, Box::new(prim))
    }

    /// Create an entity in `ctx` for every prim not already present there.
    ///
    /// Parents are resolved by path prefix. Returns the number of entities
    /// created.
    pub fn populate(&self, ctx: &mut Context) -> MeshResult<usize> {
        let prims: Vec<(String, SchemaKind)> = self
            .data
            .read()
            .prims
            .iter()
            .map(|p| (p.path.clone(), p.kind))
            .collect();

        let mut created = 0;
        for (index, (path, kind)) in prims.into_iter().enumerate() {
            if ctx.find_by_path(&path).is_some() {
                continue;
            }
            let (parent_path, name) = path.rsplit_once('/').unwrap_or(("", path.as_str()));
            let parent = if parent_path.is_empty() {
                None
            } else {
                ctx.find_by_path(parent_path)
            };
            let prim = MemoryPrim {
                stage: self.clone(),
                index,
            };
            ctx.create_schema(kind, parent, name, Box::new(prim))?;
            created += 1;
        }
        log::debug!("populated {created} entities from memory stage");
        Ok(created)
    }
}

/// Handle to one prim of a [`MemoryStage`].
#[derive(Debug, Clone)]
pub struct MemoryPrim {
    stage: MemoryStage,
    index: usize,
}

impl MemoryPrim {
    /// Full path of the prim.
    pub fn path(&self) -> String {
        self.stage.data.read().prims[self.index].path.clone()
    }

    pub fn kind(&self) -> SchemaKind {
        self.stage.data.read().prims[self.index].kind
    }

    /// The stage this prim belongs to.
    pub fn stage(&self) -> &MemoryStage {
        &self.stage
    }

    /// Time samples authored for attribute `name`, in order.
    pub fn sample_times(&self, name: &str) -> Vec<Time> {
        let data = self.stage.data.read();
        data.prims[self.index]
            .attributes
            .get(name)
            .map(|track| track.samples.iter().map(|(t, _)| *t).collect())
            .unwrap_or_default()
    }
}

impl AttributeStore for MemoryPrim {
    fn read(&self, name: &str, t: Time, dst: ValueMut<'_>) -> bool {
        let data = self.stage.data.read();
        let Some(track) = data.prims[self.index].attributes.get(name) else {
            return false;
        };
        track.sample(t, data.interpolation, dst)
    }

    fn write(&mut self, name: &str, src: ValueRef<'_>, t: Time) -> bool {
        let mut data = self.stage.data.write();
        if data.read_only {
            return false;
        }
        let track = data.prims[self.index]
            .attributes
            .entry(name.to_string())
            .or_default();
        let existing = track
            .samples
            .first()
            .map(|(_, v)| v)
            .or(track.default.as_ref())
            .map(AttributeValue::type_name);
        let incoming = src.to_owned_value();
        if let Some(existing) = existing.filter(|&e| e != incoming.type_name()) {
            log::warn!(
                "attribute {name} holds {existing}, refusing {}",
                incoming.type_name()
            );
            return false;
        }
        track.set(t, incoming);
        true
    }

    fn has_value(&self, name: &str) -> bool {
        let data = self.stage.data.read();
        data.prims[self.index]
            .attributes
            .get(name)
            .is_some_and(Track::has_value)
    }

    fn might_vary_over_time(&self, name: &str) -> bool {
        let data = self.stage.data.read();
        data.prims[self.index]
            .attributes
            .get(name)
            .is_some_and(|track| track.samples.len() > 1)
    }

    fn time_range(&self) -> Option<TimeRange> {
        let data = self.stage.data.read();
        data.prims[self.index]
            .attributes
            .values()
            .filter_map(Track::range)
            .reduce(TimeRange::union)
    }

    fn apply_import_settings(&mut self, settings: &ImportSettings) {
        self.stage.set_interpolation(settings.interpolation);
    }
}
