//! State shared by every entity kind.

use std::fmt;
use std::sync::OnceLock;

use super::SchemaId;
use super::tracker::{UpdateFlags, UpdateTracker};
use crate::error::{MeshError, MeshResult};
use crate::mesh::ImportSettings;
use crate::store::{AttributeStore, Time, TimeRange, ValueRef};

/// Identity, hierarchy links, attribute store and update tracking of an
/// entity.
pub struct SchemaCore {
    id: SchemaId,
    name: String,
    path: String,
    parent: Option<SchemaId>,
    children: Vec<SchemaId>,
    store: Box<dyn AttributeStore>,
    tracker: UpdateTracker,
    time_range: OnceLock<Option<TimeRange>>,
}

impl fmt::Debug for SchemaCore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaCore")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

impl SchemaCore {
    pub(crate) fn new(
        id: SchemaId,
        name: &str,
        path: String,
        parent: Option<SchemaId>,
        store: Box<dyn AttributeStore>,
    ) -> Self {
        Self {
            id,
            name: name.to_string(),
            path,
            parent,
            children: Vec::new(),
            store,
            tracker: UpdateTracker::new(),
            time_range: OnceLock::new(),
        }
    }

    pub fn id(&self) -> SchemaId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full path, e.g. `/Root/Mesh`.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn parent(&self) -> Option<SchemaId> {
        self.parent
    }

    pub fn children(&self) -> &[SchemaId] {
        &self.children
    }

    pub(crate) fn add_child(&mut self, child: SchemaId) {
        self.children.push(child);
    }

    pub fn store(&self) -> &dyn AttributeStore {
        &*self.store
    }

    pub fn tracker(&self) -> &UpdateTracker {
        &self.tracker
    }

    /// Time range of all samples, cached until the entity is written.
    pub fn time_range(&self) -> Option<TimeRange> {
        *self.time_range.get_or_init(|| self.store.time_range())
    }

    pub(crate) fn begin_update(&mut self, t: Time) -> UpdateFlags {
        let range = self.time_range();
        self.tracker.begin_update(t, range)
    }

    /// Mark the entity's variant selection as changed. The next update
    /// resamples and re-reads topology and attribute facts.
    pub(crate) fn notify_variant_set_changed(&mut self) {
        self.tracker.notify(UpdateFlags::VARIANT_SET_CHANGED);
        self.invalidate();
    }

    /// Forget cached time data so the next update resamples.
    pub(crate) fn invalidate(&mut self) {
        self.tracker.invalidate();
        self.time_range.take();
    }

    pub(crate) fn apply_import_settings(&mut self, settings: &ImportSettings) {
        self.store.apply_import_settings(settings);
        self.tracker.notify(UpdateFlags::IMPORT_SETTINGS_CHANGED);
        self.invalidate();
    }

    /// Write through the store, mapping a refusal to an error.
    pub(crate) fn write(&mut self, name: &str, src: ValueRef<'_>, t: Time) -> MeshResult<()> {
        if self.store.write(name, src, t) {
            Ok(())
        } else {
            log::warn!("{}: store rejected {name} at {t}", self.path);
            Err(MeshError::WriteRejected {
                attribute: name.to_string(),
                time: t,
            })
        }
    }
}
