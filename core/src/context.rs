//! Entity collection and batch updates.

use std::collections::HashMap;

use rayon::prelude::*;

use crate::error::{MeshError, MeshResult};
use crate::mesh::{ExportSettings, ImportSettings, MeshData};
use crate::schema::{Mesh, Schema, SchemaCore, SchemaId, SchemaKind};
use crate::store::{AttributeStore, Time};

/// Number of chunks [`Context::update_all_samples`] aims for.
const UPDATE_CHUNKS: usize = 32;

/// Owns all entities of one scene along with the settings they are sampled
/// and written with.
#[derive(Debug, Default)]
pub struct Context {
    schemas: Vec<Schema>,
    index: HashMap<SchemaId, usize>,
    id_seed: u32,
    import_settings: ImportSettings,
    export_settings: ExportSettings,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn import_settings(&self) -> &ImportSettings {
        &self.import_settings
    }

    /// Replace the import settings and tell every entity to resample.
    pub fn set_import_settings(&mut self, settings: ImportSettings) {
        if settings == self.import_settings {
            return;
        }
        for schema in &mut self.schemas {
            schema.core_mut().apply_import_settings(&settings);
        }
        log::debug!("import settings changed: {settings:?}");
        self.import_settings = settings;
    }

    pub fn export_settings(&self) -> &ExportSettings {
        &self.export_settings
    }

    pub fn set_export_settings(&mut self, settings: ExportSettings) {
        self.export_settings = settings;
    }

    /// Path of a new child `name` under `parent`.
    ///
    /// Characters other than ASCII letters and digits are replaced by `_`.
    pub fn make_path(&self, parent: Option<SchemaId>, name: &str) -> MeshResult<String> {
        let sanitized: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        let parent_path = match parent {
            Some(id) => self.get(id)?.path(),
            None => "",
        };
        Ok(format!("{parent_path}/{sanitized}"))
    }

    /// Add an entity of `kind` reading from and writing to `store`.
    pub fn create_schema(
        &mut self,
        kind: SchemaKind,
        parent: Option<SchemaId>,
        name: &str,
        store: Box<dyn AttributeStore>,
    ) -> MeshResult<SchemaId> {
        let path = self.make_path(parent, name)?;
        self.id_seed += 1;
        let id = SchemaId(self.id_seed);

        if let Some(parent) = parent {
            self.get_mut(parent)?.core_mut().add_child(id);
        }
        let core = SchemaCore::new(id, name, path, parent, store);
        log::trace!("created {kind:?} {}", core.path());

        self.index.insert(id, self.schemas.len());
        self.schemas.push(Schema::new(kind, core));
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }

    /// All entities in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.schemas.iter()
    }

    fn index_of(&self, id: SchemaId) -> MeshResult<usize> {
        self.index
            .get(&id)
            .copied()
            .ok_or(MeshError::UnknownSchema(id))
    }

    pub fn get(&self, id: SchemaId) -> MeshResult<&Schema> {
        Ok(&self.schemas[self.index_of(id)?])
    }

    pub fn get_mut(&mut self, id: SchemaId) -> MeshResult<&mut Schema> {
        let index = self.index_of(id)?;
        Ok(&mut self.schemas[index])
    }

    pub fn find_by_path(&self, path: &str) -> Option<SchemaId> {
        self.schemas
            .iter()
            .find(|s| s.path() == path)
            .map(Schema::id)
    }

    pub fn children(&self, id: SchemaId) -> MeshResult<&[SchemaId]> {
        Ok(self.get(id)?.core().children())
    }

    pub fn mesh(&self, id: SchemaId) -> MeshResult<&Mesh> {
        let schema = self.get(id)?;
        schema.as_mesh().ok_or(MeshError::KindMismatch {
            id,
            expected: SchemaKind::Mesh,
            actual: schema.kind(),
        })
    }

    pub fn mesh_mut(&mut self, id: SchemaId) -> MeshResult<&mut Mesh> {
        let index = self.index_of(id)?;
        mesh_of(&mut self.schemas[index], id)
    }

    /// Update every entity to time `t` on the rayon thread pool.
    ///
    /// Entities are processed in contiguous chunks, sequentially within a
    /// chunk. No order between entities is guaranteed.
    pub fn update_all_samples(&mut self, t: Time) {
        crate::profile_function!();

        let settings = &self.import_settings;
        let grain = (self.schemas.len() / UPDATE_CHUNKS).max(1);
        self.schemas.par_chunks_mut(grain).for_each(|chunk| {
            for schema in chunk {
                schema.update_sample(t, settings);
            }
        });
        log::debug!("updated {} entities at {t}", self.schemas.len());
    }

    /// Force every entity to resample on its next update.
    pub fn invalidate_all_samples(&mut self) {
        for schema in &mut self.schemas {
            schema.invalidate_sample();
        }
    }

    /// Tell entity `id` its variant selection changed.
    pub fn notify_variant_set_changed(&mut self, id: SchemaId) -> MeshResult<()> {
        self.get_mut(id)?.notify_variant_set_changed();
        Ok(())
    }

    /// Update mesh `id` to `t` with the context's import settings and copy
    /// its front frame into `dst`.
    pub fn read_mesh_sample(&mut self, id: SchemaId, t: Time, dst: &mut MeshData) -> MeshResult<()> {
        let index = self.index_of(id)?;
        let mesh = mesh_of(&mut self.schemas[index], id)?;
        mesh.read_sample_into(t, &self.import_settings, dst)
    }

    /// Write `data` to mesh `id` at `t` with the context's export settings.
    pub fn write_mesh_sample(&mut self, id: SchemaId, t: Time, data: &MeshData) -> MeshResult<()> {
        let index = self.index_of(id)?;
        let mesh = mesh_of(&mut self.schemas[index], id)?;
        mesh.write_sample(t, data, &self.export_settings)
    }
}

fn mesh_of(schema: &mut Schema, id: SchemaId) -> MeshResult<&mut Mesh> {
    let actual = schema.kind();
    schema.as_mesh_mut().ok_or(MeshError::KindMismatch {
        id,
        expected: SchemaKind::Mesh,
        actual,
    })
}
