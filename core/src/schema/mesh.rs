//! Mesh entity.
//!
//! An update pulls the raw attributes at the requested time, converts them to
//! the target coordinate space, derives the triangle list and normals,
//! computes bounds and splits the result into submeshes when it exceeds the
//! vertex budget. The result lands in one of two [`MeshFrame`] slots.
//!
//! Triangulation is cached across updates. It is recomputed only when:
//!
//! - the slot has no triangle list yet
//! - the mesh topology varies over time
//! - the variant selection or the import settings changed
//! - new topology was written through [`Mesh::write_sample`]
//!
//! A slot whose cached topology is older than the other slot's copies it
//! instead of re-triangulating.

use std::sync::{Arc, OnceLock};

use super::SchemaCore;
use super::attr;
use super::tracker::UpdateFlags;
use crate::error::{MeshError, MeshResult};
use crate::math::{self, Bounds, Vec3};
use crate::mesh::triangulate::retain_valid_triangles;
use crate::mesh::{
    DoubleBuffer, ExportSettings, ImportSettings, MeshData, MeshFrame, MeshSample, MeshView,
    NormalCalculation, TopologyVariance, needs_split, split_into, synthesize_into,
    triangulate_into,
};
use crate::store::{AttributeStore, Time, TimeRange, ValueRef, read_array};

/// Cached description of a mesh.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct MeshSummary {
    pub time_range: Option<TimeRange>,
    pub topology_variance: TopologyVariance,
    pub has_normals: bool,
    pub has_uvs: bool,
    pub has_velocities: bool,
    /// Largest counts seen by any update so far. Size caller buffers for
    /// [`Mesh::read_sample_into`] with these.
    pub peak_num_points: usize,
    pub peak_num_counts: usize,
    pub peak_num_indices: usize,
    pub peak_num_indices_triangulated: usize,
    pub peak_num_submeshes: usize,
}

#[derive(Debug, Clone, Copy)]
struct StoreSummary {
    topology_variance: TopologyVariance,
    has_normals: bool,
    has_uvs: bool,
    has_velocities: bool,
    uv_attribute: &'static str,
}

#[derive(Debug, Clone, Copy, Default)]
struct Peaks {
    num_points: usize,
    num_counts: usize,
    num_indices: usize,
    num_indices_triangulated: usize,
    num_submeshes: usize,
}

/// UV attribute to use: `primvars:uv` when it has a value, else `uv` when
/// that has one, else `primvars:uv`.
fn uv_attribute(store: &dyn AttributeStore) -> &'static str {
    if !store.has_value(attr::PRIMVAR_UV) && store.has_value(attr::UV) {
        attr::UV
    } else {
        attr::PRIMVAR_UV
    }
}

fn summarize_store(store: &dyn AttributeStore) -> StoreSummary {
    let topology_variance = if store.might_vary_over_time(attr::FACE_VERTEX_COUNTS)
        || store.might_vary_over_time(attr::FACE_VERTEX_INDICES)
    {
        TopologyVariance::Heterogeneous
    } else if store.might_vary_over_time(attr::POINTS) {
        TopologyVariance::Homogeneous
    } else {
        TopologyVariance::Constant
    };
    let uv_attribute = uv_attribute(store);
    StoreSummary {
        topology_variance,
        has_normals: store.has_value(attr::NORMALS),
        has_uvs: store.has_value(uv_attribute),
        has_velocities: store.has_value(attr::VELOCITIES),
        uv_attribute,
    }
}

/// Reverse the corner order of every face. Faces past the end of `indices`
/// are left alone.
fn reverse_faces(counts: &[i32], indices: &mut [i32]) {
    let mut offset = 0usize;
    for &k in counts {
        let k = k.max(0) as usize;
        let Some(face) = indices.get_mut(offset..offset + k) else {
            break;
        };
        face.reverse();
        offset += k;
    }
}

/// A polygon mesh.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) core: SchemaCore,
    frames: DoubleBuffer<MeshFrame>,
    summary: OnceLock<StoreSummary>,
    peaks: Peaks,
    applied_settings: Option<ImportSettings>,
    topology_generation: u64,
    topology_dirty: bool,
    issues: Vec<MeshError>,
    scratch: MeshSample,
}

impl Mesh {
    pub(crate) fn new(core: SchemaCore) -> Self {
        Self {
            core,
            frames: DoubleBuffer::default(),
            summary: OnceLock::new(),
            peaks: Peaks::default(),
            applied_settings: None,
            topology_generation: 1,
            topology_dirty: false,
            issues: Vec::new(),
            scratch: MeshSample::default(),
        }
    }

    pub fn core(&self) -> &SchemaCore {
        &self.core
    }

    fn store_summary(&self) -> StoreSummary {
        *self
            .summary
            .get_or_init(|| summarize_store(self.core.store()))
    }

    /// Summary of the mesh. Attribute facts are cached until the mesh is
    /// written; peak counts grow with every update.
    pub fn summary(&self) -> MeshSummary {
        let store = self.store_summary();
        MeshSummary {
            time_range: self.core.time_range(),
            topology_variance: store.topology_variance,
            has_normals: store.has_normals,
            has_uvs: store.has_uvs,
            has_velocities: store.has_velocities,
            peak_num_points: self.peaks.num_points,
            peak_num_counts: self.peaks.num_counts,
            peak_num_indices: self.peaks.num_indices,
            peak_num_indices_triangulated: self.peaks.num_indices_triangulated,
            peak_num_submeshes: self.peaks.num_submeshes,
        }
    }

    /// Data issues found by the most recent update that did any work.
    pub fn issues(&self) -> &[MeshError] {
        &self.issues
    }

    /// Index of the slot readers currently see.
    pub fn front_slot(&self) -> Option<usize> {
        self.frames.front_index()
    }

    /// Bring the front frame up to date for time `t`.
    pub fn update_sample(&mut self, t: Time, settings: &ImportSettings) {
        crate::profile_function!();

        let mut flags = self.core.begin_update(t);
        if self.applied_settings.as_ref() != Some(settings) {
            flags |= UpdateFlags::IMPORT_SETTINGS_CHANGED;
            self.applied_settings = Some(settings.clone());
        }
        if flags.is_empty() {
            log::trace!("{}: sample at {t} is current", self.core.path());
            return;
        }
        if flags.contains(UpdateFlags::VARIANT_SET_CHANGED) {
            self.summary.take();
        }

        let summary = self.store_summary();
        let retriangulate = self.topology_dirty
            || flags.intersects(UpdateFlags::TOPOLOGY)
            || summary.topology_variance == TopologyVariance::Heterogeneous;
        if retriangulate {
            self.topology_generation += 1;
            self.topology_dirty = false;
        }
        let generation = self.topology_generation;

        self.issues.clear();
        self.frames.advance(settings.double_buffering);
        let Some((frame, back)) = self.frames.front_mut_with_back() else {
            return;
        };
        let store = self.core.store();
        let path = self.core.path();
        let issues = &mut self.issues;
        let MeshFrame {
            sample,
            submeshes,
            time,
            topology_generation,
        } = frame;
        *time = t;

        read_array(store, attr::POINTS, t, &mut sample.points);
        if sample.points.is_empty() {
            log::debug!("{path}: no points at {t}");
            *sample = MeshSample::default();
            submeshes.clear();
            *topology_generation = 0;
            return;
        }
        read_array(store, attr::VELOCITIES, t, &mut sample.velocities);
        let has_source_normals = settings.normal_calculation != NormalCalculation::Always
            && read_array(store, attr::NORMALS, t, &mut sample.normals)
            && !sample.normals.is_empty();
        if !has_source_normals {
            sample.normals.clear();
        }
        read_array(store, summary.uv_attribute, t, &mut sample.uvs);

        if settings.swap_handedness {
            math::invert_x(&mut sample.points);
            math::invert_x(&mut sample.velocities);
            math::invert_x(&mut sample.normals);
        }
        if settings.scale != 1.0 {
            math::scale(&mut sample.points, settings.scale);
            math::scale(&mut sample.velocities, settings.scale);
        }

        let synthesize = match settings.normal_calculation {
            NormalCalculation::Never => false,
            NormalCalculation::WhenMissing => !has_source_normals,
            NormalCalculation::Always => true,
        };
        let wants_triangles = settings.triangulate || settings.split_mesh || synthesize;

        let cached = !sample.indices_triangulated.is_empty() && *topology_generation == generation;
        let back_cached = !back.sample.indices_triangulated.is_empty()
            && back.topology_generation == generation;
        if !retriangulate && cached {
            log::trace!("{path}: reusing triangulation");
        } else if !retriangulate && back_cached {
            log::trace!("{path}: copying triangulation from the other slot");
            sample.counts.clone_from(&back.sample.counts);
            sample.indices.clone_from(&back.sample.indices);
            sample
                .indices_triangulated
                .clone_from(&back.sample.indices_triangulated);
            *topology_generation = generation;
        } else {
            crate::profile_scope!("triangulate");
            read_array(store, attr::FACE_VERTEX_COUNTS, t, &mut sample.counts);
            read_array(store, attr::FACE_VERTEX_INDICES, t, &mut sample.indices);
            if wants_triangles {
                issues.extend(triangulate_into(
                    &mut sample.indices_triangulated,
                    &sample.counts,
                    Some(&sample.indices),
                    settings.swap_faces,
                ));
            } else {
                sample.indices_triangulated.clear();
            }
            *topology_generation = generation;
        }
        if let Some(err) =
            retain_valid_triangles(&mut sample.indices_triangulated, sample.points.len())
        {
            issues.push(err);
        }

        if synthesize {
            crate::profile_scope!("normals");
            synthesize_into(
                &mut sample.normals,
                &sample.points,
                &sample.indices_triangulated,
            );
        } else if !has_source_normals {
            sample.normals.resize(sample.points.len(), Vec3::zeros());
        }

        sample.bounds = Bounds::from_points(&sample.points);

        let budget = settings.vertex_budget;
        if settings.split_mesh && needs_split(sample, budget) {
            split_into(submeshes, sample, budget, settings.swap_faces);
        } else {
            submeshes.clear();
            if !settings.split_mesh && sample.points.len() > budget {
                let err = MeshError::BudgetExceeded {
                    num_points: sample.points.len(),
                    budget,
                };
                log::warn!("{path}: {err}");
                issues.push(err);
            }
        }

        let peaks = &mut self.peaks;
        peaks.num_points = peaks.num_points.max(sample.points.len());
        peaks.num_counts = peaks.num_counts.max(sample.counts.len());
        peaks.num_indices = peaks.num_indices.max(sample.indices.len());
        peaks.num_indices_triangulated = peaks
            .num_indices_triangulated
            .max(sample.indices_triangulated.len());
        peaks.num_submeshes = peaks.num_submeshes.max(submeshes.len());

        crate::profile_plot!("mesh_triangles", sample.indices_triangulated.len() / 3);
        log::debug!(
            "{path}: sampled at {t}: {} points, {} triangles, {} submeshes",
            sample.points.len(),
            sample.indices_triangulated.len() / 3,
            submeshes.len()
        );
    }

    /// The front frame, without updating.
    pub fn front(&self) -> Option<MeshView<'_>> {
        self.frames.front().map(MeshFrame::view)
    }

    /// Update to `t` and borrow the front frame.
    ///
    /// Fails with [`MeshError::NoSample`] when the mesh has no points at `t`.
    pub fn read_sample(&mut self, t: Time, settings: &ImportSettings) -> MeshResult<MeshView<'_>> {
        self.update_sample(t, settings);
        self.front()
            .filter(|view| view.num_points() > 0)
            .ok_or(MeshError::NoSample { time: t })
    }

    /// Update to `t` and copy the front frame into caller-owned buffers.
    pub fn read_sample_into(
        &mut self,
        t: Time,
        settings: &ImportSettings,
        dst: &mut MeshData,
    ) -> MeshResult<()> {
        let view = self.read_sample(t, settings)?;
        dst.copy_from(&view);
        Ok(())
    }

    /// A handle to the front frame that stays unchanged across updates.
    pub fn snapshot(&self) -> Option<Arc<MeshFrame>> {
        self.frames.snapshot()
    }

    /// Convert `src` to the stored space and write it at `t`.
    ///
    /// Points, velocities, normals and UVs are written when non-empty.
    /// Counts and indices are written when `indices` is non-empty; missing
    /// counts describe a plain triangle list.
    pub fn write_sample(
        &mut self,
        t: Time,
        src: &MeshData,
        settings: &ExportSettings,
    ) -> MeshResult<()> {
        crate::profile_function!();

        let scratch = &mut self.scratch;
        scratch.points.clone_from(&src.points);
        scratch.velocities.clone_from(&src.velocities);
        scratch.normals.clone_from(&src.normals);
        if settings.swap_handedness {
            math::invert_x(&mut scratch.points);
            math::invert_x(&mut scratch.velocities);
            math::invert_x(&mut scratch.normals);
        }
        if settings.scale != 1.0 {
            math::scale(&mut scratch.points, settings.scale);
            math::scale(&mut scratch.velocities, settings.scale);
        }

        scratch.indices.clone_from(&src.indices);
        if !src.counts.is_empty() {
            scratch.counts.clone_from(&src.counts);
        } else {
            if src.indices.len() % 3 != 0 {
                log::warn!(
                    "{}: {} indices do not form whole triangles",
                    self.core.path(),
                    src.indices.len()
                );
            }
            scratch.counts.clear();
            scratch.counts.resize(src.indices.len() / 3, 3);
        }
        if settings.swap_faces {
            reverse_faces(&scratch.counts, &mut scratch.indices);
        }

        if !scratch.points.is_empty() {
            self.core
                .write(attr::POINTS, ValueRef::Float3Array(&scratch.points), t)?;
        }
        if !scratch.velocities.is_empty() {
            self.core
                .write(attr::VELOCITIES, ValueRef::Float3Array(&scratch.velocities), t)?;
        }
        if !scratch.normals.is_empty() {
            self.core
                .write(attr::NORMALS, ValueRef::Float3Array(&scratch.normals), t)?;
        }
        if !src.uvs.is_empty() {
            let name = uv_attribute(self.core.store());
            self.core.write(name, ValueRef::Float2Array(&src.uvs), t)?;
        }
        if !scratch.indices.is_empty() {
            self.core
                .write(attr::FACE_VERTEX_COUNTS, ValueRef::IntArray(&scratch.counts), t)?;
            self.core
                .write(attr::FACE_VERTEX_INDICES, ValueRef::IntArray(&scratch.indices), t)?;
            self.topology_dirty = true;
        }

        self.core.invalidate();
        self.summary.take();
        log::trace!("{}: wrote sample at {t}", self.core.path());
        Ok(())
    }
}
