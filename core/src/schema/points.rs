//! Point cloud entity.

use std::sync::{Arc, OnceLock};

use super::SchemaCore;
use super::attr;
use crate::error::{MeshError, MeshResult};
use crate::math::{self, Vec3};
use crate::mesh::{DoubleBuffer, ExportSettings, ImportSettings};
use crate::store::{Time, TimeRange, ValueRef, read_array};

/// Point positions and optional velocities of one time step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointsData {
    pub points: Vec<Vec3>,
    /// Empty when the source has none.
    pub velocities: Vec<Vec3>,
}

/// Cached description of a point cloud.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct PointsSummary {
    pub time_range: Option<TimeRange>,
    /// Largest point count seen by any update so far.
    pub peak_num_points: usize,
    pub has_velocities: bool,
}

/// A point cloud.
#[derive(Debug)]
pub struct Points {
    pub(crate) core: SchemaCore,
    frames: DoubleBuffer<PointsData>,
    has_velocities: OnceLock<bool>,
    peak_num_points: usize,
    scratch: PointsData,
}

impl Points {
    pub(crate) fn new(core: SchemaCore) -> Self {
        Self {
            core,
            frames: DoubleBuffer::default(),
            has_velocities: OnceLock::new(),
            peak_num_points: 0,
            scratch: PointsData::default(),
        }
    }

    pub fn core(&self) -> &SchemaCore {
        &self.core
    }

    pub fn summary(&self) -> PointsSummary {
        PointsSummary {
            time_range: self.core.time_range(),
            peak_num_points: self.peak_num_points,
            has_velocities: *self
                .has_velocities
                .get_or_init(|| self.core.store().has_value(attr::VELOCITIES)),
        }
    }

    pub fn update_sample(&mut self, t: Time, settings: &ImportSettings) {
        crate::profile_function!();

        if self.core.begin_update(t).is_empty() {
            return;
        }
        self.frames.advance(settings.double_buffering);
        let Some(frame) = self.frames.front_mut() else {
            return;
        };

        let store = self.core.store();
        read_array(store, attr::POINTS, t, &mut frame.points);
        read_array(store, attr::VELOCITIES, t, &mut frame.velocities);

        if settings.swap_handedness {
            math::invert_x(&mut frame.points);
            math::invert_x(&mut frame.velocities);
        }
        if settings.scale != 1.0 {
            math::scale(&mut frame.points, settings.scale);
            math::scale(&mut frame.velocities, settings.scale);
        }
        self.peak_num_points = self.peak_num_points.max(frame.points.len());
    }

    /// The front sample, without updating.
    pub fn front(&self) -> Option<&PointsData> {
        self.frames.front()
    }

    /// Update to `t` and borrow the resulting sample.
    pub fn read_sample(&mut self, t: Time, settings: &ImportSettings) -> MeshResult<&PointsData> {
        self.update_sample(t, settings);
        match self.frames.front() {
            Some(frame) if !frame.points.is_empty() => Ok(frame),
            _ => Err(MeshError::NoSample { time: t }),
        }
    }

    /// Update to `t` and copy the sample into `dst`.
    pub fn read_sample_into(
        &mut self,
        t: Time,
        settings: &ImportSettings,
        dst: &mut PointsData,
    ) -> MeshResult<()> {
        let frame = self.read_sample(t, settings)?;
        dst.points.clone_from(&frame.points);
        dst.velocities.clone_from(&frame.velocities);
        Ok(())
    }

    /// A handle to the front sample that stays valid across updates.
    pub fn snapshot(&self) -> Option<Arc<PointsData>> {
        self.frames.snapshot()
    }

    /// Convert `src` and write it at `t`. Empty arrays are not written.
    pub fn write_sample(
        &mut self,
        t: Time,
        src: &PointsData,
        settings: &ExportSettings,
    ) -> MeshResult<()> {
        let scratch = &mut self.scratch;
        scratch.points.clone_from(&src.points);
        scratch.velocities.clone_from(&src.velocities);
        for values in [&mut scratch.points, &mut scratch.velocities] {
            if settings.swap_handedness {
                math::invert_x(values);
            }
            if settings.scale != 1.0 {
                math::scale(values, settings.scale);
            }
        }

        if !scratch.points.is_empty() {
            self.core
                .write(attr::POINTS, ValueRef::Float3Array(&scratch.points), t)?;
        }
        if !scratch.velocities.is_empty() {
            self.core
                .write(attr::VELOCITIES, ValueRef::Float3Array(&scratch.velocities), t)?;
        }
        self.core.invalidate();
        self.has_velocities.take();
        Ok(())
    }
}
