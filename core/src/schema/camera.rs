//! Camera entity.

use super::SchemaCore;
use super::attr;
use super::xform::{XformData, read_transform, write_transform};
use crate::error::MeshResult;
use crate::math::Vec2;
use crate::mesh::{ExportSettings, ImportSettings};
use crate::store::{AttributeStore, Time, ValueMut, ValueRef};

/// Lens parameters of a camera.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub struct CameraData {
    pub near_clipping_plane: f32,
    pub far_clipping_plane: f32,
    /// Vertical field of view in degrees.
    pub field_of_view: f32,
    pub aspect_ratio: f32,
    pub focus_distance: f32,
    /// In millimeters.
    pub focal_length: f32,
    /// Vertical aperture in millimeters.
    pub aperture: f32,
}

impl Default for CameraData {
    fn default() -> Self {
        Self {
            near_clipping_plane: 0.3,
            far_clipping_plane: 1000.0,
            field_of_view: 60.0,
            aspect_ratio: 16.0 / 9.0,
            focus_distance: 5.0,
            focal_length: 0.0,
            aperture: 35.0,
        }
    }
}

fn read_lens(store: &dyn AttributeStore, t: Time) -> CameraData {
    let mut data = CameraData::default();

    let mut clip = Vec2::new(data.near_clipping_plane, data.far_clipping_plane);
    if store.read(attr::CLIPPING_RANGE, t, ValueMut::from(&mut clip)) {
        data.near_clipping_plane = clip.x;
        data.far_clipping_plane = clip.y;
    }
    store.read(attr::FOCAL_LENGTH, t, ValueMut::from(&mut data.focal_length));
    store.read(attr::VERTICAL_APERTURE, t, ValueMut::from(&mut data.aperture));
    store.read(attr::FOCUS_DISTANCE, t, ValueMut::from(&mut data.focus_distance));

    let mut horizontal = 0.0f32;
    if store.read(attr::HORIZONTAL_APERTURE, t, ValueMut::from(&mut horizontal))
        && data.aperture > 0.0
    {
        data.aspect_ratio = horizontal / data.aperture;
    }
    if data.focal_length > 0.0 {
        data.field_of_view = (2.0 * (data.aperture / (2.0 * data.focal_length)).atan()).to_degrees();
    }
    data
}

/// A camera node: a transform plus lens parameters.
#[derive(Debug)]
pub struct Camera {
    pub(crate) core: SchemaCore,
    transform: XformData,
    sample: CameraData,
}

impl Camera {
    pub(crate) fn new(core: SchemaCore) -> Self {
        Self {
            core,
            transform: XformData::default(),
            sample: CameraData::default(),
        }
    }

    pub fn core(&self) -> &SchemaCore {
        &self.core
    }

    pub fn transform(&self) -> &XformData {
        &self.transform
    }

    pub fn sample(&self) -> &CameraData {
        &self.sample
    }

    pub fn update_sample(&mut self, t: Time, settings: &ImportSettings) {
        if self.core.begin_update(t).is_empty() {
            return;
        }
        self.transform = read_transform(self.core.store(), t, settings);
        self.sample = read_lens(self.core.store(), t);
    }

    /// Update to `t` and return the lens parameters.
    pub fn read_sample(&mut self, t: Time, settings: &ImportSettings) -> CameraData {
        self.update_sample(t, settings);
        self.sample
    }

    pub fn write_sample(
        &mut self,
        t: Time,
        transform: &XformData,
        data: &CameraData,
        settings: &ExportSettings,
    ) -> MeshResult<()> {
        write_transform(&mut self.core, t, transform, settings)?;

        let clip = Vec2::new(data.near_clipping_plane, data.far_clipping_plane);
        self.core.write(attr::CLIPPING_RANGE, ValueRef::Float2(clip), t)?;
        self.core
            .write(attr::FOCAL_LENGTH, ValueRef::Float(data.focal_length), t)?;
        self.core
            .write(attr::VERTICAL_APERTURE, ValueRef::Float(data.aperture), t)?;
        self.core.write(
            attr::HORIZONTAL_APERTURE,
            ValueRef::Float(data.aperture * data.aspect_ratio),
            t,
        )?;
        self.core
            .write(attr::FOCUS_DISTANCE, ValueRef::Float(data.focus_distance), t)?;
        self.core.invalidate();
        Ok(())
    }
}
