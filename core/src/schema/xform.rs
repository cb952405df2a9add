//! Transform entity.

use super::SchemaCore;
use super::attr;
use crate::error::MeshResult;
use crate::math::{self, Quat, Vec3, Vec4};
use crate::mesh::{ExportSettings, ImportSettings};
use crate::store::{AttributeStore, Time, ValueMut, ValueRef};

/// Local transform of an entity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XformData {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for XformData {
    fn default() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Quat::identity(),
            scale: Vec3::new(1.0, 1.0, 1.0),
        }
    }
}

impl XformData {
    #[must_use]
    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    /// Convert between handedness conventions.
    fn swap_handedness(&mut self) {
        self.position.x = -self.position.x;
        self.rotation = math::invert_x_rotation(self.rotation);
    }
}

/// Read translate / orient / scale at `t`, falling back to identity for
/// missing attributes.
pub(crate) fn read_transform(
    store: &dyn AttributeStore,
    t: Time,
    settings: &ImportSettings,
) -> XformData {
    let mut data = XformData::default();
    store.read(attr::TRANSLATE, t, ValueMut::from(&mut data.position));
    let mut orient = Vec4::new(0.0, 0.0, 0.0, 1.0);
    if store.read(attr::ORIENT, t, ValueMut::from(&mut orient)) {
        data.rotation = math::quat_from_xyzw(orient.x, orient.y, orient.z, orient.w);
    }
    store.read(attr::SCALE, t, ValueMut::from(&mut data.scale));

    if settings.swap_handedness {
        data.swap_handedness();
    }
    data.position *= settings.scale;
    data
}

pub(crate) fn write_transform(
    core: &mut SchemaCore,
    t: Time,
    src: &XformData,
    settings: &ExportSettings,
) -> MeshResult<()> {
    let mut data = *src;
    if settings.swap_handedness {
        data.swap_handedness();
    }
    data.position *= settings.scale;

    let [x, y, z, w] = math::quat_to_array(data.rotation);
    core.write(attr::TRANSLATE, ValueRef::Float3(data.position), t)?;
    core.write(attr::ORIENT, ValueRef::Float4(Vec4::new(x, y, z, w)), t)?;
    core.write(attr::SCALE, ValueRef::Float3(data.scale), t)?;
    core.invalidate();
    Ok(())
}

/// A transform node.
#[derive(Debug)]
pub struct Xform {
    pub(crate) core: SchemaCore,
    sample: XformData,
}

impl Xform {
    pub(crate) fn new(core: SchemaCore) -> Self {
        Self {
            core,
            sample: XformData::default(),
        }
    }

    pub fn core(&self) -> &SchemaCore {
        &self.core
    }

    /// Transform of the most recent update.
    pub fn sample(&self) -> &XformData {
        &self.sample
    }

    pub fn update_sample(&mut self, t: Time, settings: &ImportSettings) {
        if self.core.begin_update(t).is_empty() {
            return;
        }
        self.sample = read_transform(self.core.store(), t, settings);
    }

    /// Update to `t` and return the transform.
    pub fn read_sample(&mut self, t: Time, settings: &ImportSettings) -> XformData {
        self.update_sample(t, settings);
        self.sample
    }

    pub fn write_sample(
        &mut self,
        t: Time,
        data: &XformData,
        settings: &ExportSettings,
    ) -> MeshResult<()> {
        write_transform(&mut self.core, t, data, settings)
    }
}
