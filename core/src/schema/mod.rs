//! Scene entities.
//!
//! Every entity owns a [`SchemaCore`] (identity, hierarchy, attribute store,
//! update tracking) plus kind-specific sample state. [`Schema`] dispatches
//! over the four kinds:
//!
//! - [`Xform`] - a transform
//! - [`Camera`] - a transform with lens parameters
//! - [`Mesh`] - a polygon mesh, the main sampling pipeline
//! - [`Points`] - a point cloud

mod base;
mod camera;
mod mesh;
mod points;
pub mod tracker;
mod xform;

pub use base::SchemaCore;
pub use camera::{Camera, CameraData};
pub use mesh::{Mesh, MeshSummary};
pub use points::{Points, PointsData, PointsSummary};
pub use tracker::{UpdateFlags, UpdateTracker};
pub use xform::{Xform, XformData};

use crate::mesh::ImportSettings;
use crate::store::Time;

/// Attribute names read and written by the entities.
pub mod attr {
    pub const POINTS: &str = "points";
    pub const VELOCITIES: &str = "velocities";
    pub const NORMALS: &str = "normals";
    pub const FACE_VERTEX_COUNTS: &str = "faceVertexCounts";
    pub const FACE_VERTEX_INDICES: &str = "faceVertexIndices";
    /// Preferred UV attribute.
    pub const PRIMVAR_UV: &str = "primvars:uv";
    /// Fallback UV attribute.
    pub const UV: &str = "uv";

    pub const TRANSLATE: &str = "xformOp:translate";
    /// Quaternion stored as `(x, y, z, w)`.
    pub const ORIENT: &str = "xformOp:orient";
    pub const SCALE: &str = "xformOp:scale";

    /// `(near, far)`.
    pub const CLIPPING_RANGE: &str = "clippingRange";
    pub const FOCAL_LENGTH: &str = "focalLength";
    pub const FOCUS_DISTANCE: &str = "focusDistance";
    pub const HORIZONTAL_APERTURE: &str = "horizontalAperture";
    pub const VERTICAL_APERTURE: &str = "verticalAperture";
}

/// Identifier of an entity within its [`Context`](crate::Context).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SchemaId(pub(crate) u32);

impl SchemaId {
    pub fn raw(self) -> u32 {
        self.0
    }
}

/// Entity kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(serde::Serialize, serde::Deserialize))]
pub enum SchemaKind {
    Xform,
    Camera,
    Mesh,
    Points,
}

/// An entity of any kind.
#[derive(Debug)]
pub enum Schema {
    Xform(Xform),
    Camera(Camera),
    Mesh(Mesh),
    Points(Points),
}

impl Schema {
    pub(crate) fn new(kind: SchemaKind, core: SchemaCore) -> Self {
        match kind {
            SchemaKind::Xform => Self::Xform(Xform::new(core)),
            SchemaKind::Camera => Self::Camera(Camera::new(core)),
            SchemaKind::Mesh => Self::Mesh(Mesh::new(core)),
            SchemaKind::Points => Self::Points(Points::new(core)),
        }
    }

    pub fn kind(&self) -> SchemaKind {
        match self {
            Self::Xform(_) => SchemaKind::Xform,
            Self::Camera(_) => SchemaKind::Camera,
            Self::Mesh(_) => SchemaKind::Mesh,
            Self::Points(_) => SchemaKind::Points,
        }
    }

    pub fn core(&self) -> &SchemaCore {
        match self {
            Self::Xform(s) => s.core(),
            Self::Camera(s) => s.core(),
            Self::Mesh(s) => s.core(),
            Self::Points(s) => s.core(),
        }
    }

    pub(crate) fn core_mut(&mut self) -> &mut SchemaCore {
        match self {
            Self::Xform(s) => &mut s.core,
            Self::Camera(s) => &mut s.core,
            Self::Mesh(s) => &mut s.core,
            Self::Points(s) => &mut s.core,
        }
    }

    pub fn id(&self) -> SchemaId {
        self.core().id()
    }

    pub fn path(&self) -> &str {
        self.core().path()
    }

    /// Bring the entity's sample up to date for time `t`.
    pub fn update_sample(&mut self, t: Time, settings: &ImportSettings) {
        match self {
            Self::Xform(s) => s.update_sample(t, settings),
            Self::Camera(s) => s.update_sample(t, settings),
            Self::Mesh(s) => s.update_sample(t, settings),
            Self::Points(s) => s.update_sample(t, settings),
        }
    }

    /// Force the next update to resample.
    pub fn invalidate_sample(&mut self) {
        self.core_mut().invalidate();
    }

    /// Tell the entity its variant selection changed, so cached topology
    /// and attribute facts no longer hold.
    pub fn notify_variant_set_changed(&mut self) {
        log::debug!("{}: variant set changed", self.path());
        self.core_mut().notify_variant_set_changed();
    }

    pub fn as_xform(&self) -> Option<&Xform> {
        match self {
            Self::Xform(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_xform_mut(&mut self) -> Option<&mut Xform> {
        match self {
            Self::Xform(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_camera(&self) -> Option<&Camera> {
        match self {
            Self::Camera(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_camera_mut(&mut self) -> Option<&mut Camera> {
        match self {
            Self::Camera(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mesh(&self) -> Option<&Mesh> {
        match self {
            Self::Mesh(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_mesh_mut(&mut self) -> Option<&mut Mesh> {
        match self {
            Self::Mesh(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_points(&self) -> Option<&Points> {
        match self {
            Self::Points(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_points_mut(&mut self) -> Option<&mut Points> {
        match self {
            Self::Points(s) => Some(s),
            _ => None,
        }
    }
}
