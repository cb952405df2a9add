//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use rstest::fixture;

use timesample_core::math::{Vec2, Vec3};
use timesample_core::schema::Mesh;
use timesample_core::store::MemoryPrim;
use timesample_core::{Context, MemoryStage, MeshData, SchemaId, SchemaKind};

/// A stage with one mesh entity.
pub struct Scene {
    pub stage: MemoryStage,
    pub ctx: Context,
    pub mesh: SchemaId,
}

impl Scene {
    pub fn mesh(&mut self) -> &mut Mesh {
        self.ctx.mesh_mut(self.mesh).unwrap()
    }

    /// Direct handle to the mesh's prim, bypassing the mesh entity.
    pub fn prim(&self) -> MemoryPrim {
        let path = self.ctx.get(self.mesh).unwrap().path().to_string();
        self.stage.prim(&path).unwrap()
    }
}

#[fixture]
pub fn scene() -> Scene {
    let stage = MemoryStage::new();
    let mut ctx = Context::new();
    let mesh = stage
        .create_schema(&mut ctx, SchemaKind::Mesh, None, "Mesh")
        .unwrap();
    Scene { stage, ctx, mesh }
}

/// Unit quad in the XY plane as a single four-corner face.
pub fn unit_quad() -> MeshData {
    MeshData {
        points: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        uvs: vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ],
        counts: vec![4],
        indices: vec![0, 1, 2, 3],
        ..Default::default()
    }
}

/// One right triangle with legs of length one.
pub fn triangle() -> MeshData {
    MeshData {
        points: vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
        ],
        indices: vec![0, 1, 2],
        ..Default::default()
    }
}

/// `num_points` points on a line with a plain triangle list of
/// `num_indices` indices cycling through them.
pub fn triangle_soup(num_points: usize, num_indices: usize) -> MeshData {
    MeshData {
        points: (0..num_points)
            .map(|i| Vec3::new(i as f32, (i % 7) as f32, (i % 3) as f32))
            .collect(),
        indices: (0..num_indices).map(|i| (i % num_points) as i32).collect(),
        ..Default::default()
    }
}

/// Regular grid of `n x n` quads, displaced along Y by `height`.
pub fn grid(n: usize, height: impl Fn(f32, f32) -> f32) -> MeshData {
    let step = 1.0 / n as f32;
    let mut points = Vec::with_capacity((n + 1) * (n + 1));
    for iy in 0..=n {
        for ix in 0..=n {
            let x = ix as f32 * step - 0.5;
            let z = iy as f32 * step - 0.5;
            points.push(Vec3::new(x, height(x, z), z));
        }
    }
    let row = (n + 1) as i32;
    let mut indices = Vec::with_capacity(n * n * 4);
    for iy in 0..n as i32 {
        for ix in 0..n as i32 {
            let i = iy * row + ix;
            indices.extend_from_slice(&[i, i + row, i + row + 1, i + 1]);
        }
    }
    MeshData {
        points,
        counts: vec![4; n * n],
        indices,
        ..Default::default()
    }
}
