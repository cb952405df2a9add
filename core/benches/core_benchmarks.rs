use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

use timesample_core::math::Vec3;
use timesample_core::mesh::{MeshSample, split, synthesize, triangulate};
use timesample_core::{
    Context, ExportSettings, ImportSettings, MemoryStage, MeshData, SchemaKind,
};

/// Grid of `n x n` quads as points, counts and indices.
fn grid(n: usize) -> (Vec<Vec3>, Vec<i32>, Vec<i32>) {
    let mut points = Vec::with_capacity((n + 1) * (n + 1));
    for iy in 0..=n {
        for ix in 0..=n {
            points.push(Vec3::new(ix as f32, (ix * iy) as f32 * 0.01, iy as f32));
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
    (points, vec![4; n * n], indices)
}

// ---------------------------------------------------------------------------
// Triangulation and normals
// ---------------------------------------------------------------------------

fn bench_triangulate(c: &mut Criterion) {
    let mut group = c.benchmark_group("triangulate");
    for n in [32, 128, 256] {
        let (_, counts, indices) = grid(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| triangulate(black_box(&counts), Some(black_box(&indices[..])), true));
        });
    }
    group.finish();
}

fn bench_synthesize_normals(c: &mut Criterion) {
    let (points, counts, indices) = grid(256);
    let triangles = triangulate(&counts, Some(&indices[..]), false);
    c.bench_function("synthesize_normals_256", |b| {
        b.iter(|| synthesize(black_box(&points), black_box(&triangles)));
    });
}

// ---------------------------------------------------------------------------
// Submesh splitting
// ---------------------------------------------------------------------------

fn bench_split(c: &mut Criterion) {
    let (points, counts, indices) = grid(256);
    let indices_triangulated = triangulate(&counts, Some(&indices[..]), false);
    let normals = synthesize(&points, &indices_triangulated);
    let sample = MeshSample {
        points,
        normals,
        counts,
        indices,
        indices_triangulated,
        ..Default::default()
    };
    c.bench_function("split_256", |b| {
        b.iter(|| split(black_box(&sample), 64998, false));
    });
}

// ---------------------------------------------------------------------------
// Full update
// ---------------------------------------------------------------------------

fn bench_update_all_samples(c: &mut Criterion) {
    let stage = MemoryStage::new();
    let mut ctx = Context::new();
    ctx.set_export_settings(ExportSettings::passthrough());
    ctx.set_import_settings(ImportSettings::default().with_double_buffering(true));

    let (points, counts, indices) = grid(64);
    for i in 0..64 {
        let Ok(id) = stage.create_schema(&mut ctx, SchemaKind::Mesh, None, &format!("Mesh{i}"))
        else {
            return;
        };
        for frame in 0..4 {
            let data = MeshData {
                points: points
                    .iter()
                    .map(|p| p + Vec3::new(0.0, frame as f32, 0.0))
                    .collect(),
                counts: counts.clone(),
                indices: indices.clone(),
                ..Default::default()
            };
            if ctx.write_mesh_sample(id, frame as f64, &data).is_err() {
                return;
            }
        }
    }

    let mut t = 0.0;
    c.bench_function("update_all_samples_64_meshes", |b| {
        b.iter(|| {
            t = (t + 0.1) % 3.0;
            ctx.update_all_samples(black_box(t));
        });
    });
}

criterion_group!(
    benches,
    bench_triangulate,
    bench_synthesize_normals,
    bench_split,
    bench_update_all_samples,
);
criterion_main!(benches);
