//! # Wave Mesh Demo
//!
//! Authors an animated ripple on a regular grid into an in-memory stage and
//! replays it through the sampling pipeline, one update per frame.
//!
//! The default 256 x 256 grid has more points than fit a 16-bit index
//! buffer, so every replayed frame is split into submeshes.
//!
//! ```bash
//! cargo run -p timesample-demos --bin wave_mesh -- --frames 60
//! cargo run -p timesample-demos --bin wave_mesh -- --settings wave.ron
//! ```
//!
//! A settings file is RON with optional `import` and `export` sections:
//!
//! ```ron
//! (
//!     import: (double_buffering: true, vertex_budget: 30000),
//!     export: (scale: 1.0),
//! )
//! ```

use std::path::PathBuf;

use clap::Parser;
use serde::Deserialize;
use timesample_core::math::{Vec2, Vec3};
use timesample_core::{
    Context, ExportSettings, ImportSettings, MemoryStage, MeshData, SchemaKind, frame_mark,
};

/// Wave mesh demo arguments.
#[derive(Parser, Debug)]
#[command(name = "wave_mesh", about = "Author and replay an animated wave mesh")]
struct Args {
    /// Quads along each side of the grid.
    #[arg(long, default_value_t = 256)]
    resolution: usize,

    /// Number of authored frames.
    #[arg(long, default_value_t = 150)]
    frames: u32,

    /// Authoring frame rate.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Replay steps per authored frame.
    #[arg(long, default_value_t = 1)]
    substeps: u32,

    /// RON file with import and export settings.
    #[arg(long)]
    settings: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DemoSettings {
    import: ImportSettings,
    export: ExportSettings,
}

fn load_settings(path: Option<&PathBuf>) -> Result<DemoSettings, Box<dyn std::error::Error>> {
    let Some(path) = path else {
        return Ok(DemoSettings::default());
    };
    let text = std::fs::read_to_string(path)?;
    let settings = ron::from_str(&text)?;
    log::info!("loaded settings from {}", path.display());
    Ok(settings)
}

/// Grid over `[-1, 1]` in XZ with a ripple spreading from the center.
struct Wave {
    resolution: usize,
}

impl Wave {
    fn height(x: f32, z: f32, t: f32) -> f32 {
        let d = (x * x + z * z).sqrt();
        (d * 10.0 + t * 5.0).sin() * (1.0 - d).max(0.0)
    }

    fn coordinate(&self, i: usize) -> f32 {
        i as f32 / self.resolution as f32 * 2.0 - 1.0
    }

    fn points(&self, t: f32) -> Vec<Vec3> {
        let n = self.resolution;
        let mut points = Vec::with_capacity((n + 1) * (n + 1));
        for iz in 0..=n {
            let z = self.coordinate(iz);
            for ix in 0..=n {
                let x = self.coordinate(ix);
                points.push(Vec3::new(x, Self::height(x, z, t), z));
            }
        }
        points
    }

    fn uvs(&self) -> Vec<Vec2> {
        let n = self.resolution;
        let step = 1.0 / n as f32;
        (0..=n)
            .flat_map(|iz| (0..=n).map(move |ix| Vec2::new(ix as f32 * step, iz as f32 * step)))
            .collect()
    }

    fn topology(&self) -> (Vec<i32>, Vec<i32>) {
        let n = self.resolution;
        let row = (n + 1) as i32;
        let mut indices = Vec::with_capacity(n * n * 4);
        for iz in 0..n as i32 {
            for ix in 0..n as i32 {
                let i = iz * row + ix;
                indices.extend_from_slice(&[i, i + 1, i + row + 1, i + row]);
            }
        }
        (vec![4; n * n], indices)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let settings = load_settings(args.settings.as_ref())?;

    let stage = MemoryStage::new();
    let mut ctx = Context::new();
    ctx.set_export_settings(settings.export);
    ctx.set_import_settings(settings.import);

    let root = stage.create_schema(&mut ctx, SchemaKind::Xform, None, "World")?;
    let id = stage.create_schema(&mut ctx, SchemaKind::Mesh, Some(root), "Wave")?;

    // Topology is authored once, points every frame.
    let wave = Wave {
        resolution: args.resolution.max(1),
    };
    let (counts, indices) = wave.topology();
    let mut data = MeshData {
        points: wave.points(0.0),
        uvs: wave.uvs(),
        counts,
        indices,
        ..Default::default()
    };
    ctx.write_mesh_sample(id, 0.0, &data)?;
    data = MeshData::default();
    for frame in 1..args.frames {
        let t = frame as f64 / args.fps;
        data.points = wave.points(t as f32);
        ctx.write_mesh_sample(id, t, &data)?;
    }
    log::info!(
        "authored {} frames of {} points",
        args.frames,
        (wave.resolution + 1).pow(2)
    );

    let substeps = args.substeps.max(1);
    let steps = args.frames.saturating_sub(1) * substeps;
    let dt = 1.0 / (args.fps * substeps as f64);
    for step in 0..=steps {
        let t = step as f64 * dt;
        ctx.update_all_samples(t);
        frame_mark!();

        let mesh = ctx.mesh(id)?;
        for issue in mesh.issues() {
            log::warn!("{issue}");
        }
        if let Some(view) = mesh.front() {
            let bounds = view.bounds();
            log::debug!(
                "t={t:.3}: {} triangles in {} submeshes, bounds {:?}..{:?}",
                view.num_indices_triangulated() / 3,
                view.num_submeshes(),
                bounds.min,
                bounds.max
            );
        }
    }

    let summary = ctx.mesh(id)?.summary();
    log::info!("replayed {} steps: {summary:#?}", steps + 1);
    Ok(())
}
