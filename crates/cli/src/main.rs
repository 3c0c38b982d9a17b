#![deny(unsafe_code)]
//! CLI binary for the cowspots drifting-sprite background.
//!
//! Subcommands:
//! - `list` — print available scene presets
//! - `assets <dir>` — print the asset pool a directory would provide
//! - `simulate <scene>` — generate a layout, run N ticks, print the sprite set as JSON
//! - `render <scene>` — generate, run N ticks, write a PNG snapshot
//! - `replay <spec>` — rerun a saved scene spec

mod assets;
mod error;

use clap::{Args, Parser, Subcommand};
use cowspots_core::{AssetRef, SceneSpec};
use cowspots_scenes::{Scene, ScenePreset};
use error::CliError;
use std::path::{Path, PathBuf};
use std::process;

#[derive(Parser)]
#[command(name = "cowspots", about = "Drifting cow-spot sprite simulation")]
struct Cli {
    /// Output as JSON instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct SceneArgs {
    /// Scene preset name (drift, tethered, orbs).
    scene: String,

    /// Number of sprites to place.
    #[arg(short, long, default_value_t = 10, allow_negative_numbers = true)]
    count: i64,

    /// Number of motion ticks to run after placement.
    #[arg(short, long, default_value_t = 0)]
    ticks: usize,

    /// Canvas width in pixels.
    #[arg(short = 'W', long, default_value_t = 800)]
    width: usize,

    /// Canvas height in pixels.
    #[arg(short = 'H', long, default_value_t = 600)]
    height: usize,

    /// RNG seed; omit for a different layout every run.
    #[arg(long)]
    seed: Option<u64>,

    /// Directory to take assets from; overrides --asset.
    #[arg(long)]
    assets_dir: Option<PathBuf>,

    /// File extension kept when scanning --assets-dir.
    #[arg(long, default_value = assets::DEFAULT_EXTENSION)]
    ext: String,

    /// URL prefix for each asset found in --assets-dir.
    #[arg(long, default_value = assets::DEFAULT_PREFIX)]
    prefix: String,

    /// Asset reference to use (repeatable).
    #[arg(long = "asset", default_value = "/cowspots/spot.svg")]
    assets: Vec<String>,

    /// Scene parameters as a JSON string.
    #[arg(long, default_value = "{}")]
    params: String,
}

#[derive(Subcommand)]
enum Command {
    /// List available scene presets.
    List,
    /// Print the asset pool found in a directory.
    Assets {
        dir: PathBuf,

        /// File extension to keep.
        #[arg(long, default_value = assets::DEFAULT_EXTENSION)]
        ext: String,

        /// URL prefix for each asset.
        #[arg(long, default_value = assets::DEFAULT_PREFIX)]
        prefix: String,
    },
    /// Run a scene and print the resulting sprite set.
    Simulate {
        #[command(flatten)]
        scene: SceneArgs,

        /// Also write the scene spec to this file for later replay.
        #[arg(long)]
        save_spec: Option<PathBuf>,
    },
    /// Run a scene and write a PNG snapshot.
    Render {
        #[command(flatten)]
        scene: SceneArgs,

        /// Output file path.
        #[arg(short, long, default_value = "cowspots.png")]
        output: PathBuf,
    },
    /// Rerun a scene spec saved with `simulate --save-spec`.
    Replay {
        spec: PathBuf,

        /// Write a PNG snapshot instead of printing the sprite set.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl SceneArgs {
    fn into_spec(self) -> Result<SceneSpec, CliError> {
        let params: serde_json::Value = serde_json::from_str(&self.params)
            .map_err(|e| CliError::Input(format!("invalid --params JSON: {e}")))?;

        let pool = match &self.assets_dir {
            Some(dir) => assets::scan_dir(dir, &self.ext, &self.prefix)?,
            None => self.assets.iter().map(|a| AssetRef::new(a.as_str())).collect(),
        };

        let mut spec = SceneSpec::new(&self.scene, self.width, self.height, self.count, pool);
        spec.params = params;
        spec.seed = self.seed;
        spec.ticks = self.ticks;
        Ok(spec)
    }
}

fn read_spec(path: &Path) -> Result<SceneSpec, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::Io(format!("cannot read {}: {e}", path.display())))?;
    serde_json::from_str(&text).map_err(|e| CliError::Input(format!("invalid scene spec: {e}")))
}

fn run_scene(spec: &SceneSpec) -> Result<Scene, CliError> {
    let mut scene = Scene::from_spec(spec)?;
    scene.run(spec.ticks)?;
    Ok(scene)
}

fn print_sprites(scene: &Scene, spec: &SceneSpec, json: bool) -> Result<(), CliError> {
    let sprites = scene.sprites();
    if json {
        let info = serde_json::json!({
            "spec": spec,
            "params": scene.params(),
            "sprites": &*sprites,
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        for s in sprites.iter() {
            let p = s.position();
            let v = s.velocity();
            println!(
                "{:>4}  pos ({:8.3}, {:8.3})  vel ({:7.3}, {:7.3})  size {:6.1}  {}",
                s.id().0,
                p.x,
                p.y,
                v.x,
                v.y,
                s.size(),
                s.asset()
            );
        }
    }
    Ok(())
}

fn write_snapshot(scene: &Scene, spec: &SceneSpec, output: &Path, json: bool) -> Result<(), CliError> {
    cowspots_scenes::snapshot::write_png(
        &scene.sprites(),
        &scene.region(),
        spec.width,
        spec.height,
        output,
    )?;
    if json {
        let info = serde_json::json!({
            "scene": spec.scene,
            "count": scene.sprites().len(),
            "ticks": spec.ticks,
            "seed": spec.seed,
            "output": output.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&info)?);
    } else {
        eprintln!(
            "rendered {} ({} sprites, {} ticks) -> {}",
            spec.scene,
            scene.sprites().len(),
            spec.ticks,
            output.display()
        );
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::List => {
            let scenes = ScenePreset::list_names();
            if cli.json {
                let schemas: serde_json::Map<String, serde_json::Value> = scenes
                    .iter()
                    .filter_map(|name| {
                        ScenePreset::from_name(name)
                            .ok()
                            .map(|p| (name.to_string(), p.param_schema()))
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&schemas)?);
            } else {
                println!("Scenes:");
                for name in scenes {
                    println!("  {name}");
                }
            }
        }
        Command::Assets { dir, ext, prefix } => {
            let pool = assets::scan_dir(&dir, &ext, &prefix)?;
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&pool)?);
            } else {
                for asset in &pool {
                    println!("{asset}");
                }
            }
        }
        Command::Simulate { scene, save_spec } => {
            let spec = scene.into_spec()?;
            let scene = run_scene(&spec)?;
            if let Some(path) = save_spec {
                std::fs::write(&path, serde_json::to_string_pretty(&spec)?)?;
            }
            print_sprites(&scene, &spec, cli.json)?;
        }
        Command::Render { scene, output } => {
            let spec = scene.into_spec()?;
            let scene = run_scene(&spec)?;
            write_snapshot(&scene, &spec, &output, cli.json)?;
        }
        Command::Replay { spec, output } => {
            let spec = read_spec(&spec)?;
            if spec.seed.is_none() {
                log::warn!("spec has no seed; replay will not match the original run");
            }
            let scene = run_scene(&spec)?;
            match output {
                Some(path) => write_snapshot(&scene, &spec, &path, cli.json)?,
                None => print_sprites(&scene, &spec, cli.json)?,
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let json_mode = cli.json;
    if let Err(e) = run(cli) {
        if json_mode {
            let j = serde_json::json!({"error": e.to_string(), "exit_code": e.exit_code()});
            eprintln!("{}", serde_json::to_string_pretty(&j).unwrap_or_default());
        } else {
            eprintln!("error: {e}");
        }
        process::exit(e.exit_code());
    }
}
