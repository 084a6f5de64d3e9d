//! Loads a level, assembles its scene and prints what would be drawn.

#[cfg(not(target_arch = "wasm32"))]
use std::path::PathBuf;

#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;
#[cfg(not(target_arch = "wasm32"))]
use hie_ngin::{LoadOptions, MeshFormat, TextureMaterial, TexturePathMaterials, init_logging, load_level};

#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Parser)]
#[command(name = "hie-inspect", about = "Decodes a level and summarizes its scene")]
struct Args {
    /// Level name; files are read from <ROOT>/<LEVEL>/<LEVEL>.{mshs,hie}
    level: String,

    /// Asset root directory [default: $HIE_ASSET_ROOT or ./assets]
    #[arg(long, value_name = "DIR")]
    root: Option<PathBuf>,

    /// Mesh stream has no texture coordinates
    #[arg(long)]
    legacy: bool,

    /// Print one line per placement command
    #[arg(long)]
    commands: bool,
}

#[cfg(not(target_arch = "wasm32"))]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let args = Args::parse();

    let mut options = LoadOptions::from_env();
    if let Some(root) = args.root {
        options = options.with_asset_root(root);
    }
    if args.legacy {
        options = options.with_mesh_format(MeshFormat::Legacy);
    }

    let level = load_level(&args.level, &options).await?;
    let descriptor = &level.descriptor;
    println!("level           {}", level.name);
    println!("geometries      {} (descriptor declares {})", level.geometries.len(), descriptor.mesh_count);
    println!("render nodes    {}", descriptor.render_nodes.len());
    println!("textures        {}", descriptor.texture_names.len());
    println!("materials       {}", descriptor.materials.len());
    println!("transforms      {}", descriptor.transforms.len());
    println!("cull nodes      {}", descriptor.cull_nodes.len());

    let mut materials = TexturePathMaterials::new(level.name.as_str());
    let commands = level.assemble(&mut materials)?;
    println!("placements      {}", commands.len());

    if args.commands {
        for command in &commands {
            let origin = command.world_transform.w;
            let material = match &command.material {
                TextureMaterial::Default => "-",
                TextureMaterial::Texture { path, .. } => path.as_str(),
            };
            let cull = command.cull_id.map_or_else(|| "-".to_string(), |id| id.to_string());
            println!(
                "node {:>5}  geometry {:>5}  faces {:>5}  at ({:.2}, {:.2}, {:.2})  cull {:>4}  {}",
                command.node,
                command.geometry_index,
                command.geometry.faces.len(),
                origin.x,
                origin.y,
                origin.z,
                cull,
                material
            );
        }
    }

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {}
