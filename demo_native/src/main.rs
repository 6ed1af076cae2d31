#[cfg(not(target_arch = "wasm32"))]
use clap::Parser;

#[cfg(not(target_arch = "wasm32"))]
use ownmap::{MapOptions, ScaleExtent, Sources};

/// Continuously scrolling world map.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// TopoJSON topology or GeoJSON feature collection with country boundaries. URL or local
    /// path.
    #[arg(long, default_value_t = Sources::default().topology)]
    topology: String,

    /// Table of countries with their coordinates and zoom levels. URL or local path.
    #[arg(long, default_value_t = Sources::default().metadata)]
    metadata: String,

    /// Name of the topology object holding the countries.
    #[arg(long, default_value_t = Sources::default().object)]
    object: String,

    /// Minimal zoom. At 1, the whole world fits the window.
    #[arg(long, default_value_t = 1.)]
    min_scale: f64,

    #[arg(long, default_value_t = 8.)]
    max_scale: f64,
}

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let options = MapOptions::default()
        .with_scale_extent(ScaleExtent::new(args.min_scale, args.max_scale)?);
    options.validate()?;

    let sources = Sources {
        topology: args.topology,
        metadata: args.metadata,
        object: args.object,
    };

    eframe::run_native(
        "OwnMap",
        Default::default(),
        Box::new(|cc| {
            Ok(Box::new(demo::OwnMapApp::new(
                cc.egui_ctx.clone(),
                sources,
                options,
            )))
        }),
    )?;

    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    println!("This demo is not meant to be compiled for WASM.");
}
