use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// lrsgp - Linear referencing geoprocessing client
#[derive(Parser, Debug)]
#[command(name = "lrsgp")]
#[command(about = "Locate features along routes with an ArcGIS LRS geoprocessing service", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Show the planned request without sending it
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// GP service URL, overriding file and environment
    #[arg(long, global = true, value_name = "URL")]
    pub url: Option<String>,

    /// URL length above which requests are POSTed
    #[arg(long, global = true, value_name = "N")]
    pub max_url_length: Option<usize>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Locate input features along routes
    Locate(LocateArgs),

    /// Show the resolved configuration and where each value came from
    Config,

    /// List the accepted linear unit tokens
    Units,
}

#[derive(Parser, Debug)]
pub struct LocateArgs {
    /// Input file: an Esri FeatureSet JSON object or a JSON array of Esri geometries
    pub input: PathBuf,

    /// Task to run: "events", "segments" or a task name
    #[arg(long, default_value = "events")]
    pub task: String,

    /// Spatial reference WKID assigned to a geometry array input
    #[arg(long)]
    pub wkid: Option<u32>,

    /// Search radius around each input feature
    #[arg(long)]
    pub radius: Option<f64>,

    /// Units of the search radius (e.g., esriFeet)
    #[arg(long, requires = "radius")]
    pub units: Option<String>,

    /// Route layer to search (WAPR or WAPR w/ FT and TB)
    #[arg(long)]
    pub route_features: Option<String>,

    /// Keep only the closest route location
    #[arg(long)]
    pub keep_closest: bool,

    /// Add a distance field to the output table
    #[arg(long)]
    pub include_distance: bool,

    /// Use M direction for offsetting
    #[arg(long)]
    pub m_direction_offsetting: bool,

    /// Generate an angle field
    #[arg(long)]
    pub angle_field: bool,

    /// Calculated angle type (NORMAL or TANGENT)
    #[arg(long)]
    pub angle_type: Option<String>,

    /// Write the complement of the angle to the angle field
    #[arg(long)]
    pub complement_angle: bool,

    /// Output spatial reference WKID
    #[arg(long)]
    pub out_sr: Option<u32>,

    /// Processing spatial reference WKID
    #[arg(long)]
    pub process_sr: Option<u32>,

    /// Do not request M values in the output
    #[arg(long)]
    pub no_return_m: bool,

    /// Do not request Z values in the output
    #[arg(long)]
    pub no_return_z: bool,
}
