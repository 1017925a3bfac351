use super::app_config::LogLevel;
use crate::domain::entities::{MediaKind, ThumbnailSize};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "thumbcache",
    version,
    about = "Resolve, cache and export media thumbnails",
    long_about = None
)]
pub struct CliArgs {
    /// Configuration file path.
    #[arg(short, long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Log file path.
    #[arg(long, value_name = "PATH", global = true)]
    pub log_path: Option<PathBuf>,

    /// Log verbosity level.
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Thumbnail cache directory.
    #[arg(long, value_name = "PATH", global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Display scale (pixels per point).
    #[arg(long, global = true)]
    pub scale: Option<f64>,

    /// Shorter screen side in points.
    #[arg(long, global = true)]
    pub screen_side: Option<f64>,

    /// Size grid thumbnails for a tablet layout.
    #[arg(long, global = true)]
    pub tablet: bool,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a thumbnail through the cache, local export and network.
    Resolve(ResolveArgs),
    /// Print the pixel size a thumbnail would be generated at.
    TargetSize(TargetSizeArgs),
    /// Remove every cached thumbnail.
    ClearCache,
    /// Write the effective settings, including global overrides, to the config file.
    SaveConfig,
}

/// Arguments of `resolve`.
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Stable media identifier used for the cache key.
    #[arg(long)]
    pub id: String,

    /// Media kind.
    #[arg(long, value_enum, default_value_t = MediaKind::Image)]
    pub kind: MediaKind,

    /// Local file to export the thumbnail from.
    #[arg(long, value_name = "PATH")]
    pub local: Option<PathBuf>,

    /// Remote file URL.
    #[arg(long)]
    pub url: Option<String>,

    /// Server-computed thumbnail URL.
    #[arg(long)]
    pub thumbnail_url: Option<String>,

    /// Original width in pixels.
    #[arg(long, requires = "height")]
    pub width: Option<u32>,

    /// Original height in pixels.
    #[arg(long, requires = "width")]
    pub height: Option<u32>,

    /// Thumbnail size class.
    #[arg(long, value_enum, default_value_t = ThumbnailSize::Small)]
    pub size: ThumbnailSize,

    /// Write the decoded thumbnail to this file.
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Treat the media as a stub and fetch its record first.
    #[arg(long)]
    pub stub: bool,

    /// Server media ID of a stub.
    #[arg(long, requires = "stub")]
    pub remote_id: Option<u64>,

    /// Server site ID.
    #[arg(long)]
    pub site_id: Option<u64>,

    /// Site is hosted on WordPress.com.
    #[arg(long)]
    pub wpcom: bool,

    /// Site is a private WordPress.com site.
    #[arg(long, requires = "wpcom")]
    pub private: bool,

    /// OAuth bearer token.
    #[arg(long, env = "THUMBCACHE_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// HTTP basic auth username.
    #[arg(long, requires = "basic_password")]
    pub basic_user: Option<String>,

    /// HTTP basic auth password.
    #[arg(long, env = "THUMBCACHE_BASIC_PASSWORD", hide_env_values = true)]
    pub basic_password: Option<String>,
}

/// Arguments of `target-size`.
#[derive(Debug, Args)]
pub struct TargetSizeArgs {
    /// Original width in pixels.
    #[arg(long)]
    pub width: u32,

    /// Original height in pixels.
    #[arg(long)]
    pub height: u32,

    /// Box width in pixels. Defaults to the display's box for `--size`.
    #[arg(long, requires = "box_height")]
    pub box_width: Option<u32>,

    /// Box height in pixels.
    #[arg(long, requires = "box_width")]
    pub box_height: Option<u32>,

    /// Thumbnail size class used when no box is given.
    #[arg(long, value_enum, default_value_t = ThumbnailSize::Small)]
    pub size: ThumbnailSize,
}
