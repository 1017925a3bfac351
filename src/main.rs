use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Result, eyre};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use thumbcache::application::{FetchThumbnailUseCase, ThumbnailRequest, ThumbnailResolver};
use thumbcache::domain::entities::{MediaAsset, PixelSize, SiteAuth, SiteRef};
use thumbcache::domain::services::target_pixel_size;
use thumbcache::infrastructure::config::{Command, ResolveArgs, TargetSizeArgs};
use thumbcache::infrastructure::http::build_client;
use thumbcache::infrastructure::{
    AppConfig, CliArgs, DiskThumbnailStore, HttpMediaTransport, ImageThumbnailExporter,
    MemoryThumbnailCache, StorageManager, WpComMediaRepository,
};

fn init_logging(config: &AppConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.to_string()));

    if let Some(log_path) = config.effective_log_path() {
        if let Some(parent) = log_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)?;

        let file_layer = fmt::layer()
            .with_writer(file)
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(file_layer)
            .init();

        info!(path = %log_path.display(), "Logging initialized");
    } else {
        let stderr_layer = fmt::layer().with_writer(std::io::stderr);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
    }

    Ok(())
}

fn load_config(storage: &StorageManager, args: &CliArgs) -> Result<AppConfig> {
    let mut config = storage.load_config(args.config.as_deref())?;
    config.merge_with_args(args);
    Ok(config)
}

async fn open_store(config: &AppConfig) -> Result<DiskThumbnailStore> {
    let cache_dir = config
        .effective_cache_dir()
        .ok_or_else(|| eyre!("no cache directory available; pass --cache-dir"))?;
    let store = DiskThumbnailStore::new(cache_dir).await?;
    store.migrate_if_needed().await?;
    Ok(store)
}

fn site_from_args(args: &ResolveArgs) -> SiteRef {
    let auth = match (&args.basic_user, &args.token) {
        (Some(user), _) => SiteAuth::basic(user, args.basic_password.clone().unwrap_or_default()),
        (None, Some(token)) => SiteAuth::bearer(token),
        (None, None) => SiteAuth::Anonymous,
    };
    SiteRef {
        site_id: args.site_id,
        is_hosted_at_wpcom: args.wpcom,
        is_private_at_wpcom: args.private,
        auth,
    }
}

fn asset_from_args(args: &ResolveArgs) -> MediaAsset {
    let mut asset = MediaAsset::new(args.id.clone(), args.kind, site_from_args(args));
    if let (Some(width), Some(height)) = (args.width, args.height) {
        asset = asset.with_dimensions(width, height);
    }
    if let Some(local) = &args.local {
        asset = asset.with_local_path(local);
    }
    if let Some(url) = &args.url {
        asset = asset.with_remote_url(url);
    }
    if let Some(url) = &args.thumbnail_url {
        asset = asset.with_remote_thumbnail_url(url);
    }
    if args.stub {
        asset = asset.as_stub(args.remote_id);
    }
    asset
}

async fn run_resolve(config: &AppConfig, args: ResolveArgs) -> Result<()> {
    let store = Arc::new(open_store(config).await?);
    let exporter = Arc::new(ImageThumbnailExporter::new(store.export_dir()));
    let client = build_client(config.request_timeout())?;
    let transport = Arc::new(HttpMediaTransport::with_client(client.clone()));
    let repository = Arc::new(WpComMediaRepository::with_client(client, &config.api_base));

    let resolver = ThumbnailResolver::new(store, exporter, transport, config.display)
        .with_memory_cache(Arc::new(MemoryThumbnailCache::new(config.memory_cache_size)))
        .with_repository(repository);
    let use_case = FetchThumbnailUseCase::new(Arc::new(resolver));

    let mut request = ThumbnailRequest::new(asset_from_args(&args), args.size);
    if let Some(output) = args.output {
        request = request.with_output(output);
    }

    let response = use_case.execute(request).await?;
    println!("{response}");
    Ok(())
}

fn run_target_size(config: &AppConfig, args: &TargetSizeArgs) {
    let box_size = match (args.box_width, args.box_height) {
        (Some(width), Some(height)) => PixelSize::new(width, height),
        _ => config.display.preferred_box(args.size),
    };
    let target = target_pixel_size(PixelSize::new(args.width, args.height), box_size);
    println!("{target}");
}

async fn run_clear_cache(config: &AppConfig) -> Result<()> {
    let store = open_store(config).await?;
    let (count, bytes) = (store.len(), store.current_size());
    store.clear().await?;
    info!(count, bytes, "Cleared thumbnail cache");
    println!("Removed {count} thumbnails ({bytes} bytes)");
    Ok(())
}

fn run_save_config(storage: &StorageManager, config: &AppConfig) -> Result<()> {
    let path = storage.save_config(config, config.config.as_deref())?;
    info!(path = %path.display(), "Saved configuration");
    println!("Saved configuration to {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = CliArgs::parse();
    let storage = StorageManager::new()?;
    let config = load_config(&storage, &args)?;

    init_logging(&config)?;

    info!(version = thumbcache::VERSION, "Starting thumbcache");

    match args.command {
        Command::Resolve(resolve) => run_resolve(&config, resolve).await,
        Command::TargetSize(target) => {
            run_target_size(&config, &target);
            Ok(())
        }
        Command::ClearCache => run_clear_cache(&config).await,
        Command::SaveConfig => run_save_config(&storage, &config),
    }
}
