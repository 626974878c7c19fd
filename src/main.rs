use arbo_site::gallery::{
    FsProbe, GalleryLoader, GalleryView, HttpListing, HttpProbe, ListingSource, LoadStatus,
    LocalListing,
};
use arbo_site::generate::{self, LoadedGallery};
use arbo_site::types::GalleryKind;
use arbo_site::{config, listing, output, scan, server};
use clap::{Parser, Subcommand};
use reqwest::Url;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "arbo-site")]
#[command(about = "Site builder and server for a tree-care business website")]
#[command(long_about = "\
Site builder and server for a tree-care business website

Markdown pages become HTML, numbered pages form the navigation, and two
galleries are built from media files on disk.

Content structure:

  content/
  ├── config.toml            # Site config (optional)
  ├── 010-index.md           # Home page
  ├── 020-sluzby.md          # Page (numbered = shown in nav)
  ├── 030-galerie.md         # '@gallery' → photo/video gallery
  ├── 040-certifikaty.md     # '@certificates' → certificates gallery
  ├── 050-facebook.md        # URL-only .md → external nav link
  └── cenik.md               # No number prefix = hidden from nav

  public/
  ├── gallery/images/        # jpg jpeg png gif webp
  ├── gallery/videos/        # mp4 webm ogg mov avi
  └── certificates/          # jpg jpeg png gif webp

Run 'arbo-site gen-config' to generate a documented config.toml.
Set RUST_LOG (e.g. RUST_LOG=arbo_site=debug) for diagnostics.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Public assets directory (gallery media, placeholder, favicon)
    #[arg(long, default_value = "public", global = true)]
    public: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the static site: scan → list → load galleries → generate
    Build,
    /// Validate content and list gallery media without writing anything
    Check,
    /// Serve the built site and the live listing endpoints
    Serve {
        /// Address to bind (overrides server.bind)
        #[arg(long)]
        bind: Option<SocketAddr>,
    },
    /// Run the gallery loader and print every slot as it resolves
    CheckGallery {
        /// Base URL of a running site; loads over HTTP instead of from disk
        #[arg(long)]
        url: Option<Url>,
        /// Load the certificates gallery instead of the photo gallery
        #[arg(long)]
        certificates: bool,
    },
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Build => {
            println!("==> Scanning {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);

            println!("==> Loading galleries from {}", cli.public.display());
            let mut galleries = HashMap::new();
            for kind in [GalleryKind::Photos, GalleryKind::Certificates] {
                let source = LocalListing::new(
                    &cli.public,
                    kind,
                    manifest.config.gallery_for(kind).order,
                );
                let loader =
                    GalleryLoader::new(source, Arc::new(FsProbe::new(&cli.public)), &manifest.config.loader);
                let session = loader.begin().await;
                let entries = session.entries().to_vec();
                let view = session.finish().await;
                galleries.insert(kind, LoadedGallery { entries, view });
            }

            println!("==> Generating HTML \u{2192} {}", cli.output.display());
            let summary = generate::generate(
                &manifest,
                &galleries,
                &cli.public,
                &cli.output,
                chrono::Utc::now(),
            )?;
            output::print_generate_output(&summary, &manifest.config, &cli.output);
            println!("==> Build complete: {}", cli.output.display());
        }
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let manifest = scan::scan(&cli.source)?;
            output::print_scan_output(&manifest, &cli.source);

            let listings: Vec<_> = [GalleryKind::Photos, GalleryKind::Certificates]
                .into_iter()
                .map(|kind| {
                    let order = manifest.config.gallery_for(kind).order;
                    (kind, listing::listing_for(kind, &cli.public, order))
                })
                .collect();
            output::print_listings(&manifest.config, &listings);
            println!("==> Content is valid");
        }
        Command::Serve { bind } => {
            let site_config = config::load_config(&cli.source)?;
            let addr = match bind {
                Some(addr) => addr,
                None => site_config.server.bind.parse()?,
            };
            if !cli.output.join("index.html").exists() {
                tracing::warn!(dist = %cli.output.display(), "no index.html, run `arbo-site build` first");
            }
            output::print_serve_banner(addr, &cli.output, &cli.public);
            let state = server::AppState::new(&cli.public, &cli.output, &site_config);
            server::serve(state, addr).await?;
        }
        Command::CheckGallery { url, certificates } => {
            let site_config = config::load_config(&cli.source)?;
            let kind = if certificates {
                GalleryKind::Certificates
            } else {
                GalleryKind::Photos
            };
            let title = site_config.gallery_for(kind).title.clone();

            let view = match url {
                Some(base) => {
                    let client = reqwest::Client::new();
                    let source = HttpListing::for_gallery(client.clone(), &base, kind)?;
                    let label = source.url().to_string();
                    let probe = HttpProbe::new(client, base);
                    let loader = GalleryLoader::new(source, Arc::new(probe), &site_config.loader);
                    run_gallery_check(&loader, &title, &label).await
                }
                None => {
                    let source =
                        LocalListing::new(&cli.public, kind, site_config.gallery_for(kind).order);
                    let probe = FsProbe::new(&cli.public);
                    let loader = GalleryLoader::new(source, Arc::new(probe), &site_config.loader);
                    run_gallery_check(&loader, &title, &local_label(&cli.public, kind)).await
                }
            };

            if let LoadStatus::Error(message) = view.status() {
                return Err(message.clone().into());
            }
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Diagnostics go to stderr; stdout carries the command output.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("arbo_site=info,tower_http=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Load one gallery, printing each slot as its probe finishes.
async fn run_gallery_check<S: ListingSource>(
    loader: &GalleryLoader<S>,
    title: &str,
    label: &str,
) -> GalleryView {
    println!("{}", output::format_load_started(title, label));
    let mut session = loader.begin().await;
    while let Some(index) = session.next_update().await {
        if let Some(Some(item)) = session.view().slots().get(index) {
            println!("{}", output::format_slot_resolved(index, item));
        }
    }
    let entries = session.entries().to_vec();
    let view = session.finish().await;
    output::print_gallery_view(&view, &entries);
    view
}

fn local_label(public: &Path, kind: GalleryKind) -> String {
    match kind {
        GalleryKind::Photos => format!(
            "{}, {}",
            public.join(listing::GALLERY_IMAGES_DIR).display(),
            public.join(listing::GALLERY_VIDEOS_DIR).display()
        ),
        GalleryKind::Certificates => public.join(listing::CERTIFICATES_DIR).display().to_string(),
    }
}
