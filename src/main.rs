use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt};
use vedha_image::compose::UrlComposer;
use vedha_image::config::{self, ImageConfig};
use vedha_image::output;
use vedha_image::preset::Preset;
use vedha_image::render::ImageRenderer;
use vedha_image::responsive::ResponsiveBuilder;
use vedha_image::transform::TransformationRequest;

/// Transformation flags shared by commands that compose URLs.
#[derive(clap::Args, Clone, Default)]
struct TransformArgs {
    /// Start from a named preset (flags below override its fields)
    #[arg(long)]
    preset: Option<Preset>,
    /// Target width in pixels
    #[arg(long, short = 'w')]
    width: Option<u32>,
    /// Target height in pixels
    #[arg(long, short = 'H')]
    height: Option<u32>,
    /// Encoding quality (1-100)
    #[arg(long, short = 'q')]
    quality: Option<u32>,
    /// Output format: webp, jpeg, png, avif, auto
    #[arg(long, short = 'f')]
    format: Option<String>,
    /// Fit mode: scale-down, contain, cover, crop, pad
    #[arg(long)]
    fit: Option<String>,
    /// Focus point: auto, center, face, top, bottom, left, right, side
    #[arg(long)]
    gravity: Option<String>,
    /// Blur radius
    #[arg(long)]
    blur: Option<u32>,
}

impl TransformArgs {
    fn request(&self, default_quality: u32) -> TransformationRequest {
        let base = self
            .preset
            .map(|p| p.request(default_quality))
            .unwrap_or_default();
        let mut overlay = TransformationRequest::new();
        if let Some(w) = self.width {
            overlay = overlay.with_width(w);
        }
        if let Some(h) = self.height {
            overlay = overlay.with_height(h);
        }
        if let Some(q) = self.quality {
            overlay = overlay.with_quality(q);
        }
        if let Some(f) = &self.format {
            overlay = overlay.with_format(f.as_str());
        }
        if let Some(fit) = &self.fit {
            overlay = overlay.with_fit(fit.as_str());
        }
        if let Some(g) = &self.gravity {
            overlay = overlay.with_gravity(g.as_str());
        }
        if let Some(b) = self.blur {
            overlay = overlay.with_blur(b);
        }
        base.merge(&overlay)
    }
}

#[derive(Parser)]
#[command(name = "vedha-image")]
#[command(about = "Compose CDN image URLs, srcsets and lazy-image markup for the storefront")]
#[command(long_about = "\
Compose CDN image URLs, srcsets and lazy-image markup for the storefront

Stored references are either absolute URLs or storage keys:

  products/kanjivaram-red.jpg                  storage key
  /banners/diwali.jpg                          leading slash is dropped
  https://pub-1234.r2.dev/products/a.jpg       absolute (kept or rebased)

URL shapes by convention:

  path-segment   {origin}/w-400,q-80,f-webp/{key}
  query-string   {origin}/{key}?width=400&quality=80&format=webp
  proxy-options  {origin}/cdn-cgi/image/width=400,quality=80/{key}

Origins come from vedha-image.toml, overridden by VEDHA_IMAGE_BASE_URL and
VEDHA_IMAGE_CDN_URL. Run 'vedha-image gen-config' for a documented config.")]
#[command(version)]
struct Cli {
    /// Config file
    #[arg(long, default_value = "vedha-image.toml", global = true)]
    config: PathBuf,

    /// Log composition decisions to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the delivery URL for a reference
    Url {
        reference: String,
        #[command(flatten)]
        transform: TransformArgs,
    },
    /// Print a responsive srcset for a reference
    Srcset {
        reference: String,
        /// Comma-separated widths (defaults to the preset's or config's widths)
        #[arg(long, value_delimiter = ',')]
        widths: Vec<u32>,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        transform: TransformArgs,
    },
    /// Print the blur-up placeholder and full-resolution URLs
    Placeholder {
        reference: String,
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
        #[command(flatten)]
        transform: TransformArgs,
    },
    /// Print image markup for a reference
    Render {
        reference: String,
        #[arg(long, default_value = "gallery")]
        preset: Preset,
        /// Alt text
        #[arg(long, default_value = "")]
        alt: String,
        /// Emit a <picture> with AVIF and WebP sources
        #[arg(long)]
        picture: bool,
        /// Emit the initial lazy-loading markup (placeholder only)
        #[arg(long, conflicts_with = "picture")]
        lazy: bool,
    },
    /// List presets and their encoded transformations
    Presets,
    /// Load and validate the config, then print the resolved settings
    CheckConfig,
    /// Print a stock vedha-image.toml with all options documented
    GenConfig,
}

fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("vedha_image=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Config file → environment overrides → validation.
fn load_config(path: &std::path::Path) -> Result<ImageConfig, config::ConfigError> {
    let mut config = config::load_config(path)?;
    config::apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Url {
            reference,
            transform,
        } => {
            let config = load_config(&cli.config)?;
            let composer = UrlComposer::from_config(&config);
            let request = transform.request(config.delivery.default_quality);
            println!("{}", composer.compose(&reference, &request));
        }
        Command::Srcset {
            reference,
            widths,
            json,
            transform,
        } => {
            let config = load_config(&cli.config)?;
            let builder = ResponsiveBuilder::from_config(&config);
            let request = transform.request(config.delivery.default_quality);
            let widths: Vec<u32> = if !widths.is_empty() {
                widths
            } else if let Some(preset_widths) = transform.preset.and_then(|p| p.widths()) {
                preset_widths.to_vec()
            } else {
                builder.widths().to_vec()
            };
            let set = builder.srcset(&reference, &widths, &request);
            if json {
                println!("{}", serde_json::to_string_pretty(&set)?);
            } else {
                output::print_srcset(&set);
            }
        }
        Command::Placeholder {
            reference,
            json,
            transform,
        } => {
            let config = load_config(&cli.config)?;
            let builder = ResponsiveBuilder::from_config(&config);
            let request = transform.request(config.delivery.default_quality);
            let pair = builder.progressive(&reference, &request);
            if json {
                println!("{}", serde_json::to_string_pretty(&pair)?);
            } else {
                output::print_pair(&pair);
            }
        }
        Command::Render {
            reference,
            preset,
            alt,
            picture,
            lazy,
        } => {
            let config = load_config(&cli.config)?;
            let renderer = ImageRenderer::from_config(&config);
            let markup = if picture {
                renderer.picture(&reference, preset, &alt)
            } else if lazy {
                renderer.lazy(0, &reference, preset, &alt).render()
            } else {
                renderer.img(&reference, preset, &alt)
            };
            println!("{}", markup.into_string());
        }
        Command::Presets => {
            let config = load_config(&cli.config)?;
            output::print_presets(config.delivery.convention, config.delivery.default_quality);
        }
        Command::CheckConfig => {
            let config = load_config(&cli.config)?;
            output::print_config_summary(&config);
            println!("==> Config is valid");
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
