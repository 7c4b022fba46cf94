mod cli;

use mediasift::analysis::{AnalysisInput, FileAnalysis};
use mediasift_core::{Config, TrackKind};
use mediasift_reconcile::TagMapSet;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "mediasift=debug,mediasift_bitrate=debug,mediasift_select=debug,mediasift_reconcile=debug,mediasift_core=debug".to_string()
        } else {
            "mediasift=info,mediasift_reconcile=warn,mediasift_core=warn".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze { input, json } => analyze_file(&input, cli.config.as_deref(), json),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("mediasift {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

fn analyze_file(input: &Path, config_path: Option<&Path>, json: bool) -> Result<()> {
    let config = Config::load_or_default(config_path);
    let analysis = FileAnalysis::new(&config);
    for warning in analysis.config_warnings() {
        tracing::warn!("config: {warning}");
    }

    if !input.exists() {
        anyhow::bail!("Input file does not exist: {:?}", input);
    }

    let contents = std::fs::read_to_string(input)
        .with_context(|| format!("failed to read {}", input.display()))?;
    let analysis_input = AnalysisInput::from_json(&contents)
        .with_context(|| format!("failed to parse analysis input {}", input.display()))?;
    analysis_input
        .validate()
        .with_context(|| format!("invalid analysis input {}", input.display()))?;

    tracing::info!("Analyzing {}", input.display());
    let mut tag_maps = TagMapSet::new();
    let report = analysis.run(analysis_input, &mut tag_maps);

    if json {
        let output = serde_json::json!({
            "report": report,
            "tag_maps": tag_maps,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("File: {}", input.display());
        println!("{report}");
        if !tag_maps.is_empty() {
            println!("\nFormat consensus:");
            for kind in TrackKind::ALL {
                for entry in tag_maps.entries(kind) {
                    let marker = if entry.is_unanimous() { " " } else { "!" };
                    println!("  {marker} {kind}: {entry}");
                }
            }
        }
    }

    Ok(())
}

fn validate_config(path: Option<&Path>) -> Result<()> {
    let config = match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = Config::load(p)
                .with_context(|| format!("failed to load config {}", p.display()))?;
            println!("✓ Configuration is valid");
            config
        }
        None => {
            println!("No config file specified, using defaults");
            Config::default()
        }
    };

    println!(
        "  Bitrate: video stream {}, audio stream {}, threshold {}",
        config.bitrate.video_stream_index,
        config.bitrate.audio_stream_index,
        if config.bitrate.max_bytes_per_second > 0 {
            mediasift_bitrate::sampler::format_bitrate(config.bitrate.max_bytes_per_second)
        } else {
            "disabled".to_string()
        }
    );
    println!("  Keep languages: {}", config.languages.keep.join(", "));
    println!("  Default language: {}", config.languages.default_language);
    println!("  Keep undefined: {}", config.languages.keep_undefined);
    println!("  Remove flags: {}", config.languages.remove_flags);

    let warnings = FileAnalysis::new(&config).config_warnings();
    if !warnings.is_empty() {
        println!("\nWarnings:");
        for warning in &warnings {
            println!("  - {warning}");
        }
    }

    Ok(())
}
