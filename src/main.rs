use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};

use streetscape::layout::{recalculate, Segment, SegmentId, Street, Units, DEFAULT_STREET_WIDTH};
use streetscape::render::{draw_street_thumbnail, PlaceholderAtlas, Raster, ThumbnailOptions};

#[derive(Parser)]
#[command(name = "streetscape")]
#[command(about = "Street cross-section layout and thumbnail renderer")]
struct Cli {
    /// Output PNG path
    #[arg(long, default_value = "street.png")]
    output: String,

    /// Thumbnail width in design pixels
    #[arg(long, default_value = "960")]
    width: u32,

    /// Thumbnail height in design pixels
    #[arg(long, default_value = "480")]
    height: u32,

    /// Device pixel density of the output raster
    #[arg(long, default_value = "1.0")]
    dpi: f64,

    /// Design-to-output scale applied to layout math
    #[arg(long, default_value = "0.5")]
    multiplier: f64,

    /// Flatten the finished image to a single tint
    #[arg(long)]
    silhouette: bool,

    /// Skip the sky fill and horizon bands
    #[arg(long)]
    transparent_sky: bool,

    /// Draw per-segment width and name labels
    #[arg(long)]
    labels: bool,

    /// Draw the street name plate
    #[arg(long)]
    street_name: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut street = demo_street();
    recalculate(&mut street);

    info!(
        "Street '{}': width {}, occupied {}, remaining {}",
        street.name.as_deref().unwrap_or("Unnamed St"),
        street.width,
        street.occupied_width,
        street.remaining_width
    );
    for segment in &street.segments {
        if segment.warnings.any() {
            warn!(
                "Segment '{}' ({} wide): outside={} too_small={} too_large={}",
                segment.kind,
                segment.width,
                segment.warnings.outside,
                segment.warnings.width_too_small,
                segment.warnings.width_too_large
            );
        }
    }

    let options = ThumbnailOptions {
        multiplier: cli.multiplier,
        silhouette: cli.silhouette,
        bottom_aligned: false,
        transparent_sky: cli.transparent_sky,
        segment_names_and_widths: cli.labels,
        street_name: cli.street_name,
    };

    let atlas = PlaceholderAtlas::demo();
    let device_width = (cli.width as f64 * cli.dpi).round() as u32;
    let device_height = (cli.height as f64 * cli.dpi).round() as u32;
    let mut raster = Raster::new(device_width, device_height);

    draw_street_thumbnail(
        &atlas,
        &mut raster,
        &street,
        cli.width as f64,
        cli.height as f64,
        cli.dpi,
        &options,
    )?;

    let img = raster.into_image();
    img.save(&cli.output)
        .with_context(|| format!("Failed to write '{}'", cli.output))?;

    info!("Wrote {}x{} thumbnail to {}", img.width(), img.height(), cli.output);
    Ok(())
}

/// A demonstration street exercising every segment kind and both building
/// styles
fn demo_street() -> Street {
    let mut street = Street::new(DEFAULT_STREET_WIDTH, Units::Imperial);
    street.name = Some("Sample Street".to_string());
    street.left_building_variant = "wide".to_string();
    street.left_building_height = 4;
    street.right_building_variant = "residential".to_string();
    street.right_building_height = 3;

    let plan: &[(&str, &str, f64)] = &[
        ("sidewalk", "dense", 6.0),
        ("sidewalk-tree", "big", 4.0),
        ("bike-lane", "inbound|regular", 6.0),
        ("parking-lane", "inbound|left", 8.0),
        ("drive-lane", "inbound|car", 10.0),
        ("turn-lane", "inbound|left", 10.0),
        ("drive-lane", "outbound|car", 10.0),
        ("bus-lane", "inbound|regular", 12.0),
        ("sidewalk-tree", "big", 4.0),
        ("sidewalk", "dense", 10.0),
    ];

    for (i, (kind, variant, width)) in plan.iter().enumerate() {
        street.segments.push(Segment::new(
            SegmentId(i as u64),
            kind,
            variant,
            *width,
            i as u64 * 31 + 7,
        ));
    }

    street
}
