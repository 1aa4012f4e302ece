mod aif;
mod app;
mod export;
mod layout;
mod minimap;
mod paths;
mod search;
mod util;
mod viewport;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use crate::aif::{ExpansionFilters, FileProvider};
use crate::app::{ArgMapApp, ViewerConfig};
use crate::layout::{Direction, Preset};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    #[arg(long)]
    snapshot: PathBuf,

    /// Start from this node's neighborhood instead of the whole snapshot.
    #[arg(long)]
    root: Option<String>,

    #[arg(long, value_enum, default_value = "auto")]
    direction: DirectionArg,

    #[arg(long, value_enum, default_value = "standard")]
    preset: PresetArg,

    #[arg(long, default_value_t = 3)]
    max_expansion_depth: u32,

    #[arg(long)]
    no_expansion: bool,

    #[arg(long)]
    no_supporting: bool,

    #[arg(long)]
    no_opposing: bool,

    #[arg(long)]
    no_preferences: bool,

    #[arg(long)]
    hide_minimap: bool,

    #[arg(long)]
    hide_legend: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DirectionArg {
    Auto,
    Ttb,
    Btt,
    Ltr,
    Rtl,
}

impl DirectionArg {
    fn resolve(self) -> Option<Direction> {
        match self {
            Self::Auto => None,
            Self::Ttb => Some(Direction::TopToBottom),
            Self::Btt => Some(Direction::BottomToTop),
            Self::Ltr => Some(Direction::LeftToRight),
            Self::Rtl => Some(Direction::RightToLeft),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum PresetArg {
    Compact,
    Standard,
    Spacious,
    Horizontal,
}

impl PresetArg {
    fn resolve(self) -> Preset {
        match self {
            Self::Compact => Preset::Compact,
            Self::Standard => Preset::Standard,
            Self::Spacious => Preset::Spacious,
            Self::Horizontal => Preset::Horizontal,
        }
    }
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = ViewerConfig {
        direction: args.direction.resolve(),
        preset: args.preset.resolve(),
        expansion_enabled: !args.no_expansion,
        max_expansion_depth: args.max_expansion_depth,
        filters: ExpansionFilters {
            supporting: !args.no_supporting,
            opposing: !args.no_opposing,
            preferences: !args.no_preferences,
        },
        show_minimap: !args.hide_minimap,
        show_legend: !args.hide_legend,
    };
    let provider = Arc::new(FileProvider::new(args.snapshot, args.root));

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "argmap",
        options,
        Box::new(move |cc| Ok(Box::new(ArgMapApp::new(cc, provider, config)))),
    )
}
