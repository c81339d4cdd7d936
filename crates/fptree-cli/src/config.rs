//! Merges the configuration file with command-line overrides.
//!
//! Precedence, lowest to highest: built-in defaults, the TOML file named
//! with `--config`, then individual CLI flags.

use crate::cli::BuildArgs;
use crate::error::Result;
use fptree::engine::config::{OutgroupPair, PhylogenyConfig};
use tracing::info;

pub fn resolve(args: &BuildArgs) -> Result<PhylogenyConfig> {
    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from {:?}", path);
            PhylogenyConfig::from_toml_path(path)?
        }
        None => PhylogenyConfig::default(),
    };

    if let Some(scheme) = args.scheme {
        config.scheme = scheme.into();
    }
    if let Some(pair) = &args.outgroup {
        // clap enforces exactly two values.
        config.outgroup = Some(OutgroupPair {
            a: pair[0].clone(),
            b: pair[1].clone(),
        });
    }
    if let Some(offset) = args.wavelength_offset {
        config.style.wavelength_offset = offset;
    }
    if let Some(size) = args.font_size {
        config.style.font_size = size;
    }
    if let Some(width) = args.line_width {
        config.style.line_width = width;
    }

    Ok(config)
}
