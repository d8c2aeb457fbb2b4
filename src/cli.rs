use crate::config::{
    parse_resolution, Config, KEY_EDITOR, KEY_FULLSCREEN, KEY_RES_HEIGHT, KEY_RES_WIDTH, KEY_SCALE,
};
use anyhow::{bail, Context, Result};
use clap::Parser;

/// C-Dogs SDL - display mode manager
#[derive(Parser, Debug)]
#[command(name = "cdogs")]
#[command(version)]
#[command(about = "C-Dogs SDL - classic overhead run-and-gun", long_about = None)]
pub struct Cli {
    /// Logical resolution (e.g., 320x240)
    #[arg(short, long, value_name = "WIDTHxHEIGHT")]
    pub res: Option<String>,

    /// Scale factor between logical and physical pixels (1-4)
    #[arg(short, long, value_name = "FACTOR")]
    pub scale: Option<i32>,

    /// Enable fullscreen mode
    #[arg(short, long)]
    pub fullscreen: bool,

    /// Enable windowed mode
    #[arg(short, long, conflicts_with = "fullscreen")]
    pub windowed: bool,

    /// Run with editor settings (skips mode validation)
    #[arg(long)]
    pub editor: bool,

    /// Apply the configured mode even if it is not in the mode list
    #[arg(long)]
    pub force: bool,

    /// Print the supported modes and exit
    #[arg(long)]
    pub list_modes: bool,

    /// Configuration directory path
    #[arg(short, long, value_name = "CONFIGDIR")]
    pub configdir: Option<String>,

    /// Data directory holding the window icon
    #[arg(short = 'd', long, value_name = "CONTENTDIR")]
    pub contentdir: Option<String>,

    /// Log file path
    #[arg(short, long, value_name = "FILE")]
    pub logfile: Option<String>,

    /// Log level (0 = nothing .. 6 = all)
    #[arg(long, value_name = "LEVEL", default_value_t = 4)]
    pub loglevel: i32,
}

impl Cli {
    /// Merge CLI arguments over the loaded config
    pub fn merge_into_config(&self, mut config: Config) -> Result<Config> {
        if let Some(ref res) = self.res {
            let res = parse_resolution(res).context("Invalid resolution format")?;
            config.set_int(KEY_RES_WIDTH, res.width);
            config.set_int(KEY_RES_HEIGHT, res.height);
        }

        if let Some(scale) = self.scale {
            if !(1..=4).contains(&scale) {
                bail!("Scale factor must be between 1 and 4");
            }
            config.set_int(KEY_SCALE, scale);
        }

        if self.fullscreen {
            config.set_bool(KEY_FULLSCREEN, true);
        }
        if self.windowed {
            config.set_bool(KEY_FULLSCREEN, false);
        }
        if self.editor {
            config.set_bool(KEY_EDITOR, true);
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let cli = Cli::parse_from(["cdogs", "--res", "640x480", "--scale", "2", "-f"]);
        assert_eq!(cli.res.as_deref(), Some("640x480"));
        assert_eq!(cli.scale, Some(2));
        assert!(cli.fullscreen);
        assert_eq!(cli.loglevel, 4);
    }

    #[test]
    fn test_fullscreen_conflicts_with_windowed() {
        assert!(Cli::try_parse_from(["cdogs", "-f", "-w"]).is_err());
    }

    #[test]
    fn test_merge_into_config() {
        let cli = Cli::parse_from(["cdogs", "--res", "400x300", "--scale", "1", "--editor"]);
        let config = cli.merge_into_config(Config::default()).unwrap();
        assert_eq!(config.get_int(KEY_RES_WIDTH), 400);
        assert_eq!(config.get_int(KEY_RES_HEIGHT), 300);
        assert_eq!(config.get_int(KEY_SCALE), 1);
        assert!(config.get_bool(KEY_EDITOR));
        assert!(!config.get_bool(KEY_FULLSCREEN));
    }

    #[test]
    fn test_windowed_overrides_config() {
        let mut base = Config::default();
        base.set_bool(KEY_FULLSCREEN, true);
        let cli = Cli::parse_from(["cdogs", "--windowed"]);
        let config = cli.merge_into_config(base).unwrap();
        assert!(!config.get_bool(KEY_FULLSCREEN));
    }

    #[test]
    fn test_merge_rejects_bad_values() {
        let cli = Cli::parse_from(["cdogs", "--res", "640by480"]);
        assert!(cli.merge_into_config(Config::default()).is_err());
        let cli = Cli::parse_from(["cdogs", "--scale", "5"]);
        assert!(cli.merge_into_config(Config::default()).is_err());
    }

    #[test]
    fn test_no_args_keeps_config() {
        let cli = Cli::parse_from(["cdogs"]);
        let config = cli.merge_into_config(Config::default()).unwrap();
        assert_eq!(config, Config::default());
    }
}
