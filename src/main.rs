use anyhow::{Context, Result};
use clap::Parser;
use sdl2::keyboard::Keycode;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;

use cdogs_rust::cli::Cli;
use cdogs_rust::config::{self, Config, KEY_FULLSCREEN};
use cdogs_rust::graphics::sdl::{HostEvent, SdlHost};
use cdogs_rust::graphics::{mode_str, DisplayHost, GraphicsDevice};
use cdogs_rust::logging::{self, LogLevel};

const FRAME_TIME: Duration = Duration::from_millis(16);

/// Data directory used when none is given on the command line
const DEFAULT_DATA_DIR: &str = "graphics";

fn main() -> Result<()> {
    let cli = Cli::parse();

    logging::log_init(
        LogLevel::from_i32(cli.loglevel),
        cli.logfile.as_deref().map(Path::new),
    )
    .context("Failed to initialize logging")?;
    log::info!("C-Dogs SDL {} starting", env!("CARGO_PKG_VERSION"));

    let config = config::load_config(&cli.configdir)?;
    let mut config = cli.merge_into_config(config)?;

    let data_dir = cli
        .contentdir
        .as_deref()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

    let host = SdlHost::new().context("Failed to start video")?;
    let mut device = GraphicsDevice::new(host, &config, data_dir);
    let initialized = device.initialize(cli.force);

    if cli.list_modes {
        for (index, mode) in device.catalog().iter().enumerate() {
            let marker = if index == device.mode_index() { '*' } else { ' ' };
            println!("{} {}", marker, mode);
        }
        device.terminate();
        return Ok(());
    }

    initialized.context("Failed to set graphics mode")?;
    log::info!("Running at {}", mode_str(&config));

    run(&mut device, &mut config);

    config
        .save(&config::config_path(&cli.configdir))
        .context("Failed to save config")?;
    device.terminate();
    Ok(())
}

/// Main loop: Left/Right cycle modes, F toggles fullscreen, Escape quits.
fn run(device: &mut GraphicsDevice<SdlHost>, config: &mut Config) {
    let mut frame: u32 = 0;
    loop {
        for event in device.host_mut().poll_events() {
            match event {
                HostEvent::Quit | HostEvent::KeyDown(Keycode::Escape) => return,
                HostEvent::KeyDown(Keycode::Right) => {
                    if device.mode_next(config).is_some() {
                        log::info!("Selected {}", mode_str(config));
                    }
                }
                HostEvent::KeyDown(Keycode::Left) => {
                    if device.mode_prev(config).is_some() {
                        log::info!("Selected {}", mode_str(config));
                    }
                }
                HostEvent::KeyDown(Keycode::F) => {
                    let fullscreen = !config.get_bool(KEY_FULLSCREEN);
                    config.set_bool(KEY_FULLSCREEN, fullscreen);
                }
                _ => {}
            }
        }

        device.apply_from_config(config);
        let rebuild = frame == 0 || device.cached_config().needs_restart;
        if device.initialize(false).is_err() {
            // Fall back to the last mode that worked; rendering resumes once
            // a later rebuild succeeds.
            if device.revert_config(config) {
                log::warn!("Reverting to {}", mode_str(config));
                device.apply_from_config(config);
            }
            thread::sleep(FRAME_TIME);
            continue;
        }
        if rebuild {
            draw_background(device);
        }

        device.restore_background();
        draw_marker(device, frame);
        if let Err(err) = device.present() {
            log::error!("Failed to present frame: {}", err);
        }

        frame = frame.wrapping_add(1);
        thread::sleep(FRAME_TIME);
    }
}

fn draw_background<H: DisplayHost>(device: &mut GraphicsDevice<H>) {
    let width = device.applied_res().x.max(1) as usize;
    let amask = device.amask();
    for (i, pixel) in device.bkg_mut().iter_mut().enumerate() {
        let (x, y) = (i % width, i / width);
        let shade: u32 = if (x / 16 + y / 16) % 2 == 0 { 0x30 } else { 0x50 };
        *pixel = amask | shade << 16 | shade << 8 | shade;
    }
}

/// Sweep a vertical bar across the clip rectangle.
fn draw_marker<H: DisplayHost>(device: &mut GraphicsDevice<H>, frame: u32) {
    let clip = device.clip();
    let span = clip.right - clip.left + 1;
    if span <= 0 {
        return;
    }
    let x = clip.left + (frame % span as u32) as i32;
    let width = device.applied_res().x.max(0) as usize;
    let color = device.amask() | 0x00FF_C000;
    let buf = device.buf_mut();
    for y in clip.top..=clip.bottom {
        if let Some(pixel) = buf.get_mut(y as usize * width + x as usize) {
            *pixel = color;
        }
    }
}
