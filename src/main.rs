// Allow unused code for designed-but-not-yet-used APIs
// Remove these as the codebase matures
#![allow(dead_code)]

mod animation;
mod display;
mod input;
mod render;
mod settings;
mod util;

use std::path::Path;
use std::time::{Duration, Instant};

use animation::AnimationLoop;
use display::{
    Display, InputEvent, PixelBuffer, RenderTarget, ResizeAdapter, SurfaceGeometry,
    DEFAULT_HEIGHT, DEFAULT_WIDTH,
};
use input::KaleidoscopeControls;
use sdl2::keyboard::Keycode;
use settings::SettingsProfile;
use util::FpsCounter;

/// Profile file consulted when --profile is not given
const DEFAULT_PROFILE: &str = "kaleido.json";

/// How often the window title refreshes with the live parameter readout
const TITLE_REFRESH: Duration = Duration::from_secs(1);

/// Parse command line arguments and return (width, height, vsync, profile path)
fn parse_args() -> (u32, u32, bool, String) {
    let args: Vec<String> = std::env::args().collect();
    let mut width = DEFAULT_WIDTH;
    let mut height = DEFAULT_HEIGHT;
    let mut vsync = true;
    let mut profile = DEFAULT_PROFILE.to_string();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--no-vsync" => vsync = false,
            "--width" | "-w" => {
                if i + 1 < args.len() {
                    if let Ok(w) = args[i + 1].parse::<u32>() {
                        width = w;
                    }
                    i += 1;
                }
            },
            "--height" | "-h" => {
                if i + 1 < args.len() {
                    if let Ok(h) = args[i + 1].parse::<u32>() {
                        height = h;
                    }
                    i += 1;
                }
            },
            "--resolution" | "-r" => {
                if i + 1 < args.len() {
                    // Parse WxH format (e.g., 1920x1080)
                    let parts: Vec<&str> = args[i + 1].split('x').collect();
                    if parts.len() == 2 {
                        if let (Ok(w), Ok(h)) = (parts[0].parse::<u32>(), parts[1].parse::<u32>()) {
                            width = w;
                            height = h;
                        }
                    }
                    i += 1;
                }
            },
            "--profile" | "-p" => {
                if i + 1 < args.len() {
                    profile = args[i + 1].clone();
                    i += 1;
                }
            },
            "--help" => {
                println!("Usage: kaleido [OPTIONS]");
                println!();
                println!("Options:");
                println!(
                    "  --width W, -w W       Set window width (default: {})",
                    DEFAULT_WIDTH
                );
                println!(
                    "  --height H, -h H      Set window height (default: {})",
                    DEFAULT_HEIGHT
                );
                println!("  --resolution WxH, -r WxH  Set resolution (e.g., 1920x1080)");
                println!(
                    "  --profile PATH, -p PATH   Load parameter profile (default: {})",
                    DEFAULT_PROFILE
                );
                println!("  --no-vsync            Disable VSync for uncapped framerate");
                println!("  --help                Show this help message");
                std::process::exit(0);
            },
            _ => {},
        }
        i += 1;
    }

    (width, height, vsync, profile)
}

fn main() -> Result<(), String> {
    let (width, height, vsync, profile_path) = parse_args();

    // A missing profile file is normal. A present-but-broken one is worth a
    // warning before falling back to the built-in defaults.
    let profile = match SettingsProfile::load(&profile_path) {
        Ok(p) => p,
        Err(e) => {
            if Path::new(&profile_path).exists() {
                eprintln!("Failed to load {}: {}", profile_path, e);
            }
            SettingsProfile::default()
        },
    };

    let (mut display, texture_creator) = Display::with_options("kaleido", width, height, vsync)?;

    // Render at drawable resolution, which exceeds the displayed size on
    // high-DPI outputs. Pointer coordinates stay in displayed pixels.
    let (displayed_w, displayed_h) = display.displayed_size();
    let mut resize = ResizeAdapter::new(SurfaceGeometry::from_displayed(
        displayed_w,
        displayed_h,
        display.scale_factor(),
    ));
    let geo = resize.current();
    let mut target = RenderTarget::with_size(&texture_creator, geo.width, geo.height)?;
    let mut buffer = PixelBuffer::with_size(geo.width, geo.height);

    // FPS counter with 60 sample rolling average
    let mut fps_counter = FpsCounter::new(60);

    let mut controls = KaleidoscopeControls::new(profile, displayed_w, displayed_h);
    let mut animation = AnimationLoop::new();
    if animation.mount() {
        animation.tick(&mut buffer, &controls.settings());
    }

    println!("=== kaleido ===");
    println!("Resolution: {}x{}", geo.width, geo.height);
    if vsync {
        println!("VSync: ON (60fps locked). Use --no-vsync for uncapped.");
    } else {
        println!("VSync: OFF (uncapped framerate)");
    }
    println!("Use --help for command line options.");
    println!("Controls:");
    println!("  Drag / hover - Steer the image:");
    println!("                 horizontal sets hue spread,");
    println!("                 vertical trades pulse depth for rotation speed");
    println!("  Multi-button or firm pressure - 1.2x response boost");
    println!("  Arrow keys   - Add or remove mirror slices");
    println!("  R            - Reset parameters to profile defaults");
    println!("  Escape       - Quit");

    let mut last_title = Instant::now();

    'main: loop {
        fps_counter.tick();

        for event in display.poll_events() {
            if let InputEvent::KeyDown(key) = &event {
                if *key == Keycode::Escape {
                    animation.teardown();
                    break 'main;
                }
            }
            if matches!(&event, InputEvent::Quit) {
                animation.teardown();
                break 'main;
            }

            controls.handle_event(&event);

            if let InputEvent::Resized { width, height } = &event {
                if let Some(geo) = resize.observe(*width, *height, display.scale_factor()) {
                    // The buffer always tracks the observed geometry, so a
                    // collapsed window leaves a zero-area buffer behind and
                    // every tick becomes a standstill until size returns
                    buffer = PixelBuffer::with_size(geo.width, geo.height);
                    if !geo.is_quiescent() {
                        target = RenderTarget::with_size(&texture_creator, geo.width, geo.height)?;
                        // Redraw immediately so the resized surface never
                        // presents a stale or empty frame
                        animation.tick(&mut buffer, &controls.settings());
                    }
                }
            }
        }

        animation.tick(&mut buffer, &controls.settings());
        // While the surface is collapsed there is nothing to upload; the
        // texture keeps its last real dimensions until a restore rebuilds it
        if !resize.current().is_quiescent() {
            display.present(&mut target, &buffer)?;
        }

        // Title bar doubles as the parameter readout
        if last_title.elapsed() >= TITLE_REFRESH {
            let view = controls.formatted();
            display.set_title(&format!(
                "kaleido - {} slices | {} | hue {} | pulse {} | {:.0} fps",
                view.slice_count,
                view.rotation,
                view.hue_variance,
                view.pulse,
                fps_counter.avg_fps()
            ))?;
            last_title = Instant::now();
        }
    }

    Ok(())
}
