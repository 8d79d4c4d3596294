//! Build script for tivablink-firmware
//!
//! - Sets up linker search paths and scripts for memory.x and device.x
//! - Validates board.toml at compile time and turns it into a constant

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Longest timer period in ticks (24-bit counter)
const MAX_PERIOD_TICKS: i64 = 1 << 24;

/// Lowest implemented priority level (3 priority bits)
const LOWEST_PRIORITY: i64 = 7;

/// Validated contents of board.toml
struct BoardConfig {
    core_hz: u32,
    toggle_period_ms: u32,
    port_priority: u8,
}

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    setup_linker(&out_dir);
    let config = validate_config();
    write_config(&out_dir, &config);
}

/// Set up linker search paths and scripts
fn setup_linker(out_dir: &Path) {
    // Copy the linker fragments to the output directory
    for (name, contents) in [
        ("memory.x", &include_bytes!("memory.x")[..]),
        ("device.x", &include_bytes!("device.x")[..]),
    ] {
        let mut f = File::create(out_dir.join(name)).unwrap();
        f.write_all(contents).unwrap();
    }

    // Tell rustc where to find them
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    if env::var_os("CARGO_FEATURE_DEFMT").is_some() {
        println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=device.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate board.toml and return its values
fn validate_config() -> BoardConfig {
    println!("cargo:rerun-if-changed=board.toml");

    let config_path = Path::new("board.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: board.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a board.toml configuration file.          ║\n\
            ║  Please create one in the tivablink-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read board.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in board.toml                        ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let mut errors = Vec::new();

    let core_hz = integer(&config, "clock", "core_hz", 1, u32::MAX as i64, &mut errors);
    let toggle_period_ms = integer(
        &config,
        "blink",
        "toggle_period_ms",
        1,
        u32::MAX as i64,
        &mut errors,
    );
    let port_priority = integer(
        &config,
        "interrupts",
        "port_priority",
        0,
        LOWEST_PRIORITY,
        &mut errors,
    );

    if let (Some(hz), Some(ms)) = (core_hz, toggle_period_ms) {
        let ticks = hz * ms / 1000;
        if ticks == 0 {
            errors.push(format!(
                "[blink] toggle_period_ms = {} is shorter than one clock tick",
                ms
            ));
        } else if ticks > MAX_PERIOD_TICKS {
            errors.push(format!(
                "[blink] toggle_period_ms must be at most {} at {} Hz",
                MAX_PERIOD_TICKS * 1000 / hz,
                hz
            ));
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid board configuration                              ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=board.toml validated successfully");

    // Every field is present and in range once `errors` is empty
    BoardConfig {
        core_hz: core_hz.unwrap_or_default() as u32,
        toggle_period_ms: toggle_period_ms.unwrap_or_default() as u32,
        port_priority: port_priority.unwrap_or_default() as u8,
    }
}

/// Look up `[section] key` as an integer in `min..=max`
fn integer(
    config: &toml::Value,
    section: &str,
    key: &str,
    min: i64,
    max: i64,
    errors: &mut Vec<String>,
) -> Option<i64> {
    let table = match config.get(section) {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push(format!("[{}] must be a table", section));
            return None;
        }
        None => {
            errors.push(format!("Missing [{}] section", section));
            return None;
        }
    };

    match table.get(key) {
        Some(toml::Value::Integer(v)) if (min..=max).contains(v) => Some(*v),
        Some(toml::Value::Integer(_)) => {
            errors.push(format!("[{}] {} must be {}-{}", section, key, min, max));
            None
        }
        Some(_) => {
            errors.push(format!("[{}] {} must be an integer", section, key));
            None
        }
        None => {
            errors.push(format!("[{}] missing '{}'", section, key));
            None
        }
    }
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Emit the validated configuration as a `BlinkConfig` constant
fn write_config(out_dir: &Path, config: &BoardConfig) {
    let mut f = File::create(out_dir.join("board_config.rs")).unwrap();
    writeln!(f, "/// Configuration from board.toml").unwrap();
    writeln!(f, "pub const BOARD_CONFIG: BlinkConfig = BlinkConfig {{").unwrap();
    writeln!(f, "    core_clock_hz: {},", config.core_hz).unwrap();
    writeln!(f, "    toggle_period_ms: {},", config.toggle_period_ms).unwrap();
    writeln!(f, "    port_priority: {},", config.port_priority).unwrap();
    writeln!(f, "}};").unwrap();
}
