//! Build script for hydra-firmware
//!
//! - Passes the cortex-m-rt and defmt linker scripts
//! - Validates board.toml at compile time

use std::fs;
use std::path::Path;

fn main() {
    setup_linker();
    validate_board();
}

/// Linker scripts; memory.x itself comes from embassy-stm32's `memory-x`
fn setup_linker() {
    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate board.toml at compile time
fn validate_board() {
    println!("cargo:rerun-if-changed=board.toml");

    let board_path = Path::new("board.toml");

    let content = match fs::read_to_string(board_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read board.toml", &[e.to_string()]),
    };

    let board: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in board.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_identity(&board, &mut errors);
    validate_buses(&board, &mut errors);
    validate_leds(&board, &mut errors);

    if !errors.is_empty() {
        fail("Invalid board configuration", &errors);
    }

    println!("cargo:warning=board.toml validated successfully");
}

/// Abort the build with a boxed error listing
fn fail(title: &str, lines: &[String]) -> ! {
    let body = lines
        .iter()
        .map(|line| {
            // Lines may hold non-ASCII names
            let truncated = if line.chars().count() > 62 {
                format!("{}...", line.chars().take(59).collect::<String>())
            } else {
                line.clone()
            };
            format!("║  • {:<62} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n");

    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<57}║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title, body
    );
}

fn validate_identity(board: &toml::Value, errors: &mut Vec<String>) {
    match board.get("board").and_then(|b| b.get("identity")) {
        Some(toml::Value::String(id)) if id.is_empty() => {
            errors.push("[board] identity cannot be empty".to_string());
        }
        Some(toml::Value::String(id)) if id.len() > 48 => {
            errors.push("[board] identity longer than 48 bytes".to_string());
        }
        Some(toml::Value::String(_)) => {}
        _ => errors.push("[board] missing 'identity' string".to_string()),
    }
}

fn validate_buses(board: &toml::Value, errors: &mut Vec<String>) {
    let buses = match board.get("i2c") {
        Some(toml::Value::Table(t)) => t,
        Some(_) => {
            errors.push("[i2c] must be a table of [i2c.<id>] sections".to_string());
            return;
        }
        None => return,
    };

    if buses.len() > 4 {
        errors.push(format!("at most 4 I2C buses, found {}", buses.len()));
    }

    let mut names = Vec::new();
    for (id, bus) in buses {
        if id.parse::<u8>().is_err() {
            errors.push(format!("[i2c.{}] id must be 0-255", id));
        }

        if let Some(name) = bus.get("name") {
            match name.as_str() {
                Some(n) if !n.is_empty() && n.len() <= 4 => {
                    if names.contains(&n) {
                        errors.push(format!("[i2c.{}] name '{}' used twice", id, n));
                    }
                    names.push(n);
                }
                _ => errors.push(format!("[i2c.{}] name must be 1-4 characters", id)),
            }
        }

        if let Some(freq) = bus.get("frequency") {
            match freq.as_integer() {
                Some(hz) if hz > 0 && hz <= 1_000_000 => {}
                _ => errors.push(format!("[i2c.{}] frequency must be 1-1000000 Hz", id)),
            }
        }
    }
}

fn validate_leds(board: &toml::Value, errors: &mut Vec<String>) {
    let leds = match board.get("led") {
        Some(toml::Value::Table(t)) => t,
        _ => {
            errors.push("Missing [led.*] section - at least one LED is required".to_string());
            return;
        }
    };

    let mut ordinals: Vec<u8> = Vec::new();
    for (ordinal, led) in leds {
        match ordinal.parse::<u8>() {
            Ok(o) if (1..=8).contains(&o) => ordinals.push(o),
            _ => errors.push(format!("[led.{}] ordinal must be 1-8", ordinal)),
        }

        match led.get("pin").and_then(|p| p.as_str()) {
            Some(pin) if is_pin(pin) => {}
            Some(pin) => errors.push(format!("[led.{}] invalid pin '{}'", ordinal, pin)),
            None => errors.push(format!("[led.{}] missing 'pin'", ordinal)),
        }
    }

    ordinals.sort_unstable();
    if ordinals.iter().enumerate().any(|(i, &o)| o as usize != i + 1) {
        errors.push("LED ordinals must run 1..N without gaps".to_string());
    }
}

/// "PA4" or "!PB12"
fn is_pin(s: &str) -> bool {
    let s = s.strip_prefix('!').unwrap_or(s);
    let Some(rest) = s.strip_prefix('P') else {
        return false;
    };
    let mut chars = rest.chars();
    matches!(chars.next(), Some('A'..='I'))
        && chars.as_str().parse::<u8>().map_or(false, |n| n <= 15)
}
