//! Board profile loading
//!
//! The profile is compiled in from `board.toml` (validated by build.rs)
//! and parsed at startup. Falls back to the built-in HydraBus profile if
//! parsing fails.

use defmt::*;

use hydra_core::config::{parse_board, BoardProfile};

/// Embedded board profile (compiled into firmware)
/// Edit board.toml and rebuild to customize
const EMBEDDED_BOARD: &str = include_str!("../board.toml");

/// Load the board profile
pub fn load_board() -> BoardProfile {
    match parse_board(EMBEDDED_BOARD) {
        Ok(profile) => {
            info!("Loaded board profile from board.toml");
            log_profile_summary(&profile);
            profile
        }
        Err(e) => {
            warn!("board.toml parse error: {:?}, using built-in profile", e);
            let profile = BoardProfile::hydrabus();
            log_profile_summary(&profile);
            profile
        }
    }
}

/// Log a summary of the loaded profile
fn log_profile_summary(profile: &BoardProfile) {
    info!("  identity: {}", profile.identity.as_str());
    debug!("  soft I2C: {}", profile.soft_i2c);
    debug!("  {} I2C buses", profile.buses.len());
    debug!("  {} LEDs", profile.indicator_count());
}
