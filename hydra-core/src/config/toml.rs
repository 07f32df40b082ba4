//! Minimal TOML parser for the board profile
//!
//! Handles only the subset `board.toml` uses: no arrays, inline tables or
//! multi-line strings. Needs no allocator.
//!
//! Supported features:
//! - Key = value pairs (string, integer, boolean)
//! - `[board]`, `[i2c.<id>]` and `[led.<ordinal>]` section headers
//! - Comments (# ...), including trailing comments after values
//!
//! NOT supported:
//! - Multi-line strings or escapes
//! - Arrays and inline tables
//! - Dotted keys outside section headers

use heapless::String;
use hydra_hal::I2cConfig;

use super::board::{
    BoardProfile, BusConfig, IndicatorConfig, PinConfig, MAX_BUS_NAME_LEN, MAX_INDICATORS,
};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid or unknown section header
    InvalidSection,
    /// Key not valid in the current section
    UnknownKey,
    /// Invalid value type
    InvalidValue,
    /// Too many items (exceeded heapless capacity)
    TooManyItems,
    /// Invalid pin string
    InvalidPin,
    /// Bus id, bus name or indicator ordinal declared twice
    Duplicate,
    /// Indicator declared without a pin
    MissingPin,
    /// Indicator ordinals do not run 1, 2, ... N
    OrdinalGap,
}

/// Current parsing context
#[derive(Debug, Clone, Copy)]
enum Section {
    Root,
    Board,
    I2c,
    Led,
}

/// Parsed right-hand side of `key = value`
#[derive(Debug, Clone, Copy, PartialEq)]
enum Value<'a> {
    Str(&'a str),
    Int(i64),
    Bool(bool),
}

/// Indicator being built; the pin is mandatory
struct PendingLed {
    ordinal: u8,
    pin: Option<PinConfig>,
    pwm: bool,
}

/// Parse `board.toml` text into a [`BoardProfile`]
pub fn parse_board(input: &str) -> Result<BoardProfile, ParseError> {
    let mut profile = BoardProfile::new();
    let mut section = Section::Root;

    let mut current_bus: Option<BusConfig> = None;
    let mut current_led: Option<PendingLed> = None;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        // Skip empty lines and comments
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            save_section(&mut profile, &mut current_bus, &mut current_led)?;

            section = match parse_section_header(&line[1..line.len() - 1])? {
                Header::Board => Section::Board,
                Header::I2c(id) => {
                    current_bus = Some(BusConfig::new(id));
                    Section::I2c
                }
                Header::Led(ordinal) => {
                    current_led = Some(PendingLed {
                        ordinal,
                        pin: None,
                        pwm: false,
                    });
                    Section::Led
                }
            };
            continue;
        }

        let (key, value) = parse_key_value(line)?;

        match section {
            Section::Root => return Err(ParseError::UnknownKey),
            Section::Board => apply_board_key(&mut profile, key, value)?,
            Section::I2c => {
                if let Some(bus) = current_bus.as_mut() {
                    apply_bus_key(bus, key, value)?;
                }
            }
            Section::Led => {
                if let Some(led) = current_led.as_mut() {
                    apply_led_key(led, key, value)?;
                }
            }
        }
    }

    save_section(&mut profile, &mut current_bus, &mut current_led)?;

    profile
        .indicators
        .as_mut_slice()
        .sort_unstable_by_key(|i| i.ordinal);
    let contiguous = profile
        .indicators
        .iter()
        .enumerate()
        .all(|(i, led)| led.ordinal as usize == i + 1);
    if !contiguous {
        return Err(ParseError::OrdinalGap);
    }

    Ok(profile)
}

enum Header {
    Board,
    I2c(u8),
    Led(u8),
}

fn parse_section_header(header: &str) -> Result<Header, ParseError> {
    let header = header.trim();
    if header == "board" {
        return Ok(Header::Board);
    }

    let (kind, index) = header.split_once('.').ok_or(ParseError::InvalidSection)?;
    let index: u8 = index
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidSection)?;

    match kind.trim() {
        "i2c" => Ok(Header::I2c(index)),
        "led" if index >= 1 && (index as usize) <= MAX_INDICATORS => Ok(Header::Led(index)),
        _ => Err(ParseError::InvalidSection),
    }
}

/// Push the section under construction into the profile
fn save_section(
    profile: &mut BoardProfile,
    current_bus: &mut Option<BusConfig>,
    current_led: &mut Option<PendingLed>,
) -> Result<(), ParseError> {
    if let Some(bus) = current_bus.take() {
        if profile.find_bus(bus.id).is_some() {
            return Err(ParseError::Duplicate);
        }
        if let Some(name) = bus.name.as_deref() {
            if profile.find_bus_by_name(name).is_some() {
                return Err(ParseError::Duplicate);
            }
        }
        profile
            .buses
            .push(bus)
            .map_err(|_| ParseError::TooManyItems)?;
    }

    if let Some(led) = current_led.take() {
        if profile.find_indicator(led.ordinal).is_some() {
            return Err(ParseError::Duplicate);
        }
        let pin = led.pin.ok_or(ParseError::MissingPin)?;
        profile
            .indicators
            .push(IndicatorConfig {
                ordinal: led.ordinal,
                pin,
                pwm: led.pwm,
            })
            .map_err(|_| ParseError::TooManyItems)?;
    }

    Ok(())
}

fn apply_board_key(profile: &mut BoardProfile, key: &str, value: Value) -> Result<(), ParseError> {
    match (key, value) {
        ("identity", Value::Str(s)) => {
            profile.identity = String::try_from(s).map_err(|_| ParseError::InvalidValue)?;
        }
        ("soft_i2c", Value::Bool(b)) => profile.soft_i2c = b,
        ("identity" | "soft_i2c", _) => return Err(ParseError::InvalidValue),
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_bus_key(bus: &mut BusConfig, key: &str, value: Value) -> Result<(), ParseError> {
    match (key, value) {
        ("name", Value::Str(s)) => {
            let name: String<MAX_BUS_NAME_LEN> =
                String::try_from(s).map_err(|_| ParseError::InvalidValue)?;
            if name.is_empty() {
                return Err(ParseError::InvalidValue);
            }
            bus.name = Some(name);
        }
        ("frequency", Value::Int(hz)) => {
            let hz = u32::try_from(hz).map_err(|_| ParseError::InvalidValue)?;
            if hz == 0 {
                return Err(ParseError::InvalidValue);
            }
            bus.i2c = I2cConfig::with_frequency(hz);
        }
        ("name" | "frequency", _) => return Err(ParseError::InvalidValue),
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn apply_led_key(led: &mut PendingLed, key: &str, value: Value) -> Result<(), ParseError> {
    match (key, value) {
        ("pin", Value::Str(s)) => led.pin = Some(PinConfig::parse(s).ok_or(ParseError::InvalidPin)?),
        ("pwm", Value::Bool(b)) => led.pwm = b,
        ("pin" | "pwm", _) => return Err(ParseError::InvalidValue),
        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn parse_key_value(line: &str) -> Result<(&str, Value<'_>), ParseError> {
    let (key, value) = line.split_once('=').ok_or(ParseError::InvalidValue)?;
    Ok((key.trim(), parse_value(value.trim())?))
}

fn parse_value(s: &str) -> Result<Value<'_>, ParseError> {
    if let Some(inner) = s.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
        if inner.contains('"') {
            return Err(ParseError::InvalidValue);
        }
        return Ok(Value::Str(inner));
    }

    match s {
        "true" => Ok(Value::Bool(true)),
        "false" => Ok(Value::Bool(false)),
        _ => {
            // TOML allows underscores as digit separators
            let mut digits: String<24> = String::new();
            for c in s.chars().filter(|&c| c != '_') {
                digits.push(c).map_err(|_| ParseError::InvalidValue)?;
            }
            digits
                .parse::<i64>()
                .map(Value::Int)
                .map_err(|_| ParseError::InvalidValue)
        }
    }
}

/// Drop a trailing `# comment`, ignoring `#` inside a quoted string
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::config::{WiringMismatch, HYDRABUS_IDENTITY};

    const HYDRABUS_TOML: &str = r#"
# HydraBus 1.0 board profile
[board]
identity = "HydraBus1.0 with STM32F4"
soft_i2c = true

[i2c.1]
name = "X"
frequency = 400_000

[i2c.2]
name = "Y"   # second bus

[i2c.3]

[led.1]
pin = "PA4"

[led.2]
pin = "PC4"

[led.3]
pin = "PA15"
pwm = true

[led.4]
pin = "PB4"
pwm = true
"#;

    #[test]
    fn test_parse_matches_builtin_profile() {
        let profile = parse_board(HYDRABUS_TOML).unwrap();
        assert_eq!(profile, BoardProfile::hydrabus());
        assert_eq!(profile.identity.as_str(), HYDRABUS_IDENTITY);
    }

    #[test]
    fn test_edited_led_is_caught_by_wiring_check() {
        let edited = HYDRABUS_TOML.replace("pin = \"PA15\"\npwm = true", "pin = \"PA15\"");
        let profile = parse_board(&edited).unwrap();

        assert_eq!(
            profile.check_wiring(3, &PinConfig::new('A', 15), true),
            Err(WiringMismatch::Pwm(false))
        );
        assert_eq!(profile.check_wiring(4, &PinConfig::new('B', 4), true), Ok(()));
    }

    #[test]
    fn test_bus_frequency() {
        let profile = parse_board("[i2c.1]\nfrequency = 100000\n").unwrap();
        assert_eq!(profile.find_bus(1).unwrap().i2c, I2cConfig::STANDARD);
        assert!(!profile.soft_i2c);
    }

    #[test]
    fn test_led_order_is_normalized() {
        let profile = parse_board("[led.2]\npin = \"PB1\"\n[led.1]\npin = \"!PB0\"\n").unwrap();
        assert_eq!(profile.indicators[0].ordinal, 1);
        assert!(profile.indicators[0].pin.inverted);
        assert_eq!(profile.indicators[1].ordinal, 2);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert_eq!(parse_board("[uart.1]"), Err(ParseError::InvalidSection));
        assert_eq!(parse_board("[led.0]\npin = \"PA1\""), Err(ParseError::InvalidSection));
        assert_eq!(parse_board("identity = \"x\""), Err(ParseError::UnknownKey));
        assert_eq!(parse_board("[board]\ncolour = 1"), Err(ParseError::UnknownKey));
        assert_eq!(parse_board("[board]\nsoft_i2c = 1"), Err(ParseError::InvalidValue));
        assert_eq!(parse_board("[i2c.1]\nname = \"LONGER\""), Err(ParseError::InvalidValue));
        assert_eq!(parse_board("[i2c.1]\nfrequency = -5"), Err(ParseError::InvalidValue));
        assert_eq!(parse_board("[led.1]\npin = \"PQ1\""), Err(ParseError::InvalidPin));
        assert_eq!(parse_board("[led.1]\npwm = true"), Err(ParseError::MissingPin));
        assert_eq!(parse_board("[led.2]\npin = \"PA1\""), Err(ParseError::OrdinalGap));
    }

    #[test]
    fn test_rejects_duplicates() {
        assert_eq!(parse_board("[i2c.1]\n[i2c.1]"), Err(ParseError::Duplicate));
        assert_eq!(
            parse_board("[i2c.1]\nname = \"X\"\n[i2c.2]\nname = \"X\""),
            Err(ParseError::Duplicate)
        );
        assert_eq!(
            parse_board("[led.1]\npin = \"PA1\"\n[led.1]\npin = \"PA2\""),
            Err(ParseError::Duplicate)
        );
    }

    #[test]
    fn test_too_many_buses() {
        let input = "[i2c.1]\n[i2c.2]\n[i2c.3]\n[i2c.4]\n[i2c.5]\n";
        assert_eq!(parse_board(input), Err(ParseError::TooManyItems));
    }

    #[test]
    fn test_hash_inside_string() {
        let profile = parse_board("[board]\nidentity = \"Board #2\" # rev b\n").unwrap();
        assert_eq!(profile.identity.as_str(), "Board #2");
    }
}
