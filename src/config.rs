use crate::error::ConfigError;
use crossterm::style::Color;
use std::path::PathBuf;
use std::time::Duration;

/// Default number of band workers
pub const DEFAULT_WORKERS: usize = 4;
/// Default inter-frame delay in seconds
pub const DEFAULT_DELAY: f32 = 0.05;
/// Default seed file, read from the working directory
pub const DEFAULT_UNIVERSE: &str = "universe.txt";
/// Upper bound on `width * height`; each of the two buffers holds one byte per cell
pub const MAX_CELLS: usize = 1 << 24;

/// Where the first generation comes from
#[derive(Clone, Debug, PartialEq)]
pub enum SeedSource {
    File(PathBuf),
    Random { density: f64, seed: Option<u64> },
}

/// Unvalidated values as gathered from the command line and settings
#[derive(Clone, Debug)]
pub struct RawConfig {
    pub width: usize,
    pub height: usize,
    pub workers: usize,
    pub delay: f32,
    pub seed: SeedSource,
    pub draw_char: char,
    pub color_scheme: u8,
}

/// Configuration for a simulation run; every field already checked.
#[derive(Clone, Debug)]
pub struct LifeConfig {
    pub width: usize,
    pub height: usize,
    pub workers: usize,
    pub delay: Duration,
    pub seed: SeedSource,
    pub draw_char: char,
    pub color_scheme: u8,
}

impl RawConfig {
    /// Reject anything the engine cannot run with, before any thread starts.
    pub fn validate(self) -> Result<LifeConfig, ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        match self.width.checked_mul(self.height) {
            Some(cells) if cells <= MAX_CELLS => {}
            _ => {
                return Err(ConfigError::TooLarge {
                    width: self.width,
                    height: self.height,
                    max: MAX_CELLS,
                })
            }
        }
        if self.width / self.workers == 0 {
            return Err(ConfigError::TooManyWorkers {
                workers: self.workers,
                width: self.width,
            });
        }
        if !self.delay.is_finite() || self.delay <= 0.0 {
            return Err(ConfigError::InvalidDelay(self.delay.to_string()));
        }
        let delay = Duration::try_from_secs_f32(self.delay)
            .map_err(|_| ConfigError::InvalidDelay(self.delay.to_string()))?;
        if let SeedSource::Random { density, .. } = self.seed {
            if !(0.0..=1.0).contains(&density) {
                return Err(ConfigError::InvalidDensity(density.to_string()));
            }
        }

        Ok(LifeConfig {
            width: self.width,
            height: self.height,
            workers: self.workers,
            delay,
            seed: self.seed,
            draw_char: self.draw_char,
            color_scheme: self.color_scheme,
        })
    }
}

/// Colour of alive cells for a scheme number (0-9); neighbor-rich cells
/// are drawn brighter.
pub fn scheme_color(scheme: u8, intensity: u8) -> (Color, bool) {
    match scheme {
        1 => match intensity {  // fire
            0 => (Color::DarkRed, false),
            1 => (Color::Red, false),
            _ => (Color::Yellow, true),
        },
        2 => match intensity {  // ice
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            _ => (Color::Cyan, true),
        },
        3 => match intensity {  // pink
            0 => (Color::DarkMagenta, false),
            1 => (Color::Magenta, false),
            _ => (Color::White, true),
        },
        4 => match intensity {  // gold
            0 => (Color::DarkYellow, false),
            1 => (Color::Yellow, false),
            _ => (Color::White, true),
        },
        5 => match intensity {  // electric
            0 => (Color::DarkCyan, false),
            1 => (Color::Cyan, false),
            _ => (Color::White, true),
        },
        6 => match intensity {  // lava
            0 => (Color::DarkRed, false),
            1 => (Color::Red, false),
            _ => (Color::Magenta, true),
        },
        7 => match intensity {  // mono
            0 => (Color::DarkGrey, false),
            1 => (Color::Grey, false),
            _ => (Color::White, true),
        },
        8 => match intensity {  // rainbow
            0 => (Color::Red, false),
            1 => (Color::Yellow, false),
            _ => (Color::Green, true),
        },
        9 => match intensity {  // neon
            0 => (Color::DarkBlue, false),
            1 => (Color::Blue, false),
            _ => (Color::Magenta, true),
        },
        _ => match intensity {  // matrix green
            0 => (Color::DarkGreen, false),
            1 => (Color::Green, false),
            _ => (Color::Green, true),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawConfig {
        RawConfig {
            width: 10,
            height: 8,
            workers: 4,
            delay: DEFAULT_DELAY,
            seed: SeedSource::File(PathBuf::from(DEFAULT_UNIVERSE)),
            draw_char: '#',
            color_scheme: 0,
        }
    }

    #[test]
    fn accepts_sane_values() {
        let config = raw().validate().unwrap();
        assert_eq!(config.width, 10);
        assert_eq!(config.workers, 4);
        assert_eq!(config.delay, Duration::from_secs_f32(DEFAULT_DELAY));
    }

    #[test]
    fn rejects_zero_sizes() {
        assert_eq!(RawConfig { width: 0, ..raw() }.validate().err(), Some(ConfigError::ZeroWidth));
        assert_eq!(RawConfig { height: 0, ..raw() }.validate().err(), Some(ConfigError::ZeroHeight));
        assert_eq!(RawConfig { workers: 0, ..raw() }.validate().err(), Some(ConfigError::ZeroWorkers));
    }

    #[test]
    fn rejects_more_workers_than_columns() {
        assert_eq!(
            RawConfig { workers: 11, ..raw() }.validate().err(),
            Some(ConfigError::TooManyWorkers { workers: 11, width: 10 })
        );
        assert!(RawConfig { workers: 10, ..raw() }.validate().is_ok());
    }

    #[test]
    fn rejects_bad_delay_and_density() {
        assert!(matches!(
            RawConfig { delay: 0.0, ..raw() }.validate(),
            Err(ConfigError::InvalidDelay(_))
        ));
        assert!(matches!(
            RawConfig { delay: f32::NAN, ..raw() }.validate(),
            Err(ConfigError::InvalidDelay(_))
        ));
        assert!(matches!(
            RawConfig { delay: 1e30, ..raw() }.validate(),
            Err(ConfigError::InvalidDelay(_))
        ));
        assert!(matches!(
            RawConfig { seed: SeedSource::Random { density: 1.5, seed: None }, ..raw() }.validate(),
            Err(ConfigError::InvalidDensity(_))
        ));
    }

    #[test]
    fn rejects_oversized_universes() {
        let huge = 1usize << 33;
        assert_eq!(
            RawConfig { width: huge, height: huge, ..raw() }.validate().err(),
            Some(ConfigError::TooLarge { width: huge, height: huge, max: MAX_CELLS })
        );
        assert_eq!(
            RawConfig { width: MAX_CELLS + 1, height: 1, ..raw() }.validate().err(),
            Some(ConfigError::TooLarge { width: MAX_CELLS + 1, height: 1, max: MAX_CELLS })
        );
        assert!(RawConfig { width: MAX_CELLS, height: 1, ..raw() }.validate().is_ok());
    }

    #[test]
    fn every_scheme_has_a_bright_head() {
        for scheme in 0..10 {
            assert!(scheme_color(scheme, 2).1);
            assert!(!scheme_color(scheme, 0).1);
        }
    }
}
