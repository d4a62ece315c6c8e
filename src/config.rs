use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Seed for the shapes' rotation and float speeds. Random when omitted.
    #[arg(short, long)]
    pub seed: Option<u64>,
    /// Target frames per second.
    #[arg(short, long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..))]
    pub fps: u32,
    /// Pixels the virtual page moves per mouse wheel notch.
    #[arg(long, default_value_t = 100.0, value_parser = parse_finite)]
    pub scroll_step: f64,
    /// Height of the virtual page that can be scrolled, in pixels.
    #[arg(long, default_value_t = 5000.0, value_parser = parse_finite)]
    pub max_scroll: f64,
    /// Start with the diagnostic overlay visible.
    #[arg(short, long)]
    pub debug: bool,
}

/// Accepts any finite float; NaN and infinities would poison the scroll offset
fn parse_finite(value: &str) -> Result<f64, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|e| format!("`{value}` is not a number: {e}"))?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(format!("`{value}` is not a finite number"))
    }
}

/// Runtime settings of the frame loop
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Config {
    pub seed: Option<u64>,
    pub frame_interval: Duration,
    pub scroll_step: f64,
    pub max_scroll: f64,
    pub debug: bool,
}

impl Config {
    /// Random generator for scene setup, deterministic when a seed is given
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            seed: None,
            frame_interval: Duration::from_secs(1) / 60,
            scroll_step: 100.0,
            max_scroll: 5000.0,
            debug: false,
        }
    }
}

impl From<Args> for Config {
    fn from(args: Args) -> Self {
        Config {
            seed: args.seed,
            frame_interval: Duration::from_secs(1) / args.fps.max(1),
            scroll_step: args.scroll_step.abs(),
            max_scroll: args.max_scroll.max(0.0),
            debug: args.debug,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::camera_depth;
    use crate::state::InputState;
    use clap::CommandFactory;
    use rand::Rng;

    #[test]
    fn cli_definition_is_consistent() {
        Args::command().debug_assert();
    }

    #[test]
    fn defaults_match_sixty_frames_per_second() {
        let config = Config::from(Args::parse_from(["driftfield"]));
        assert_eq!(config, Config::default());
    }

    #[test]
    fn zero_fps_is_rejected() {
        assert!(Args::try_parse_from(["driftfield", "--fps", "0"]).is_err());
    }

    #[test]
    fn seeded_rng_is_reproducible() {
        let config = Config::from(Args::parse_from(["driftfield", "--seed", "99"]));
        let a: f64 = config.rng().gen();
        let b: f64 = config.rng().gen();
        assert_eq!(a, b);
    }

    #[test]
    fn non_finite_scroll_settings_are_rejected() {
        for value in ["NaN", "inf", "-inf"] {
            assert!(Args::try_parse_from(["driftfield", "--scroll-step", value]).is_err());
            assert!(Args::try_parse_from(["driftfield", "--max-scroll", value]).is_err());
        }
        assert!(Args::try_parse_from(["driftfield", "--scroll-step", "abc"]).is_err());
    }

    #[test]
    fn finite_scroll_step_keeps_the_camera_finite() {
        let config = Config::from(Args::parse_from(["driftfield", "--scroll-step", "1e300"]));
        let mut input = InputState::default();
        input.scrolled(config.scroll_step, config.max_scroll);
        assert_eq!(input.scroll_y, config.max_scroll);
        assert!(camera_depth(input.scroll_y).is_finite());
    }

    #[test]
    fn negative_scroll_settings_are_normalized() {
        let config = Config::from(Args::parse_from([
            "driftfield",
            "--scroll-step=-40",
            "--max-scroll=-1",
        ]));
        assert_eq!(config.scroll_step, 40.0);
        assert_eq!(config.max_scroll, 0.0);
    }
}
