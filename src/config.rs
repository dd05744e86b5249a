//! Configuration resolution from command-line arguments.

/// Default cursor offset in pixels.
const DEFAULT_OFFSET_PX: f64 = 1.0;
/// Default idle threshold / move period in seconds.
const DEFAULT_INTERVAL_SECONDS: u64 = 120;

/// Operating mode of the mover loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Poll the OS idle time every second and move once it crosses the threshold.
    #[default]
    Reactive,
    /// Move unconditionally every interval, without consulting the OS idle time.
    Proactive,
}

/// Immutable runtime configuration, resolved once at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Pixels the cursor is displaced per trigger.
    pub offset_px: f64,
    /// Idle threshold (reactive) or move period (proactive) in seconds.
    pub interval_seconds: u64,
    /// Reactive or proactive operation.
    pub mode: Mode,
    /// Draw the move magnitude from a random range instead of `offset_px`.
    pub randomize: bool,
    /// Suppress all non-essential console output.
    pub quiet: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            offset_px: DEFAULT_OFFSET_PX,
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            mode: Mode::default(),
            randomize: false,
            quiet: false,
        }
    }
}

impl Config {
    /// Resolve configuration from raw command-line tokens.
    ///
    /// Recognized parameters take the form `--name value`; boolean flags are
    /// present or absent with no value token. Missing or unparsable values
    /// fall back to the documented defaults rather than erroring, and unknown
    /// flags are ignored. Each fallback is reported in the returned warning
    /// list so the caller can surface it once logging is up.
    pub fn from_args<I, S>(args: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tokens: Vec<String> = args.into_iter().map(Into::into).collect();
        let mut config = Self::default();
        let mut warnings = Vec::new();

        if let Some(value) = number_param(&tokens, "--offset", &mut warnings) {
            if value.is_finite() {
                config.offset_px = value;
            } else {
                warnings.push(format!(
                    "--offset {} is not a usable number, using default {}",
                    value, DEFAULT_OFFSET_PX
                ));
            }
        }

        // --max-idle is the historical name; --interval, the alias used by
        // sibling variants, overrides it when both are given.
        for name in ["--max-idle", "--interval"] {
            if let Some(value) = number_param(&tokens, name, &mut warnings) {
                if value.is_finite() && value >= 1.0 {
                    config.interval_seconds = value.round() as u64;
                } else {
                    warnings.push(format!(
                        "{} {} is out of range, using default {}s",
                        name, value, DEFAULT_INTERVAL_SECONDS
                    ));
                }
            }
        }

        if let Some(value) = string_param(&tokens, "--mode") {
            match value.to_ascii_lowercase().as_str() {
                "reactive" => config.mode = Mode::Reactive,
                "proactive" => config.mode = Mode::Proactive,
                other => warnings.push(format!(
                    "--mode {} is not recognized (expected reactive or proactive), using reactive",
                    other
                )),
            }
        }

        config.randomize = tokens.iter().any(|t| t == "--random");
        config.quiet = tokens.iter().any(|t| t == "--quiet");

        (config, warnings)
    }
}

/// Look up the value token following `name` and parse it as a number.
///
/// Returns `None` when the flag is absent, when it is the final token, or when
/// the value does not parse; the latter two cases record a warning.
fn number_param(tokens: &[String], name: &str, warnings: &mut Vec<String>) -> Option<f64> {
    let value = string_param(tokens, name)?;
    if value.is_empty() {
        warnings.push(format!("{} is missing a value, using default", name));
        return None;
    }
    match value.parse::<f64>() {
        Ok(parsed) => Some(parsed),
        Err(_) => {
            warnings.push(format!(
                "{} {:?} is not a number, using default",
                name, value
            ));
            None
        }
    }
}

/// Look up the raw value token following the last occurrence of `name`.
fn string_param(tokens: &[String], name: &str) -> Option<String> {
    let index = tokens.iter().rposition(|t| t == name)?;
    Some(tokens.get(index + 1).cloned().unwrap_or_default())
}
