use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::VariantNames;
use strum_macros::{EnumString, EnumVariantNames};

use crate::error::ViskitError;

/// Number of slots reserved up front and added on every growth step
/// unless configured otherwise
pub const DEFAULT_SIZE: usize = 1000;

/// Storage settings for an `IndexedPriorityQueue`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueueSettings {
    pub initial_size: usize,
    pub extend: usize,
}

impl Default for QueueSettings {
    fn default() -> Self {
        Self {
            initial_size: DEFAULT_SIZE,
            extend: DEFAULT_SIZE,
        }
    }
}

impl QueueSettings {
    /// Check whether these settings can be used to build a queue.
    /// Returns an error if the extension step is zero, since a full queue
    /// could then never grow.
    pub fn validate(&self) -> Result<(), ViskitError> {
        if self.extend == 0 {
            let message = "Extension size must be greater than 0".to_string();
            log::warn!("{}", &message);
            return Err(ViskitError::InvalidSettings { message });
        }
        Ok(())
    }
}

/// Operation mix a benchmark run applies to a filled queue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, EnumString, EnumVariantNames)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Workload {
    /// Pop every entry in priority order
    Drain,
    /// Delete every id in random order
    DeleteIds,
    /// Assign a new priority to every id, then drain
    Reprioritize,
}

impl Workload {
    /// Returns a list of available benchmark workloads
    pub fn available_workloads() -> Vec<String> {
        Self::VARIANTS.iter()
            .map(<&str>::to_string)
            .collect::<Vec<_>>()
    }
}

/// Settings for a benchmark run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchSettings {
    pub queue: QueueSettings,
    pub workload: Workload,
    pub num_items: usize,
    pub seed: Option<u64>,
    pub loop_count: usize,
    pub json: bool,
}

/// Parse the value that follows the flag at `args[i]`
fn parse_value<F: FromStr>(args: &[String], i: usize) -> Result<F, ViskitError> {
    let flag = &args[i];
    let val_str = match args.get(i + 1) {
        Some(val_str) => val_str,
        None => {
            log::warn!("{} given without a value", flag);
            return Err(ViskitError::BadArgument {
                message: format!("Missing value for argument: {}", flag)
            });
        }
    };

    if let Ok(val) = val_str.parse::<F>() {
        Ok(val)
    } else {
        log::warn!("Cannot parse {} from string", flag);
        Err(ViskitError::BadArgument {
            message: format!("Invalid value for argument '{}': '{}'", flag, val_str)
        })
    }
}

impl BenchSettings {
    /// Build benchmark settings from command line arguments, including the program name
    /// in `args[0]`. `--workload` is required; every other flag has a default.
    pub fn from_args(args: &[String]) -> Result<Self, ViskitError> {
        if !args.contains(&"--workload".to_string()) {
            return Err(ViskitError::BadArgument {
                message: format!("Missing required argument: --workload (one of {:?})",
                                 Workload::available_workloads())
            });
        }

        let mut settings = Self {
            queue: QueueSettings::default(),
            workload: Workload::Drain,
            num_items: 100_000,
            seed: None,
            loop_count: 1,
            json: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--workload" => {
                    settings.workload = parse_value::<Workload>(args, i).map_err(|_| {
                        ViskitError::BadArgument {
                            message: format!("Unknown workload '{}', expected one of {:?}",
                                             args.get(i + 1).map(String::as_str).unwrap_or(""),
                                             Workload::available_workloads())
                        }
                    })?;
                }
                "--items" => settings.num_items = parse_value(args, i)?,
                "--size" => settings.queue.initial_size = parse_value(args, i)?,
                "--extend" => settings.queue.extend = parse_value(args, i)?,
                "--seed" => settings.seed = Some(parse_value(args, i)?),
                "--loop" => settings.loop_count = parse_value(args, i)?,
                "--json" => {
                    settings.json = true;
                    i += 1;
                    continue;
                }
                _ => {
                    return Err(ViskitError::BadArgument {
                        message: format!("Unknown argument: {}", &args[i])
                    });
                }
            }
            i += 2;
        }

        settings.queue.validate()?;
        Ok(settings)
    }
}
