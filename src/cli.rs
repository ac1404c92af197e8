use std::{
    error::Error,
    fmt::{self, Display},
    iter::Peekable,
    num::NonZeroUsize,
    path::PathBuf,
};

use crate::{
    error::Result,
    training::{TrainConfig, DEFAULT_EPOCHS, DEFAULT_THRESHOLD},
};

/// Where models are read from and written to when no `-model` is given.
pub const DEFAULT_MODEL: &str = "perceptron.model";

pub const USAGE: &str = "Usage: perceptron <train|class> [ARGS]";

pub const TRAIN_USAGE: &str = "\
Usage: perceptron train -0 <string> -1 <string> [ARGS] TRAININGSET

  -0 <string>          string to detect 0 perceived files
  -1 <string>          string to detect 1 perceived files
  -epochs <n>          number of training cycles (default 1000)
  -threshold <float>   response above which the perceptron fires (default 20)
  -model <path>        file that stores the perceptron model (default perceptron.model)
  -visualize <bool>    visualize trained model as image, named after the model (default true)";

pub const CLASS_USAGE: &str = "\
Usage: perceptron class [ARGS] IMAGE [IMAGE...]

  -model <path>        file that stores the perceptron model (default perceptron.model)";

/// A parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Train(TrainArgs),
    Class(ClassArgs),
    /// Help was asked for, holds the usage to print.
    Help(&'static str),
}

/// Arguments of `perceptron train`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainArgs {
    pub label0: String,
    pub label1: String,
    pub epochs: NonZeroUsize,
    pub threshold: f64,
    pub model: PathBuf,
    pub visualize: bool,
    pub training_set: PathBuf,
}

impl TrainArgs {
    /// Builds the training configuration these arguments describe.
    pub fn config(&self) -> Result<TrainConfig> {
        TrainConfig::new(self.label0.as_str(), self.label1.as_str())?
            .with_epochs(self.epochs)
            .with_threshold(self.threshold)
    }
}

/// Arguments of `perceptron class`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassArgs {
    pub model: PathBuf,
    pub images: Vec<PathBuf>,
}

/// Command line usage errors.
#[derive(Debug, Clone, PartialEq)]
pub enum CliErr {
    MissingCommand,
    UnknownCommand(String),
    UnknownFlag {
        command: &'static str,
        flag: String,
    },
    MissingValue {
        command: &'static str,
        flag: String,
    },
    InvalidValue {
        command: &'static str,
        flag: String,
        value: String,
    },
    MissingLabels,
    WrongArgCount {
        command: &'static str,
        got: usize,
    },
}

impl CliErr {
    /// Returns the usage text that should accompany this error.
    pub fn usage(&self) -> &'static str {
        match self {
            CliErr::MissingCommand | CliErr::UnknownCommand(_) => USAGE,
            CliErr::MissingLabels => TRAIN_USAGE,
            CliErr::UnknownFlag { command, .. }
            | CliErr::MissingValue { command, .. }
            | CliErr::InvalidValue { command, .. }
            | CliErr::WrongArgCount { command, .. } => usage_of(command),
        }
    }
}

impl Display for CliErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliErr::MissingCommand => write!(f, "missing command"),
            CliErr::UnknownCommand(cmd) => write!(f, "unknown command {cmd:?}"),
            CliErr::UnknownFlag { flag, .. } => write!(f, "flag provided but not defined: -{flag}"),
            CliErr::MissingValue { flag, .. } => write!(f, "flag needs an argument: -{flag}"),
            CliErr::InvalidValue { flag, value, .. } => {
                write!(f, "invalid value {value:?} for flag -{flag}")
            }
            CliErr::MissingLabels => write!(f, "both -0 and -1 must be given"),
            CliErr::WrongArgCount { command: "train", got } => {
                write!(f, "expected exactly one training set directory, got {got}")
            }
            CliErr::WrongArgCount { got, .. } => {
                write!(f, "expected at least one image, got {got}")
            }
        }
    }
}

impl Error for CliErr {}

/// Parses the command line, without the program name.
pub fn parse<I>(args: I) -> std::result::Result<Command, CliErr>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    let Some(command) = args.next() else {
        return Err(CliErr::MissingCommand);
    };

    match command.as_str() {
        "train" => return parse_train(args),
        "class" => return parse_class(args),
        "-h" | "-help" | "--help" | "help" => return Ok(Command::Help(USAGE)),
        _ => {}
    }

    Err(CliErr::UnknownCommand(command))
}

fn parse_train<I>(args: I) -> std::result::Result<Command, CliErr>
where
    I: Iterator<Item = String>,
{
    const CMD: &str = "train";

    let mut label0 = None;
    let mut label1 = None;
    let mut epochs = NonZeroUsize::new(DEFAULT_EPOCHS).unwrap_or(NonZeroUsize::MIN);
    let mut threshold = DEFAULT_THRESHOLD;
    let mut model = PathBuf::from(DEFAULT_MODEL);
    let mut visualize = true;
    let mut positional = Vec::new();

    let mut args = args.peekable();
    while let Some(arg) = args.next() {
        let Some((name, inline)) = split_flag(&arg, &mut positional, &mut args) else {
            continue;
        };

        match name.as_str() {
            "0" => label0 = Some(value(CMD, &name, inline, &mut args)?),
            "1" => label1 = Some(value(CMD, &name, inline, &mut args)?),
            "epochs" => {
                let raw = value(CMD, &name, inline, &mut args)?;
                epochs = raw
                    .parse::<NonZeroUsize>()
                    .map_err(|_| invalid(CMD, &name, raw))?;
            }
            "threshold" => {
                let raw = value(CMD, &name, inline, &mut args)?;
                threshold = raw
                    .parse::<f64>()
                    .ok()
                    .filter(|t| t.is_finite())
                    .ok_or_else(|| invalid(CMD, &name, raw))?;
            }
            "model" => model = value(CMD, &name, inline, &mut args)?.into(),
            "visualize" => {
                visualize = match inline {
                    Some(raw) => parse_bool(&raw).ok_or_else(|| invalid(CMD, &name, raw))?,
                    // a bare flag means true, like a bool flag with no value
                    None => match args.peek().and_then(|next| parse_bool(next)) {
                        Some(b) => {
                            args.next();
                            b
                        }
                        None => true,
                    },
                };
            }
            "h" | "help" => return Ok(Command::Help(TRAIN_USAGE)),
            _ => return Err(unknown(CMD, &name)),
        }
    }

    let (Some(label0), Some(label1)) = (label0, label1) else {
        return Err(CliErr::MissingLabels);
    };

    if positional.len() != 1 {
        return Err(CliErr::WrongArgCount {
            command: CMD,
            got: positional.len(),
        });
    }

    Ok(Command::Train(TrainArgs {
        label0,
        label1,
        epochs,
        threshold,
        model,
        visualize,
        training_set: positional.remove(0).into(),
    }))
}

fn parse_class<I>(args: I) -> std::result::Result<Command, CliErr>
where
    I: Iterator<Item = String>,
{
    const CMD: &str = "class";

    let mut model = PathBuf::from(DEFAULT_MODEL);
    let mut positional = Vec::new();

    let mut args = args.peekable();
    while let Some(arg) = args.next() {
        let Some((name, inline)) = split_flag(&arg, &mut positional, &mut args) else {
            continue;
        };

        match name.as_str() {
            "model" => model = value(CMD, &name, inline, &mut args)?.into(),
            "h" | "help" => return Ok(Command::Help(CLASS_USAGE)),
            _ => return Err(unknown(CMD, &name)),
        }
    }

    if positional.is_empty() {
        return Err(CliErr::WrongArgCount {
            command: CMD,
            got: 0,
        });
    }

    Ok(Command::Class(ClassArgs {
        model,
        images: positional.into_iter().map(PathBuf::from).collect(),
    }))
}

/// Splits `-name`, `--name` and `-name=value` into the name and the inline value.
///
/// Anything else is pushed to `positional` and yields `None`. After a lone `--` every
/// remaining argument is positional.
fn split_flag<I>(
    arg: &str,
    positional: &mut Vec<String>,
    rest: &mut Peekable<I>,
) -> Option<(String, Option<String>)>
where
    I: Iterator<Item = String>,
{
    if arg == "--" {
        positional.extend(rest);
        return None;
    }

    let stripped = arg.strip_prefix("--").or_else(|| arg.strip_prefix('-'));
    let Some(flag) = stripped.filter(|flag| !flag.is_empty()) else {
        positional.push(arg.to_string());
        return None;
    };

    match flag.split_once('=') {
        Some((name, value)) => Some((name.to_string(), Some(value.to_string()))),
        None => Some((flag.to_string(), None)),
    }
}

fn value<I>(
    command: &'static str,
    flag: &str,
    inline: Option<String>,
    rest: &mut Peekable<I>,
) -> std::result::Result<String, CliErr>
where
    I: Iterator<Item = String>,
{
    inline.or_else(|| rest.next()).ok_or_else(|| CliErr::MissingValue {
        command,
        flag: flag.to_string(),
    })
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

fn invalid(command: &'static str, flag: &str, value: String) -> CliErr {
    CliErr::InvalidValue {
        command,
        flag: flag.to_string(),
        value,
    }
}

fn unknown(command: &'static str, flag: &str) -> CliErr {
    CliErr::UnknownFlag {
        command,
        flag: flag.to_string(),
    }
}

fn usage_of(command: &str) -> &'static str {
    match command {
        "train" => TRAIN_USAGE,
        "class" => CLASS_USAGE,
        _ => USAGE,
    }
}
