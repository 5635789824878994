//! Positional argument contract.
//!
//! The first positional argument selects the action; anything unrecognized
//! falls through to usage guidance, never to an error.

pub const BUILD_ALL_FLAG: &str = "-a";
pub const CLEAN_ALL_FLAG: &str = "-c";
pub const PLUS_FLAG: &str = "-plus";

pub const USAGE: &str = "\
Please refer to readme for instructions on usage

  crpi-build -a                    build every library in order
  crpi-build -c                    clean every library in order
  crpi-build -plus <target>...     make all, then make each target
";

/// What a command line asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    Nothing,
    BuildAll,
    CleanAll,
    /// Extra targets built after `make all`, in command-line order.
    BuildSelected(Vec<String>),
    Usage,
}

impl Request {
    /// Parse the arguments that follow the program name.
    pub fn parse(args: &[String]) -> Self {
        let Some(first) = args.first() else {
            return Self::Nothing;
        };

        match first.as_str() {
            BUILD_ALL_FLAG => Self::BuildAll,
            CLEAN_ALL_FLAG => Self::CleanAll,
            PLUS_FLAG if args.len() > 1 => Self::BuildSelected(
                args.iter()
                    .filter(|arg| arg.as_str() != PLUS_FLAG)
                    .cloned()
                    .collect(),
            ),
            _ => Self::Usage,
        }
    }
}
