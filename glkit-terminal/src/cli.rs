//! Command line parsing for the `glkit-terminal` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::DemoKind;

#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "glkit-terminal")]
#[command(about = "glkit transform demos drawn as ASCII art", long_about = None)]
#[command(after_help = "Keys: space pause/resume, r reset animation, q/Esc quit.\n\
                        Set RUST_LOG (e.g. RUST_LOG=debug) and redirect stderr for diagnostics.")]
pub struct CliArgs {
    /// Demo to run, overrides the config file
    #[arg(value_enum, value_name = "DEMO")]
    pub demo: Option<DemoKind>,

    /// JSON config file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// STL mesh shown by the shading demo
    #[arg(short, long, value_name = "FILE")]
    pub mesh: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("glkit-terminal").chain(args.iter().copied()))
    }

    #[test]
    fn test_empty() {
        let args = parse(&[]).unwrap();
        assert_eq!(args.demo, None);
        assert_eq!(args.config, None);
        assert_eq!(args.mesh, None);
    }

    #[test]
    fn test_full() {
        let args = parse(&["shading", "--config", "demo.json", "-m", "teapot.stl"]).unwrap();
        assert_eq!(args.demo, Some(DemoKind::Shading));
        assert_eq!(args.config, Some(PathBuf::from("demo.json")));
        assert_eq!(args.mesh, Some(PathBuf::from("teapot.stl")));
    }

    #[test]
    fn test_errors() {
        assert!(parse(&["--mesh"]).is_err());
        assert!(parse(&["triforce", "shading"]).is_err());
        assert_eq!(parse(&["--fast"]).unwrap_err().kind(), ErrorKind::UnknownArgument);
        assert_eq!(parse(&["cube"]).unwrap_err().kind(), ErrorKind::InvalidValue);
        assert_eq!(parse(&["--help"]).unwrap_err().kind(), ErrorKind::DisplayHelp);
    }
}
