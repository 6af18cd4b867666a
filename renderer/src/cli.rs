use crate::config::{DEFAULT_HEIGHT, DEFAULT_OUTPUT_DIR, DEFAULT_WIDTH};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(about = "Render Kubernetes probe timeline diagrams", long_about = None)]
pub struct ProbeDiagramsCli {
    /// Directory the diagrams are written to. Created if it does not exist.
    #[clap(long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Only render the scenario with this id, for example `--scenario=2.2`.
    ///
    /// You can specify multiple scenarios by using the flag multiple times. All scenarios are
    /// rendered when the flag is not given.
    #[clap(long, short)]
    pub scenario: Vec<String>,

    /// Image width in pixels
    #[clap(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Image height in pixels
    #[clap(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Write a JSON report describing every rendered diagram to this path
    #[clap(long)]
    pub report: Option<PathBuf>,

    /// Print the scenarios and their annotations without rendering anything
    #[clap(long, default_value = "false")]
    pub list: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_need_no_arguments() {
        let cli = ProbeDiagramsCli::try_parse_from(["probe-diagrams"]).unwrap();
        assert_eq!(cli.width, DEFAULT_WIDTH);
        assert_eq!(cli.height, DEFAULT_HEIGHT);
        assert!(cli.scenario.is_empty());
        assert!(!cli.list);
    }

    #[test]
    fn scenario_flag_repeats() {
        let cli = ProbeDiagramsCli::try_parse_from([
            "probe-diagrams",
            "--scenario=1.1",
            "-s",
            "3.2",
            "--output-dir",
            "out",
        ])
        .unwrap();
        assert_eq!(cli.scenario, vec!["1.1", "3.2"]);
        assert_eq!(cli.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn output_dir_only_comes_from_the_flag() {
        std::env::set_var("PROBE_DIAGRAMS_DIR", "elsewhere");

        let cli = ProbeDiagramsCli::try_parse_from(["probe-diagrams"]).unwrap();
        assert_eq!(cli.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }
}
