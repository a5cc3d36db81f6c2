//! Command implementations.

pub mod configure;
pub mod group;
pub mod matrix;
pub mod seeds;

pub use self::configure::execute_config;
pub use self::group::execute_group;
pub use self::matrix::execute_matrix;
pub use self::seeds::execute_seeds;

use crate::cli::InputArgs;
use crate::config::Config;
use crate::loader::FileSource;

/// Build a dataset source from the command line, falling back to config.
pub fn open_source(input: &InputArgs, config: &Config) -> FileSource {
    let mut source = FileSource::new(input.file.clone())
        .with_delimiter(input.delimiter.unwrap_or(config.grouping.delimiter))
        .with_skip_header(input.skip_header_or(config.grouping.skip_header));

    if let Some(format) = input.input_format {
        source = source.with_format(format.into());
    }

    source
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::InputFormatArg;
    use crate::loader::InputFormat;

    fn input(file: &str) -> InputArgs {
        InputArgs {
            file: file.to_string(),
            input_format: None,
            delimiter: None,
            skip_header: false,
            no_skip_header: false,
        }
    }

    #[test]
    fn test_open_source_detects_format() {
        let config = Config::default();
        assert_eq!(open_source(&input("a.json"), &config).format(), InputFormat::Json);
        assert_eq!(open_source(&input("a.csv"), &config).format(), InputFormat::Delimited);
    }

    #[test]
    fn test_open_source_format_override() {
        let mut args = input("a.json");
        args.input_format = Some(InputFormatArg::Rows);
        let source = open_source(&args, &Config::default());
        assert_eq!(source.format(), InputFormat::Delimited);
    }

    #[test]
    fn test_no_skip_header_overrides_config() {
        let mut config = Config::default();
        config.grouping.skip_header = true;

        let mut args = input("a.csv");
        assert!(args.skip_header_or(config.grouping.skip_header));

        args.no_skip_header = true;
        assert!(!args.skip_header_or(config.grouping.skip_header));

        args.no_skip_header = false;
        args.skip_header = true;
        assert!(args.skip_header_or(false));
    }
}
