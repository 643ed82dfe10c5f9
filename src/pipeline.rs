//! End-to-end processing: decode, run the filter chain, encode.
//!
//! Output is produced only after every filter succeeded; on any error the
//! destination is left untouched (for [`run`], the output file is not even
//! created).

use std::ffi::OsString;
use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};

use crate::bmp::Bitmap;
use crate::error::{Error, Result};
use crate::filters::Registry;

// ============================================================================
// Command Line Arguments
// ============================================================================

/// Raw positional command line. Both paths are optional here so that a
/// missing one maps onto its own [`Error`] variant instead of a clap message.
#[derive(Parser, Debug)]
#[command(name = "image_processor", disable_help_flag = true, disable_version_flag = true)]
struct Args {
    /// Input BMP path
    #[arg(allow_hyphen_values = true)]
    input: Option<PathBuf>,

    /// Output BMP path
    #[arg(allow_hyphen_values = true)]
    output: Option<PathBuf>,

    /// Filter names, each followed by its arguments
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    filter_args: Vec<OsString>,
}

/// Positional command line: `<input> <output> [filter args...]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub input: PathBuf,
    pub output: PathBuf,
    pub filter_args: Vec<String>,
}

impl Options {
    /// Parse arguments that follow the program name.
    ///
    /// Paths may be any OS string; filter tokens must be valid UTF-8.
    pub fn parse<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let argv = std::iter::once(OsString::from("image_processor"))
            .chain(args.into_iter().map(Into::into));
        let args = Args::try_parse_from(argv).map_err(|e| {
            let message = e.to_string();
            Error::argument(message.lines().next().unwrap_or_default())
        })?;

        let input = args.input.ok_or(Error::EmptyOptions)?;
        let output = args.output.ok_or(Error::EmptyOutputFile)?;
        let filter_args = args
            .filter_args
            .into_iter()
            .map(|token| {
                token
                    .into_string()
                    .map_err(|token| Error::argument(format!("filter argument {token:?} is not valid UTF-8")))
            })
            .collect::<Result<_>>()?;

        Ok(Self {
            input,
            output,
            filter_args,
        })
    }
}

/// Decode from `reader`, apply the filters named in `args`, encode to `writer`.
///
/// Nothing is written to `writer` unless every step succeeds.
pub fn process<R, W, S>(reader: R, mut writer: W, args: &[S], registry: &Registry) -> Result<()>
where
    R: Read,
    W: Write,
    S: AsRef<str>,
{
    let bytes = process_to_vec(reader, args, registry)?;
    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

/// Same as [`process`], returning the encoded bitmap.
pub fn process_to_vec<R, S>(reader: R, args: &[S], registry: &Registry) -> Result<Vec<u8>>
where
    R: Read,
    S: AsRef<str>,
{
    let mut bitmap = Bitmap::decode(reader)?;
    registry.apply_all(args, &mut bitmap.image)?;
    let bytes = bitmap.to_bytes();
    debug!(
        width = bitmap.image.width(),
        height = bitmap.image.height(),
        bytes = bytes.len(),
        "filter chain finished"
    );
    Ok(bytes)
}

/// Run the whole CLI job described by `options`.
pub fn run(options: &Options, registry: &Registry) -> Result<()> {
    let input = File::open(&options.input)
        .map_err(|_| Error::InvalidInputFile(options.input.display().to_string()))?;
    info!(input = %options.input.display(), "processing");

    let bytes = process_to_vec(BufReader::new(input), &options.filter_args, registry)?;

    let mut output = File::create(&options.output)
        .map_err(|_| Error::InvalidOutputFile(options.output.display().to_string()))?;
    output.write_all(&bytes)?;
    output.flush()?;
    info!(output = %options.output.display(), bytes = bytes.len(), "wrote bitmap");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_parse() {
        let options = Options::parse(["in.bmp", "out.bmp", "-crop", "1", "2"]).unwrap();
        assert_eq!(options.input, PathBuf::from("in.bmp"));
        assert_eq!(options.output, PathBuf::from("out.bmp"));
        assert_eq!(options.filter_args, ["-crop", "1", "2"]);
    }

    #[test]
    fn test_options_missing_paths() {
        assert!(matches!(
            Options::parse(Vec::<String>::new()),
            Err(Error::EmptyOptions)
        ));
        assert!(matches!(Options::parse(["in.bmp"]), Err(Error::EmptyOutputFile)));
    }

    #[test]
    fn test_options_negative_numbers_are_filter_args() {
        let options = Options::parse(["in.bmp", "out.bmp", "-blur", "-1", "-neg"]).unwrap();
        assert_eq!(options.filter_args, ["-blur", "-1", "-neg"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_options_non_utf8_path() {
        use std::os::unix::ffi::OsStringExt;

        let input = OsString::from_vec(b"in\xff.bmp".to_vec());
        let options = Options::parse([input.clone(), OsString::from("out.bmp")]).unwrap();
        assert_eq!(options.input, PathBuf::from(input));
        assert!(options.filter_args.is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_options_non_utf8_filter_token() {
        use std::os::unix::ffi::OsStringExt;

        let token = OsString::from_vec(b"-n\xffg".to_vec());
        let err = Options::parse([OsString::from("a"), OsString::from("b"), token]).unwrap_err();
        assert!(matches!(err, Error::Argument(_)));
    }

    #[test]
    fn test_options_without_filters() {
        let options = Options::parse(["a", "b"]).unwrap();
        assert!(options.filter_args.is_empty());
    }
}
