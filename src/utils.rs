use std::{
    fs,
    io::{self, Write},
};

use anyhow::{Context, Result};
use console::style;

use crate::traits::WideSerialize;

/// Takes in a string and colors it using console::style
///
/// mainly putting this here in case i want to change the color later, making any changes easy
pub fn module_colorizer(modname: &str) -> String {
    style(modname).cyan().to_string()
}

/// Takes in a string and examines the first character to return a color version of the same
/// string
pub fn status_colorizer(status: &str) -> String {
    match status.chars().next() {
        Some('1') => style(status).blue().to_string(), // informational
        Some('2') => style(status).green().bold().to_string(), // success
        Some('3') => style(status).yellow().to_string(), // redirects
        Some('4') => style(status).red().to_string(),  // client error
        Some('5') => style(status).red().to_string(),  // server error
        Some('E') => style(status).red().to_string(),  // ERROR
        _ => status.to_string(),                       // ¯\_(ツ)_/¯
    }
}

/// Simple helper to generate an error message prefixed with a colored ERROR
pub fn fmt_err(msg: &str) -> String {
    format!("{}: {}", status_colorizer("ERROR"), msg)
}

/// Open `filename` for appending, creating it when necessary
pub fn open_file(filename: &str) -> Result<io::BufWriter<fs::File>> {
    log::trace!("enter: open_file({})", filename);

    let file = fs::OpenOptions::new() // std fs
        .create(true)
        .append(true)
        .open(filename)
        .with_context(|| fmt_err(&format!("Could not open {filename}")))?;

    let writer = io::BufWriter::new(file); // std io

    log::trace!("exit: open_file -> {:?}", writer);
    Ok(writer)
}

/// Given a string and a reference to a locked buffered file, write the contents and flush
/// the buffer to disk.
pub fn write_to<T>(value: &T, file: &mut dyn Write, convert_to_json: bool) -> Result<()>
where
    T: WideSerialize,
{
    // note to future self: adding logging of anything other than error to this function
    // is a bad idea. we call this function while processing records generated by the logger.
    // If we then call log::... while already processing some logging output, it results in
    // the second log entry being injected into the first.

    let contents = if convert_to_json {
        value.as_json()?
    } else {
        value.as_str()
    };

    let contents = console::strip_ansi_codes(&contents); // strip ansi color codes

    file.write_all(contents.as_bytes())?;
    file.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;

    #[derive(Serialize)]
    struct Dummy {
        value: usize,
    }

    impl WideSerialize for Dummy {
        fn as_str(&self) -> String {
            format!("{}\n", style(self.value).red())
        }

        fn as_json(&self) -> Result<String> {
            Ok(format!("{}\n", serde_json::to_string(self)?))
        }
    }

    #[test]
    /// status_colorizer should leave unknown strings alone
    fn status_colorizer_returns_unknown_as_is() {
        assert_eq!(status_colorizer("stuff"), "stuff");
    }

    #[test]
    /// fmt_err should include the given message
    fn fmt_err_contains_message() {
        let msg = fmt_err("something broke");
        assert!(msg.contains("something broke"));
        assert!(console::strip_ansi_codes(&msg).starts_with("ERROR: "));
    }

    #[test]
    /// write_to should strip ansi color codes from the text representation
    fn write_to_strips_ansi_codes() {
        let mut buffer: Vec<u8> = Vec::new();
        write_to(&Dummy { value: 42 }, &mut buffer, false).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "42\n");
    }

    #[test]
    /// write_to should use the json representation when asked
    fn write_to_writes_json() {
        let mut buffer: Vec<u8> = Vec::new();
        write_to(&Dummy { value: 42 }, &mut buffer, true).unwrap();
        assert_eq!(String::from_utf8(buffer).unwrap(), "{\"value\":42}\n");
    }

    #[test]
    /// open_file should create a missing file
    fn open_file_creates_file() {
        let tmp_dir = tempfile::TempDir::new().unwrap();
        let path = tmp_dir.path().join("created");
        let mut writer = open_file(path.to_str().unwrap()).unwrap();
        writer.write_all(b"stuff").unwrap();
        writer.flush().unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "stuff");
    }
}
