//! Reporting of paths the scan could not read

use std::io;

use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::tree::SkippedEntry;

use super::config::OutputConfig;

pub struct SkipReporter {
    config: OutputConfig,
}

impl SkipReporter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    pub fn format(&self, skipped: &[SkippedEntry]) -> String {
        let mut out = NoColor::new(Vec::new());
        let _ = self.render(&mut out, skipped);
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }

    /// Print the skip list to stderr. Prints nothing when it is empty.
    pub fn print(&self, skipped: &[SkippedEntry]) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        let mut stderr = StandardStream::stderr(choice);
        self.render(&mut stderr, skipped)
    }

    pub fn render<W: WriteColor>(&self, out: &mut W, skipped: &[SkippedEntry]) -> io::Result<()> {
        if skipped.is_empty() {
            return Ok(());
        }

        writeln!(out)?;
        writeln!(out, "Some directories were skipped:")?;
        writeln!(out)?;
        for entry in skipped {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)))?;
            write!(out, "{}", entry.path().display())?;
            out.reset()?;
            writeln!(out, ": {}", entry.message())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reporter() -> SkipReporter {
        SkipReporter::new(OutputConfig::plain())
    }

    #[test]
    fn test_empty_skip_list_prints_nothing() {
        assert_eq!(reporter().format(&[]), "");
    }

    #[test]
    fn test_skip_list_in_order_with_messages() {
        let skipped = vec![
            SkippedEntry::new("root/locked", io::Error::from_raw_os_error(13)),
            SkippedEntry::new("root/gone", io::Error::from(io::ErrorKind::NotFound)),
        ];
        let output = reporter().format(&skipped);
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines[1], "Some directories were skipped:");
        assert!(lines[3].starts_with("root/locked: "));
        assert_eq!(
            lines[3],
            format!("root/locked: {}", skipped[0].message())
        );
        assert!(lines[4].starts_with("root/gone: "));
        assert_eq!(lines.len(), 5);
    }
}
