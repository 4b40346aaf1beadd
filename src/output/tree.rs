//! Tree formatter for measured entries
//!
//! This module provides `EntryFormatter`, which writes one line per entry
//! of a pruned tree: its size, a kind marker and its full path.

use std::io::{self, Write};
use std::path::Path;

use termcolor::{Color, ColorChoice, ColorSpec, NoColor, StandardStream, WriteColor};

use crate::size::format_size;
use crate::tree::Entry;

use super::config::OutputConfig;

const SIZE_WIDTH: usize = 9;

/// Formatter for measured trees.
pub struct EntryFormatter {
    config: OutputConfig,
}

impl EntryFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    /// Format the tree as plain text, one line per entry.
    pub fn format(&self, entry: &Entry) -> String {
        let mut out = NoColor::new(Vec::new());
        // Writing into a Vec cannot fail
        let _ = self.render(&mut out, Path::new(""), Some(entry));
        String::from_utf8_lossy(&out.into_inner()).into_owned()
    }

    /// Print the tree to stdout followed by a count of what was shown.
    pub fn print(&self, entry: &Entry) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Always
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.render(&mut stdout, Path::new(""), Some(entry))?;
        let (dir_count, file_count) = entry.counts();
        writeln!(stdout)?;
        writeln!(stdout, "{} directories, {} files", dir_count, file_count)?;
        Ok(())
    }

    /// Write `entry` and its retained descendants depth-first.
    ///
    /// Each entry's path is `prefix` joined with its name; its children are
    /// written with that path as their prefix. An absent entry writes nothing.
    pub fn render<W: WriteColor>(
        &self,
        out: &mut W,
        prefix: &Path,
        entry: Option<&Entry>,
    ) -> io::Result<()> {
        let Some(entry) = entry else {
            return Ok(());
        };

        let path = prefix.join(entry.name());
        self.write_line(out, &path, entry)?;
        for child in &entry.children {
            self.render(out, &path, Some(child))?;
        }
        Ok(())
    }

    fn write_line<W: WriteColor>(&self, out: &mut W, path: &Path, entry: &Entry) -> io::Result<()> {
        let size = format_size(entry.size);
        out.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(out, "{:>width$}", size, width = SIZE_WIDTH)?;
        out.reset()?;
        write!(out, "  {}  ", kind_marker(entry))?;

        if entry.is_dir() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
        } else if entry.attributes.is_symlink() {
            out.set_color(ColorSpec::new().set_fg(Some(Color::Cyan)))?;
        }
        write!(out, "{}", path.display())?;
        out.reset()?;
        writeln!(out)?;
        Ok(())
    }
}

fn kind_marker(entry: &Entry) -> char {
    if entry.is_dir() {
        'd'
    } else if entry.attributes.is_symlink() {
        'l'
    } else {
        '-'
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Attributes;

    fn sample_tree() -> Entry {
        let c = Entry::dir(
            "C",
            vec![Entry::file("D", 200_000, Attributes::empty())],
            Attributes::empty(),
        );
        Entry::dir(
            "root",
            vec![
                Entry::file("A", 10, Attributes::empty()),
                Entry::file("B", 5000, Attributes::empty()),
                c,
            ],
            Attributes::empty(),
        )
    }

    fn formatter() -> EntryFormatter {
        EntryFormatter::new(OutputConfig::plain())
    }

    #[test]
    fn test_format_one_line_per_entry_depth_first() {
        let output = formatter().format(&sample_tree());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].ends_with("root"));
        assert!(lines[1].ends_with(&format!("root{}A", std::path::MAIN_SEPARATOR)));
        assert!(lines[2].ends_with(&format!("root{}B", std::path::MAIN_SEPARATOR)));
        assert!(lines[3].ends_with(&format!("root{}C", std::path::MAIN_SEPARATOR)));
        let d = Path::new("root").join("C").join("D");
        assert!(lines[4].ends_with(&d.display().to_string()));
    }

    #[test]
    fn test_format_line_layout() {
        let output = formatter().format(&sample_tree());
        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines[0], "  205.01K  d  root");
        assert!(lines[1].starts_with("      10B  -  "));
        assert!(lines[2].starts_with("       5K  -  "));
    }

    #[test]
    fn test_siblings_share_parent_prefix() {
        let tree = Entry::dir(
            "top",
            vec![
                Entry::dir(
                    "first",
                    vec![Entry::file("inner", 1, Attributes::empty())],
                    Attributes::empty(),
                ),
                Entry::file("second", 1, Attributes::empty()),
            ],
            Attributes::empty(),
        );
        let output = formatter().format(&tree);
        let second = Path::new("top").join("second").display().to_string();
        let wrong = Path::new("top").join("first").join("second").display().to_string();
        assert!(output.lines().any(|l| l.ends_with(&second)));
        assert!(!output.contains(&wrong));
    }

    #[test]
    fn test_symlink_marker() {
        let tree = Entry::dir(
            "root",
            vec![Entry::file("link", 10, Attributes::SYMLINK)],
            Attributes::empty(),
        );
        let output = formatter().format(&tree);
        assert!(output.lines().nth(1).unwrap().contains("  l  "));
    }

    #[test]
    fn test_render_absent_entry_writes_nothing() {
        let mut out = NoColor::new(Vec::new());
        formatter()
            .render(&mut out, Path::new(""), None)
            .unwrap();
        assert!(out.into_inner().is_empty());
    }

    #[test]
    fn test_render_with_prefix() {
        let mut out = NoColor::new(Vec::new());
        let leaf = Entry::file("leaf", 3, Attributes::empty());
        formatter()
            .render(&mut out, Path::new("base"), Some(&leaf))
            .unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.trim_end().ends_with(&Path::new("base").join("leaf").display().to_string()));
    }

    #[test]
    fn test_colored_render_wraps_sizes() {
        let mut out = termcolor::Ansi::new(Vec::new());
        formatter()
            .render(&mut out, Path::new(""), Some(&sample_tree()))
            .unwrap();
        let text = String::from_utf8(out.into_inner()).unwrap();
        assert!(text.contains("\x1b["));
        assert!(text.contains("205.01K"));
    }
}
