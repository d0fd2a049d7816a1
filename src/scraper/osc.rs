//! Escape sequence handling for captured pane text
//!
//! Captured text can still carry SGR colours and OSC reports. The text is run
//! through a `vte` parser: printable characters are kept and working
//! directory reports (OSC 7, OSC 1337 `CurrentDir=`) are collected.

use percent_encoding::percent_decode_str;
use vte::{Parser, Perform};

/// Text with escape sequences removed, plus any cwd reports found in it
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrubbedText {
    pub text: String,
    /// Reported working directories, in order of appearance
    pub cwd_reports: Vec<String>,
}

#[derive(Default)]
struct Collector {
    text: String,
    cwd_reports: Vec<String>,
}

impl Perform for Collector {
    fn print(&mut self, c: char) {
        self.text.push(c);
    }

    fn execute(&mut self, byte: u8) {
        match byte {
            b'\n' => self.text.push('\n'),
            b'\t' => self.text.push('\t'),
            _ => {}
        }
    }

    fn osc_dispatch(&mut self, params: &[&[u8]], _bell_terminated: bool) {
        let Some((code, rest)) = params.split_first() else {
            return;
        };
        // vte splits on ';', which may also occur inside the payload
        let payload = rest
            .iter()
            .map(|p| String::from_utf8_lossy(p))
            .collect::<Vec<_>>()
            .join(";");

        let reported = match *code {
            b"7" => path_from_file_url(&payload),
            b"1337" => payload
                .strip_prefix("CurrentDir=")
                .filter(|dir| !dir.is_empty())
                .map(str::to_string),
            _ => None,
        };

        if let Some(dir) = reported {
            self.cwd_reports.push(dir);
        }
    }
}

/// Remove escape sequences from `raw`, collecting cwd reports
pub fn scrub(raw: &str) -> ScrubbedText {
    let mut parser = Parser::new();
    let mut collector = Collector::default();
    parser.advance(&mut collector, raw.as_bytes());

    ScrubbedText {
        text: collector.text,
        cwd_reports: collector.cwd_reports,
    }
}

/// Path of an OSC 7 URL: `file://host/path` (or kitty's `kitty-shell-cwd://`)
pub fn path_from_file_url(url: &str) -> Option<String> {
    let rest = url
        .strip_prefix("file://")
        .or_else(|| url.strip_prefix("kitty-shell-cwd://"))?;
    let path_start = rest.find('/')?;
    let path = percent_decode_str(&rest[path_start..])
        .decode_utf8_lossy()
        .into_owned();
    (!path.is_empty()).then_some(path)
}
