//! Terminal rendering of search outcomes.
//!
//! Human-readable by default; `--json` prints the hit list as JSON for
//! scripting and keeps status lines off stdout.

use std::io::Write;

use serde::Serialize;

use crate::commands::search_commands::ResultSink;
use crate::models::search::SearchHit;

#[derive(Serialize)]
struct JsonOutput<'a> {
    count: usize,
    results: &'a [SearchHit],
}

pub fn format_json(hits: &[SearchHit]) -> String {
    let output = JsonOutput {
        count: hits.len(),
        results: hits,
    };
    serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
}

pub fn format_human(hits: &[SearchHit]) -> String {
    let mut output = String::new();
    for (i, hit) in hits.iter().enumerate() {
        output.push_str(&format!("{}. {}\n", i + 1, hit.file_name));
        if hit.file_path != hit.file_name {
            output.push_str(&format!("   Path: {}\n", hit.file_path));
        }
    }
    output
}

/// Writes results to `out` and diagnostics to `err`.
pub struct TerminalSink<O, E> {
    out: O,
    err: E,
    json: bool,
}

impl TerminalSink<std::io::Stdout, std::io::Stderr> {
    pub fn stdio(json: bool) -> Self {
        Self::new(std::io::stdout(), std::io::stderr(), json)
    }
}

impl<O: Write, E: Write> TerminalSink<O, E> {
    pub fn new(out: O, err: E, json: bool) -> Self {
        Self { out, err, json }
    }

    pub fn into_parts(self) -> (O, E) {
        (self.out, self.err)
    }
}

// Terminal writes are best effort; a closed pipe is not a search failure.
impl<O: Write, E: Write> ResultSink for TerminalSink<O, E> {
    fn show_results(&mut self, items: &[SearchHit]) {
        let text = if self.json {
            format_json(items)
        } else {
            format_human(items)
        };
        let _ = writeln!(self.out, "{}", text.trim_end());
    }

    fn show_status(&mut self, message: &str) {
        if self.json {
            let _ = writeln!(self.err, "{message}");
        } else {
            let _ = writeln!(self.out, "{message}");
        }
    }

    fn show_empty(&mut self) {
        if self.json {
            let _ = writeln!(self.out, "{}", format_json(&[]));
        }
    }

    fn show_error(&mut self, message: &str) {
        let _ = writeln!(self.err, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::search::MatchSource;

    fn hits() -> Vec<SearchHit> {
        vec![
            SearchHit {
                file_path: "D:/MCR/LIVE BIRTH/1998/CRUZ.pdf".to_string(),
                file_name: "CRUZ.pdf".to_string(),
                match_source: MatchSource::Index,
            },
            SearchHit {
                file_path: "SANTOS.pdf".to_string(),
                file_name: "SANTOS.pdf".to_string(),
                match_source: MatchSource::Filesystem,
            },
        ]
    }

    fn render(json: bool, run: impl FnOnce(&mut TerminalSink<Vec<u8>, Vec<u8>>)) -> (String, String) {
        let mut sink = TerminalSink::new(Vec::new(), Vec::new(), json);
        run(&mut sink);
        let (out, err) = sink.into_parts();
        (String::from_utf8(out).unwrap(), String::from_utf8(err).unwrap())
    }

    #[test]
    fn human_output_numbers_results_and_shows_paths() {
        let (out, err) = render(false, |sink| {
            sink.show_results(&hits());
            sink.show_status("Found 2 files.");
        });
        assert_eq!(
            out,
            "1. CRUZ.pdf\n   Path: D:/MCR/LIVE BIRTH/1998/CRUZ.pdf\n2. SANTOS.pdf\nFound 2 files.\n"
        );
        assert!(err.is_empty());
    }

    #[test]
    fn json_output_is_parseable_and_status_goes_to_stderr() {
        let (out, err) = render(true, |sink| {
            sink.show_results(&hits());
            sink.show_status("Found 2 files.");
        });
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["count"], 2);
        assert_eq!(value["results"][0]["match_source"], "index");
        assert_eq!(err, "Found 2 files.\n");
    }

    #[test]
    fn errors_always_go_to_stderr() {
        let (out, err) = render(false, |sink| {
            sink.show_error("Cannot find location. Please check the year.")
        });
        assert!(out.is_empty());
        assert_eq!(err, "Cannot find location. Please check the year.\n");
    }

    #[test]
    fn empty_json_result_is_still_a_document() {
        let (out, _) = render(true, |sink| sink.show_empty());
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["count"], 0);
    }
}
