use ariadne::{Color, Label, Report, ReportKind, Source};
use std::ops::Range;
use std::path::Path;

const ARIADNE_MSG: &str = "Ariadne produces valid utf-8 strings";

/// Sink for `(line, message)` diagnostics from every phase.
pub trait ErrorReporter {
    fn report(&mut self, line: u32, message: &str);
}

/// Anything that can be routed through an [`ErrorReporter`].
pub trait Diagnostic {
    fn line(&self) -> u32;
    fn message(&self) -> String;
}

/// Line 0 means "no specific line".
pub fn render(line: u32, message: &str) -> String {
    if line == 0 {
        format!("Error: {message}")
    } else {
        format!("[Line {line}] Error: {message}")
    }
}

pub fn report_all<'a, D, R>(errors: impl IntoIterator<Item = &'a D>, reporter: &mut R)
where
    D: Diagnostic + 'a,
    R: ErrorReporter + ?Sized,
{
    for error in errors {
        reporter.report(error.line(), &error.message());
    }
}

pub struct StderrReporter;

impl ErrorReporter for StderrReporter {
    fn report(&mut self, line: u32, message: &str) {
        eprintln!("{}", render(line, message));
    }
}

/// Keeps every report for later inspection.
#[derive(Debug, Default)]
pub struct BufferedReporter {
    entries: Vec<(u32, String)>,
}

impl BufferedReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[(u32, String)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every report rendered on its own line.
    pub fn rendered(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|(line, message)| render(*line, message))
            .collect()
    }
}

impl ErrorReporter for BufferedReporter {
    fn report(&mut self, line: u32, message: &str) {
        self.entries.push((line, message.to_string()));
    }
}

/// Renders reports against the source text, labelling the offending line.
pub struct PrettyReporter<'src> {
    text: &'src str,
    path: &'src Path,
}

impl<'src> PrettyReporter<'src> {
    pub fn new(text: &'src str, path: &'src Path) -> Self {
        Self { text, path }
    }

    /// Byte range of the 1-based `line`, without its line break.
    fn line_range(&self, line: u32) -> Option<Range<usize>> {
        let index = (line as usize).checked_sub(1)?;
        let mut start = 0;
        for (current, segment) in self.text.split_inclusive('\n').enumerate() {
            if current == index {
                let content = segment.trim_end_matches(['\n', '\r']);
                return Some(start..start + content.len());
            }
            start += segment.len();
        }
        None
    }

    pub fn format(&self, line: u32, message: &str) -> String {
        let Some(range) = self.line_range(line) else {
            return render(line, message);
        };
        let path = self.path.to_string_lossy();
        let path = path.as_ref();
        let mut output = std::io::Cursor::new(Vec::new());
        let written = Report::build(ReportKind::Error, (path, range.clone()))
            .with_message(message)
            .with_label(
                Label::new((path, range))
                    .with_message(format!("line {line}"))
                    .with_color(Color::BrightRed),
            )
            .finish()
            .write((path, Source::from(self.text)), &mut output);
        match written {
            Ok(()) => String::from_utf8(output.into_inner()).expect(ARIADNE_MSG),
            Err(_) => render(line, message),
        }
    }
}

impl ErrorReporter for PrettyReporter<'_> {
    fn report(&mut self, line: u32, message: &str) {
        eprint!("{}", self.format(line, message));
    }
}
