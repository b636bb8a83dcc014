use crate::types::{CoverageBand, ParsedResult, TestMode};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use parking_lot::Mutex;
use std::fmt::Write;
use std::io::{self, Write as _};
use std::time::Duration;

// RGB tuple constants for use with the `colored` crate's `.truecolor()` method
pub mod rgb {
    pub const ELECTRIC_PURPLE: (u8, u8, u8) = (225, 53, 255);
    pub const NEON_CYAN: (u8, u8, u8) = (128, 255, 234);
    pub const ELECTRIC_YELLOW: (u8, u8, u8) = (241, 250, 140);
    pub const SUCCESS_GREEN: (u8, u8, u8) = (80, 250, 123);
    pub const ERROR_RED: (u8, u8, u8) = (255, 99, 99);
    pub const DIM_WHITE: (u8, u8, u8) = (180, 180, 190);
    pub const DIM_SEPARATOR: (u8, u8, u8) = (60, 60, 70);
}

/// User-visible warning and error surface, separate from generated content
pub trait Notifier: Send + Sync {
    fn warn(&self, message: &str);
    fn error(&self, message: &str);
}

/// Notifier that prints to stderr, pausing the active spinner if there is one.
///
/// Warnings and errors from the dispatcher are shown even in quiet mode.
pub struct ConsoleNotifier {
    spinner: Mutex<Option<ProgressBar>>,
    writer: Mutex<Box<dyn io::Write + Send>>,
}

impl Default for ConsoleNotifier {
    fn default() -> Self {
        Self::with_writer(Box::new(io::stderr()))
    }
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Send notices to `writer` instead of stderr
    pub fn with_writer(writer: Box<dyn io::Write + Send>) -> Self {
        Self {
            spinner: Mutex::new(None),
            writer: Mutex::new(writer),
        }
    }

    /// Route output around this spinner until it is cleared
    pub fn attach_spinner(&self, spinner: &ProgressBar) {
        *self.spinner.lock() = Some(spinner.clone());
    }

    pub fn detach_spinner(&self) {
        *self.spinner.lock() = None;
    }

    fn emit(&self, line: &str) {
        let print = || {
            let _ = writeln!(self.writer.lock(), "{line}");
        };
        match self.spinner.lock().as_ref() {
            Some(pb) => pb.suspend(print),
            None => print(),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn warn(&self, message: &str) {
        self.emit(&message.yellow().bold().to_string());
    }

    fn error(&self, message: &str) {
        self.emit(&message.red().bold().to_string());
    }
}

/// Track quiet mode state
static QUIET_MODE: std::sync::LazyLock<Mutex<bool>> =
    std::sync::LazyLock::new(|| Mutex::new(false));

/// Enable or disable quiet mode
pub fn set_quiet_mode(enabled: bool) {
    let mut quiet_mode = QUIET_MODE.lock();
    *quiet_mode = enabled;
}

/// Check if quiet mode is enabled
pub fn is_quiet_mode() -> bool {
    *QUIET_MODE.lock()
}

pub fn create_spinner(message: &str) -> ProgressBar {
    // Don't create a spinner in quiet mode
    if is_quiet_mode() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.bright_cyan.bold} {msg}")
            .expect("Could not set spinner style"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

pub fn print_info(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.cyan().bold());
    }
}

pub fn print_warning(message: &str) {
    if !is_quiet_mode() {
        eprintln!("{}", message.yellow().bold());
    }
}

pub fn print_error(message: &str) {
    // Always print errors, even in quiet mode
    eprintln!("{}", message.red().bold());
}

pub fn print_success(message: &str) {
    if !is_quiet_mode() {
        println!("{}", message.green().bold());
    }
}

/// Print a simple message (respects quiet mode)
pub fn print_message(message: &str) {
    if !is_quiet_mode() {
        println!("{message}");
    }
}

/// Print content with decorative borders
pub fn print_bordered(content: &str) {
    if !is_quiet_mode() {
        println!("{}", separator());
        println!("{content}");
        println!("{}", separator());
    }
}

/// Colour associated with a coverage band
pub const fn band_color(band: CoverageBand) -> (u8, u8, u8) {
    match band {
        CoverageBand::Good => rgb::SUCCESS_GREEN,
        CoverageBand::Warning => rgb::ELECTRIC_YELLOW,
        CoverageBand::Critical => rgb::ERROR_RED,
    }
}

fn section_title(title: &str) -> String {
    let (r, g, b) = rgb::ELECTRIC_PURPLE;
    format!("{}", title.truecolor(r, g, b).bold())
}

fn separator() -> String {
    let (r, g, b) = rgb::DIM_SEPARATOR;
    format!("{}", "━".repeat(50).truecolor(r, g, b))
}

/// Render a parsed result for the terminal
pub fn format_result(parsed: &ParsedResult, mode: TestMode) -> String {
    let mut output = String::new();
    let band = parsed.band();
    let (r, g, b) = band_color(band);
    let percent = parsed
        .coverage_percent
        .map_or_else(|| "N/A".to_string(), |p| format!("{p}%"));

    writeln!(output, "{}", separator()).expect("write to string should not fail");
    writeln!(
        output,
        "{}",
        section_title(&format!("Test Generation Complete: {}", mode.label()))
    )
    .expect("write to string should not fail");
    writeln!(output).expect("write to string should not fail");

    writeln!(
        output,
        "{} {} {}",
        "ESTIMATED COVERAGE".truecolor(rgb::DIM_WHITE.0, rgb::DIM_WHITE.1, rgb::DIM_WHITE.2),
        percent.truecolor(r, g, b).bold(),
        format!("({band})").truecolor(r, g, b)
    )
    .expect("write to string should not fail");
    writeln!(output, "{}", parsed.coverage_text).expect("write to string should not fail");
    writeln!(output).expect("write to string should not fail");

    let (cr, cg, cb) = rgb::NEON_CYAN;
    writeln!(output, "{}", section_title("Generated HCL Test Code"))
        .expect("write to string should not fail");
    for line in parsed.hcl_code.lines() {
        writeln!(output, "  {}", line.truecolor(cr, cg, cb)).expect("write to string should not fail");
    }
    writeln!(output).expect("write to string should not fail");

    writeln!(output, "{}", section_title("Resource Summary")).expect("write to string should not fail");
    writeln!(output, "{}", parsed.summary).expect("write to string should not fail");
    writeln!(output).expect("write to string should not fail");

    writeln!(output, "{}", section_title("Improvement Suggestions"))
        .expect("write to string should not fail");
    writeln!(output, "{}", parsed.suggestions).expect("write to string should not fail");
    write!(output, "{}", separator()).expect("write to string should not fail");

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_result;

    #[test]
    fn test_band_colors() {
        assert_eq!(band_color(CoverageBand::Good), rgb::SUCCESS_GREEN);
        assert_eq!(band_color(CoverageBand::Critical), rgb::ERROR_RED);
    }

    #[test]
    fn test_format_result_contains_sections() {
        colored::control::set_override(false);
        let parsed = parse_result(
            "## Resource and variable summary\nTwo resources\n## Coverage summary\n60% covered\n## Improvement suggestions\nAdd outputs\n```hcl\nrun \"a\" {}\n```",
        );
        let rendered = format_result(&parsed, TestMode::Real);

        assert!(rendered.contains("Test Generation Complete: Real Test"));
        assert!(rendered.contains("ESTIMATED COVERAGE 60% (warning)"));
        assert!(rendered.contains("  run \"a\" {}"));
        assert!(rendered.contains("Two resources"));
    }

    #[test]
    fn test_format_result_without_percentage() {
        colored::control::set_override(false);
        let parsed = parse_result("nothing useful");
        let rendered = format_result(&parsed, TestMode::Mock);
        assert!(rendered.contains("ESTIMATED COVERAGE N/A (critical)"));
        assert!(rendered.contains("No HCL code found."));
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(std::sync::Arc<Mutex<Vec<u8>>>);

    impl io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_notifier_ignores_quiet_mode() {
        colored::control::set_override(false);
        let buffer = SharedBuffer::default();
        let notifier = ConsoleNotifier::with_writer(Box::new(buffer.clone()));

        set_quiet_mode(true);
        notifier.warn("proxy in use");
        notifier.error("LLM call failed: boom");
        set_quiet_mode(false);

        let output = String::from_utf8(buffer.0.lock().clone()).expect("utf8");
        assert_eq!(output, "proxy in use\nLLM call failed: boom\n");
    }
}
