/// A line-oriented sink for everything the client shows the user:
/// rendered body lines, failure-class messages, and the startup banner.
///
/// The sink is the client's only observable side effect besides the
/// network. Tests capture output through the `Vec<String>` impl.
pub trait OutputSink {
    /// Emit one line.
    fn line(&mut self, line: &str);
}

/// A sink that writes to stdout.
#[derive(Debug, Default)]
pub struct Console;

impl OutputSink for Console {
    fn line(&mut self, line: &str) {
        println!("{line}");
    }
}

impl OutputSink for Vec<String> {
    fn line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}
