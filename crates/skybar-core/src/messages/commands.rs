use compact_str::CompactString;

/// Commands FROM the GTK side TO async services
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    /// Start a program detached from the panel
    LaunchApp {
        exec: CompactString,
        args: Vec<String>,
    },
}
