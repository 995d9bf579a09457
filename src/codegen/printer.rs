// Output sink shared by the code generators

/// Accumulates generated text
#[derive(Debug, Clone, Default)]
pub struct CodePrinter {
    output: String,
}

impl CodePrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Print without newline
    pub fn print(&mut self, text: &str) {
        self.output.push_str(text);
    }

    pub fn println(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
    }

    /// `// ` comment, one line per line of `text`
    pub fn comment(&mut self, text: &str) {
        for line in text.lines() {
            self.output.push_str("// ");
            self.output.push_str(line);
            self.output.push('\n');
        }
        if text.is_empty() {
            self.output.push_str("// \n");
        }
    }

    pub fn as_str(&self) -> &str {
        &self.output
    }

    pub fn into_string(self) -> String {
        self.output
    }
}
