use std::io::Write;

/// Where program output goes.
pub trait SystemContext {
    fn write(&mut self, text: &str);

    fn writeln(&mut self, text: &str) {
        self.write(text);
        self.write("\n");
    }
}

pub struct StdioContext;

impl SystemContext for StdioContext {
    fn write(&mut self, text: &str) {
        print!("{text}");
        // No newline means no implicit flush.
        let _ = std::io::stdout().flush();
    }

    fn writeln(&mut self, text: &str) {
        println!("{text}");
    }
}

#[derive(Debug, Default)]
pub struct BufferedContext {
    buffer: String,
}

impl BufferedContext {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    pub fn data(&self) -> &str {
        &self.buffer
    }

    pub fn into_data(self) -> String {
        self.buffer
    }
}

impl SystemContext for BufferedContext {
    fn write(&mut self, text: &str) {
        self.buffer.push_str(text);
    }
}
