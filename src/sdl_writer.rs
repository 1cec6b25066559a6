pub struct SdlOptions {
    pub line_break: String,
    pub indent: String,
}

impl Default for SdlOptions {
    fn default() -> SdlOptions {
        SdlOptions {
            line_break: "\n".to_string(),
            indent: "  ".to_string(),
        }
    }
}

/// Line-oriented text buffer that tracks the current indentation level.
pub struct SdlWriter {
    line_break: String,
    indent_sign: String,
    indent_level: usize,
    content: String
}

impl SdlWriter {
    pub fn new(options: &SdlOptions) -> SdlWriter {
        SdlWriter {
            line_break: options.line_break.to_string(),
            indent_sign: options.indent.to_string(),
            indent_level: 0,
            content: String::new()
        }
    }

    fn indent(&mut self) {
        self.indent_level += 1;
    }

    fn deindent(&mut self) {
        self.indent_level = self.indent_level.saturating_sub(1);
    }

    pub fn line(&mut self, code: &str) {
        let indent = self.indent_sign.repeat(self.indent_level);
        self.content.push_str(&indent);
        self.content.push_str(code);
        self.content.push_str(&self.line_break);
    }

    /// Separates blocks; never emits a leading or doubled blank line.
    pub fn blank_line(&mut self) {
        let doubled = self.line_break.repeat(2);
        if !self.content.is_empty() && !self.content.ends_with(&doubled) {
            self.content.push_str(&self.line_break);
        }
    }

    /// Writes `description` as a block string, if there is one.
    ///
    /// Single-line text stays on one line; multi-line text, or text whose last
    /// character would run into the closing quotes, gets the quotes on their own lines.
    pub fn description(&mut self, description: Option<&str>) {
        let Some(description) = description.map(str::trim).filter(|it| !it.is_empty()) else {
            return;
        };
        let escaped = description.replace("\"\"\"", "\\\"\"\"");
        if escaped.contains('\n') || escaped.ends_with('"') || escaped.ends_with('\\') {
            self.line("\"\"\"");
            for line in escaped.lines() {
                self.line(line.trim_end());
            }
            self.line("\"\"\"");
        } else {
            self.line(&format!("\"\"\"{}\"\"\"", escaped));
        }
    }

    pub fn begin_indent(&mut self, code: &str) {
        self.line(code);
        self.indent();
    }

    pub fn end_indent(&mut self, code: &str) {
        self.deindent();
        self.line(code);
    }

    pub fn build_string(self) -> String {
        self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indents_nested_lines() {
        let mut writer = SdlWriter::new(&SdlOptions::default());
        writer.begin_indent("type A {");
        writer.description(Some("  the id "));
        writer.line("id: ID!");
        writer.end_indent("}");
        writer.blank_line();
        writer.blank_line();
        writer.line("scalar B");
        assert_eq!(writer.build_string(), "type A {\n  \"\"\"the id\"\"\"\n  id: ID!\n}\n\nscalar B\n");
    }

    #[test]
    fn escapes_block_quotes_in_descriptions() {
        let mut writer = SdlWriter::new(&SdlOptions::default());
        writer.description(Some(r#"say """hi""" now"#));
        writer.description(Some("   "));
        writer.description(None);
        assert_eq!(writer.build_string(), "\"\"\"say \\\"\"\"hi\\\"\"\" now\"\"\"\n");
    }

    #[test]
    fn multi_line_descriptions_use_block_form() {
        let mut writer = SdlWriter::new(&SdlOptions::default());
        writer.begin_indent("type A {");
        writer.description(Some("first\nsecond"));
        writer.description(Some(r#"ends in "quotes""#));
        writer.end_indent("}");
        assert_eq!(
            writer.build_string(),
            "type A {\n  \"\"\"\n  first\n  second\n  \"\"\"\n  \"\"\"\n  ends in \"quotes\"\n  \"\"\"\n}\n"
        );
    }

    #[test]
    fn leading_blank_line_is_skipped() {
        let mut writer = SdlWriter::new(&SdlOptions::default());
        writer.blank_line();
        writer.end_indent("}");
        assert_eq!(writer.build_string(), "}\n");
    }
}
