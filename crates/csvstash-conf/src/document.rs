//! Logstash pipeline rendering.

use std::path::Path;

use csvstash_model::ConnectionSettings;

use crate::rules::{NAME_CLEANUP_RULES, NAME_FIELD, STRIP_FIELDS};

/// Default `sincedb_path`; the Windows null device.
pub const DEFAULT_SINCEDB_PATH: &str = "NUL";

const INDENT: &str = "  ";

/// Knobs that do not come from the connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Where Logstash keeps read offsets. Pointing it at a null device makes
    /// every run start from the top of the file.
    pub sincedb_path: String,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            sincedb_path: DEFAULT_SINCEDB_PATH.to_string(),
        }
    }
}

/// Everything needed to render one pipeline.
#[derive(Debug, Clone, Copy)]
pub struct PipelineDocument<'a> {
    pub source: &'a Path,
    pub columns: &'a [String],
    pub settings: &'a ConnectionSettings,
    pub options: &'a PipelineOptions,
}

impl PipelineDocument<'_> {
    /// Render input, filter and output sections, separated by blank lines.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.render_input());
        out.push('\n');
        out.push_str(&self.render_filter());
        out.push('\n');
        out.push_str(&self.render_output());
        out
    }

    pub fn render_input(&self) -> String {
        let mut out = String::new();
        line(&mut out, 0, "input {");
        line(&mut out, 1, "file {");
        line(
            &mut out,
            2,
            &format!("path => [{}]", quote(&self.source.display().to_string())),
        );
        line(&mut out, 2, "start_position => \"beginning\"");
        line(
            &mut out,
            2,
            &format!("sincedb_path => {}", quote(&self.options.sincedb_path)),
        );
        line(&mut out, 1, "}");
        line(&mut out, 0, "}");
        out
    }

    pub fn render_filter(&self) -> String {
        let mut out = String::new();
        line(&mut out, 0, "filter {");

        line(&mut out, 1, "csv {");
        line(
            &mut out,
            2,
            &format!("columns => {}", array(self.columns.iter().map(String::as_str))),
        );
        line(&mut out, 2, "skip_header => \"true\"");
        line(&mut out, 1, "}");

        line(&mut out, 1, "mutate {");
        line(&mut out, 2, "gsub => [");
        let field = quote(NAME_FIELD);
        let last = NAME_CLEANUP_RULES.len().saturating_sub(1);
        for (idx, rule) in NAME_CLEANUP_RULES.iter().enumerate() {
            let separator = if idx == last { "" } else { "," };
            line(
                &mut out,
                3,
                &format!(
                    "{field}, {}, {}{separator}",
                    quote(rule.pattern),
                    quote(rule.replacement)
                ),
            );
        }
        line(&mut out, 2, "]");
        line(
            &mut out,
            2,
            &format!("strip => {}", array(STRIP_FIELDS.iter().copied())),
        );
        line(&mut out, 1, "}");

        line(&mut out, 0, "}");
        out
    }

    pub fn render_output(&self) -> String {
        let settings = self.settings;
        let mut out = String::new();
        line(&mut out, 0, "output {");
        line(&mut out, 1, "elasticsearch {");
        line(&mut out, 2, &format!("hosts => {}", quote(&settings.hosts)));
        line(&mut out, 2, &format!("index => {}", quote(&settings.index)));
        for (name, value) in settings.optional_fields() {
            line(&mut out, 2, &format!("{name} => {}", quote(value)));
        }
        line(&mut out, 1, "}");
        line(&mut out, 0, "}");
        out
    }
}

fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}

/// Double-quoted Logstash string. Backslashes pass through untouched so regex
/// escapes like `\s` reach Logstash as written, except where one would pair
/// with a quote (an embedded `"` or the closing one); those are doubled.
fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' if matches!(chars.peek(), None | Some('"')) => out.push_str("\\\\"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn array<'a>(values: impl Iterator<Item = &'a str>) -> String {
    let items: Vec<String> = values.map(quote).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_output_section_required_only() {
        let settings = ConnectionSettings::new("http://localhost:9200", "companies");
        let options = PipelineOptions::default();
        let source = PathBuf::from("/data/companies_utf8.csv");
        let columns = columns(&["id"]);
        let document = PipelineDocument {
            source: &source,
            columns: &columns,
            settings: &settings,
            options: &options,
        };

        insta::assert_snapshot!(document.render_output(), @r#"
        output {
          elasticsearch {
            hosts => "http://localhost:9200"
            index => "companies"
          }
        }
        "#);
    }

    #[test]
    fn test_output_section_optional_order() {
        let settings = ConnectionSettings::new("https://es:9200", "companies")
            .with_ssl_certificate_authorities("/certs/http_ca.crt")
            .with_password("secret")
            .with_user("elastic");
        let options = PipelineOptions::default();
        let source = PathBuf::from("a.csv");
        let document = PipelineDocument {
            source: &source,
            columns: &[],
            settings: &settings,
            options: &options,
        };

        let output = document.render_output();
        let lines: Vec<&str> = output.lines().map(str::trim).collect();
        assert_eq!(
            lines,
            vec![
                "output {",
                "elasticsearch {",
                "hosts => \"https://es:9200\"",
                "index => \"companies\"",
                "user => \"elastic\"",
                "password => \"secret\"",
                "ssl_certificate_authorities => \"/certs/http_ca.crt\"",
                "}",
                "}",
            ]
        );
    }

    #[test]
    fn test_input_section() {
        let settings = ConnectionSettings::new("h", "i");
        let options = PipelineOptions {
            sincedb_path: "/dev/null".to_string(),
        };
        let source = PathBuf::from("/data/companies_utf8.csv");
        let document = PipelineDocument {
            source: &source,
            columns: &[],
            settings: &settings,
            options: &options,
        };

        assert_eq!(
            document.render_input(),
            "input {\n  file {\n    path => [\"/data/companies_utf8.csv\"]\n    \
             start_position => \"beginning\"\n    sincedb_path => \"/dev/null\"\n  }\n}\n"
        );
    }

    #[test]
    fn test_columns_are_verbatim() {
        let settings = ConnectionSettings::new("h", "i");
        let options = PipelineOptions::default();
        let source = PathBuf::from("a.csv");
        let columns = columns(&["id", " 사업장명", "id", "say \"hi\""]);
        let document = PipelineDocument {
            source: &source,
            columns: &columns,
            settings: &settings,
            options: &options,
        };

        let filter = document.render_filter();
        assert!(filter.contains(
            "    columns => [\"id\", \" 사업장명\", \"id\", \"say \\\"hi\\\"\"]\n"
        ));
        assert!(filter.contains("    skip_header => \"true\"\n"));
    }

    #[test]
    fn test_quote_backslashes() {
        assert_eq!(quote(r"\s+"), r#""\s+""#);
        assert_eq!(quote(r"a\"), r#""a\\""#);
        assert_eq!(quote(r#"a\"b"#), r#""a\\\"b""#);
        assert_eq!(quote(r#"say "hi""#), r#""say \"hi\"""#);
    }

    #[test]
    fn test_trailing_backslash_column_is_terminated() {
        let settings = ConnectionSettings::new("h", "i");
        let options = PipelineOptions::default();
        let source = PathBuf::from("a.csv");
        let columns = columns(&["a\\", "b"]);
        let document = PipelineDocument {
            source: &source,
            columns: &columns,
            settings: &settings,
            options: &options,
        };

        assert!(
            document
                .render_filter()
                .contains(r#"    columns => ["a\\", "b"]"#)
        );
    }

    #[test]
    fn test_gsub_chain_rendering() {
        let settings = ConnectionSettings::new("h", "i");
        let options = PipelineOptions::default();
        let source = PathBuf::from("a.csv");
        let document = PipelineDocument {
            source: &source,
            columns: &[],
            settings: &settings,
            options: &options,
        };

        let filter = document.render_filter();
        assert!(filter.contains(
            "    gsub => [\n      \"사업장명\", \"주식회사\", \"\",\n      \"사업장명\", \"유한회사\", \"\",\n"
        ));
        assert!(filter.contains(
            "      \"사업장명\", \"\\([^)]*\\)\", \"\",\n      \"사업장명\", \"（[^）]*）\", \"\",\n      \"사업장명\", \"\\s+\", \" \"\n    ]\n    strip => [\"사업장명\"]\n"
        ));
    }

    #[test]
    fn test_sections_are_separated() {
        let settings = ConnectionSettings::new("h", "i");
        let options = PipelineOptions::default();
        let source = PathBuf::from("a.csv");
        let document = PipelineDocument {
            source: &source,
            columns: &[],
            settings: &settings,
            options: &options,
        };

        let text = document.render();
        assert!(text.starts_with("input {\n"));
        assert!(text.contains("}\n\nfilter {\n"));
        assert!(text.contains("}\n\noutput {\n"));
        assert!(text.ends_with("  }\n}\n"));
    }
}
