//! Plain-text help listing for a [`Registry`].
//!
//! One row per declared argument, in registration order. Styling (colors,
//! emphasis) is left to a caller-supplied [`HelpStyle`].

use std::io::Write;

use crate::registry::{ArgKind, ArgumentSpec, Registry};

/// Which free-form sections surround the argument listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpSections {
    pub usage: bool,
    pub description: bool,
    pub epilog: bool,
}

impl Default for HelpSections {
    fn default() -> Self {
        Self::all()
    }
}

impl HelpSections {
    pub fn all() -> Self {
        Self {
            usage: true,
            description: true,
            epilog: true,
        }
    }

    /// Only the argument listing.
    pub fn arguments_only() -> Self {
        Self {
            usage: false,
            description: false,
            epilog: false,
        }
    }
}

/// Hook for decorating pieces of the help text.
///
/// Column widths are computed on the undecorated text, so escape sequences
/// returned here do not break alignment.
pub trait HelpStyle {
    fn heading(&self, text: &str) -> String {
        text.to_string()
    }

    /// The left column: symbol, name and value placeholder.
    fn invocation(&self, text: &str) -> String {
        text.to_string()
    }

    /// Help text plus required/default annotations.
    fn annotation(&self, text: &str) -> String {
        text.to_string()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PlainStyle;

impl HelpStyle for PlainStyle {}

fn value_name(spec: &ArgumentSpec) -> String {
    spec.name().to_ascii_uppercase()
}

fn format_left(spec: &ArgumentSpec, prefix: char, collect: bool) -> String {
    let mut out = String::new();
    // Positional symbols are never matched, so they are not advertised.
    if let Some(symbol) = spec.symbol().filter(|_| spec.kind() != ArgKind::Positional) {
        out.push(prefix);
        out.push(symbol);
        out.push_str(", ");
    }
    match spec.kind() {
        ArgKind::Flag => {
            out.push(prefix);
            out.push(prefix);
            out.push_str(spec.name());
        }
        ArgKind::Keyword => {
            out.push(prefix);
            out.push(prefix);
            out.push_str(&format!("{}=<{}>", spec.name(), value_name(spec)));
        }
        ArgKind::Positional => {
            let placeholder = if collect && spec.arity() > 1 {
                format!("<{}>...", value_name(spec))
            } else {
                format!("<{}>", value_name(spec))
            };
            out.push_str(&format!("{}={placeholder}", spec.name()));
        }
    }
    out
}

fn format_right(spec: &ArgumentSpec) -> String {
    let mut parts: Vec<String> = Vec::new();
    if let Some(help) = spec.help() {
        let help = help.trim();
        if !help.is_empty() {
            parts.push(help.to_string());
        }
    }
    if spec.kind() != ArgKind::Flag {
        if spec.required() {
            parts.push("(required)".to_string());
        }
        if let Some(default_value) = spec.default_value() {
            parts.push(format!("[default: {default_value}]"));
        }
    }
    parts.join(" ")
}

/// Render the help text for `registry`.
pub fn render(registry: &Registry, sections: HelpSections, style: &dyn HelpStyle) -> String {
    let config = registry.config();
    let mut out = String::new();

    if sections.usage {
        let usage = config.usage.trim();
        let usage = if usage.is_empty() {
            config.program.trim()
        } else {
            usage
        };
        if !usage.is_empty() {
            out.push_str(&format!("{} {usage}\n", style.heading("Usage:")));
        }
    }

    if sections.description && !config.description.trim().is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(config.description.trim_end());
        out.push('\n');
    }

    let rows: Vec<(String, String)> = registry
        .specs()
        .map(|spec| {
            (
                format_left(spec, config.prefix_character, config.collect_multiple),
                format_right(spec),
            )
        })
        .collect();
    if !rows.is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(&style.heading("Arguments:"));
        out.push('\n');
        let width = rows
            .iter()
            .map(|(left, _)| left.chars().count())
            .max()
            .unwrap_or(0);
        for (left, right) in rows {
            if right.is_empty() {
                out.push_str(&format!("  {}\n", style.invocation(&left)));
            } else {
                let pad = " ".repeat(width - left.chars().count());
                out.push_str(&format!(
                    "  {}{pad}  {}\n",
                    style.invocation(&left),
                    style.annotation(&right)
                ));
            }
        }
    }

    if sections.epilog && !config.epilog.trim().is_empty() {
        if !out.is_empty() {
            out.push('\n');
        }
        out.push_str(config.epilog.trim_end());
        out.push('\n');
    }

    out
}

impl Registry {
    pub fn render_help(&self, sections: HelpSections) -> String {
        render(self, sections, &PlainStyle)
    }

    pub fn render_help_with(&self, sections: HelpSections, style: &dyn HelpStyle) -> String {
        render(self, sections, style)
    }

    /// Write the full help text to stdout.
    pub fn print_help(&self) -> std::io::Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(self.render_help(HelpSections::all()).as_bytes())?;
        stdout.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RegistryConfig;

    fn registry() -> Registry {
        let mut r = Registry::create(
            "my_program",
            "my_program [options]",
            "This is a sample program.",
            "Epilog message",
        );
        r.add_flag('v', "verbose", "Enable verbose mode").unwrap();
        r.add_keyword('c', "count", true, None, "Number of times")
            .unwrap();
        r.add_positional(None, "output", false, 1, Some("out.txt"), "Output file")
            .unwrap();
        r.add_flag('s', "store", "").unwrap();
        r
    }

    fn argument_lines(text: &str) -> Vec<&str> {
        text.split("Arguments:\n")
            .nth(1)
            .unwrap()
            .lines()
            .take_while(|l| l.starts_with("  "))
            .collect()
    }

    #[test]
    fn one_row_per_argument_in_registration_order() {
        let r = registry();
        let text = r.render_help(HelpSections::all());
        let lines = argument_lines(&text);
        assert_eq!(lines.len(), r.len());
        assert!(lines[0].contains("-h, --help"));
        assert!(lines[1].contains("-v, --verbose"));
        assert!(lines[2].contains("-c, --count=<COUNT>"));
        assert!(lines[3].contains("output=<OUTPUT>"));
        assert!(lines[4].trim_end().ends_with("-s, --store"));
    }

    #[test]
    fn rows_carry_required_and_default() {
        let text = registry().render_help(HelpSections::arguments_only());
        assert!(text.contains("Number of times (required)"));
        assert!(text.contains("Output file [default: out.txt]"));
        assert!(text.starts_with("Arguments:\n"));
        assert!(!text.contains("Epilog message"));
    }

    #[test]
    fn sections_are_optional() {
        let r = registry();
        let full = r.render_help(HelpSections::all());
        assert!(full.starts_with("Usage: my_program [options]\n"));
        assert!(full.contains("This is a sample program."));
        assert!(full.trim_end().ends_with("Epilog message"));

        let no_description = r.render_help(HelpSections {
            description: false,
            ..HelpSections::all()
        });
        assert!(!no_description.contains("This is a sample program."));
    }

    #[test]
    fn usage_falls_back_to_program_name() {
        let r = Registry::new(RegistryConfig::new("tool").auto_help(false));
        assert_eq!(r.render_help(HelpSections::all()), "Usage: tool\n");
    }

    #[test]
    fn rendering_is_deterministic() {
        let r = registry();
        assert_eq!(
            r.render_help(HelpSections::all()),
            r.render_help(HelpSections::all())
        );
    }

    #[test]
    fn style_hook_keeps_alignment() {
        struct Brackets;
        impl HelpStyle for Brackets {
            fn invocation(&self, text: &str) -> String {
                format!("[{text}]")
            }
        }

        let mut r = Registry::new(RegistryConfig::new("p").auto_help(false));
        r.add_flag('a', "all", "Everything").unwrap();
        r.add_flag(None, "longer-name", "Something").unwrap();
        let text = r.render_help_with(HelpSections::arguments_only(), &Brackets);
        let lines = argument_lines(&text);
        assert_eq!(lines[0], "  [-a, --all]      Everything");
        assert_eq!(lines[1], "  [--longer-name]  Something");
    }

    #[test]
    fn custom_prefix_is_rendered() {
        let mut r = Registry::new(RegistryConfig::new("p").prefix_character('/'));
        r.add_keyword('o', "out", false, None, "").unwrap();
        let text = r.render_help(HelpSections::arguments_only());
        assert!(text.contains("/o, //out=<OUT>"));
        assert!(text.contains("/h, //help"));
    }

    #[test]
    fn positional_rows_omit_symbol() {
        let mut r = Registry::new(RegistryConfig::new("p").auto_help(false));
        r.add_positional('o', "output", false, 1, None, "").unwrap();
        let text = r.render_help(HelpSections::arguments_only());
        let lines = argument_lines(&text);
        assert_eq!(lines, vec!["  output=<OUTPUT>"]);
    }

    #[test]
    fn ellipsis_only_when_collecting() {
        let build = |collect: bool| {
            let mut r = Registry::new(
                RegistryConfig::new("p")
                    .auto_help(false)
                    .collect_multiple(collect),
            );
            r.add_positional(None, "files", false, 3, None, "").unwrap();
            r.render_help(HelpSections::arguments_only())
        };
        assert!(build(true).contains("files=<FILES>..."));
        let single = build(false);
        assert!(single.contains("files=<FILES>"));
        assert!(!single.contains("..."));
    }
}
