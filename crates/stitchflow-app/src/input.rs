//! Interpretation of stdin lines.

/// What a line typed by the user asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Move focus to a section.
    Focus(String),
    /// Leave any section.
    Clear,
    /// Print the current peer list.
    ListPeers,
    /// A `/command` we don't know.
    Unknown(String),
}

pub fn parse_line(line: &str) -> Input {
    let line = line.trim();
    match line {
        "" => Input::Clear,
        "/peers" => Input::ListPeers,
        "/clear" => Input::Clear,
        cmd if cmd.starts_with('/') => Input::Unknown(cmd.to_string()),
        section => Input::Focus(section.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_words_are_sections() {
        assert_eq!(parse_line("notes"), Input::Focus("notes".into()));
        assert_eq!(parse_line("  records \n"), Input::Focus("records".into()));
    }

    #[test]
    fn empty_line_clears() {
        assert_eq!(parse_line(""), Input::Clear);
        assert_eq!(parse_line("   "), Input::Clear);
        assert_eq!(parse_line("/clear"), Input::Clear);
    }

    #[test]
    fn slash_commands() {
        assert_eq!(parse_line("/peers"), Input::ListPeers);
        assert_eq!(parse_line("/quit"), Input::Unknown("/quit".into()));
    }
}
