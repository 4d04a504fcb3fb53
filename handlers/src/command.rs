//! Bot command parsing: `/name[@bot] args`.

/// A parsed command. `name` is lowercased; `args` is the trimmed remainder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command<'a> {
    pub name: String,
    pub args: &'a str,
}

impl<'a> Command<'a> {
    /// Parses `text` as a command. Returns None for plain text and for commands addressed to
    /// another bot (`/cmd@other_bot`) when `bot_username` is known.
    pub fn parse(text: &'a str, bot_username: Option<&str>) -> Option<Self> {
        let body = text.trim_start().strip_prefix('/')?;
        let (head, rest) = match body.find(char::is_whitespace) {
            Some(pos) => (&body[..pos], &body[pos..]),
            None => (body, ""),
        };
        let (name, target) = match head.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (head, None),
        };
        if name.is_empty() {
            return None;
        }
        if let (Some(target), Some(bot)) = (target, bot_username) {
            if !target.eq_ignore_ascii_case(bot.trim_start_matches('@')) {
                return None;
            }
        }
        Some(Self {
            name: name.to_lowercase(),
            args: rest.trim(),
        })
    }

    /// First whitespace-separated argument.
    pub fn first_arg(&self) -> Option<&'a str> {
        self.args.split_whitespace().next()
    }
}
