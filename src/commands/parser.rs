//! Prefix command parsing
//!
//! Arguments are whitespace separated; double quotes group words containing spaces.

/// Split command arguments, honouring double quotes
pub fn split_args(input: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut has_token = false;

    for ch in input.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                has_token = true;
            }
            c if c.is_whitespace() && !in_quotes => {
                if has_token {
                    args.push(std::mem::take(&mut current));
                    has_token = false;
                }
            }
            c => {
                current.push(c);
                has_token = true;
            }
        }
    }
    if has_token {
        args.push(current);
    }
    args
}

/// Parse `<prefix><name> args...` into a lower-cased command name and its arguments
pub fn parse_command(prefix: &str, content: &str) -> Option<(String, Vec<String>)> {
    let rest = content.trim_start().strip_prefix(prefix)?;
    if rest.starts_with(char::is_whitespace) {
        return None;
    }
    let mut args = split_args(rest);
    if args.is_empty() {
        return None;
    }
    let name = args.remove(0).to_lowercase();
    (!name.is_empty()).then_some((name, args))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_and_quoted() {
        assert_eq!(split_args("Nyx Nx: https://a"), vec!["Nyx", "Nx:", "https://a"]);
        assert_eq!(
            split_args(r#""Lady Nyx"   "n x:" tail"#),
            vec!["Lady Nyx", "n x:", "tail"]
        );
        assert_eq!(split_args(r#"a "" b"#), vec!["a", "", "b"]);
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("!", "!Register Nyx Nx:"),
            Some(("register".to_string(), vec!["Nyx".to_string(), "Nx:".to_string()]))
        );
        assert_eq!(parse_command("!", "  !list"), Some(("list".to_string(), vec![])));
        assert_eq!(parse_command("e!", "e!help"), Some(("help".to_string(), vec![])));
        assert_eq!(parse_command("!", "hello !list"), None);
        assert_eq!(parse_command("!", "!"), None);
        assert_eq!(parse_command("!", "! list"), None);
    }
}
