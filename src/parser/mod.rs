// src/parser/mod.rs
pub mod ast;

use ast::{Command, Redirect, RedirectMode, Stream};

/// Parse one input line. Never fails: unbalanced quotes and dangling
/// redirection operators are accepted on a best-effort basis.
pub fn parse(input: &str) -> Command {
    let tokens = tokenize(input);
    let cmd = extract_redirects(tokens);
    tracing::debug!(?cmd, "parsed");
    cmd
}

/// Split a line into words, honouring single and double quotes.
/// Only the quote character that opened a quoted run can close it.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;

    for c in input.chars() {
        match (c, quote) {
            ('\'' | '"', None) => quote = Some(c),
            (c, Some(q)) if c == q => quote = None,
            (c, None) if c.is_whitespace() => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            (c, _) => current.push(c),
        }
    }

    // An unterminated quote still yields what was collected
    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

fn redirect_op(token: &str) -> Option<(Stream, RedirectMode)> {
    match token {
        ">" | "1>"   => Some((Stream::Stdout, RedirectMode::Truncate)),
        ">>" | "1>>" => Some((Stream::Stdout, RedirectMode::Append)),
        "2>"         => Some((Stream::Stderr, RedirectMode::Truncate)),
        "2>>"        => Some((Stream::Stderr, RedirectMode::Append)),
        _            => None,
    }
}

fn extract_redirects(tokens: Vec<String>) -> Command {
    let mut cmd = Command::default();
    let mut tokens = tokens.into_iter();

    while let Some(token) = tokens.next() {
        let Some((stream, mode)) = redirect_op(&token) else {
            cmd.args.push(token);
            continue;
        };
        // A trailing operator with no filename is dropped
        let Some(path) = tokens.next() else { break };
        let redirect = Some(Redirect { path: path.into(), mode });
        match stream {
            Stream::Stdout => cmd.stdout = redirect,
            Stream::Stderr => cmd.stderr = redirect,
        }
    }

    cmd
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn args(cmd: &Command) -> Vec<&str> {
        cmd.args.iter().map(String::as_str).collect()
    }

    fn target(path: &str, mode: RedirectMode) -> Option<Redirect> {
        Some(Redirect { path: PathBuf::from(path), mode })
    }

    #[test]
    fn test_plain_words() {
        let cmd = parse("  ls   -la\t/tmp  ");
        assert_eq!(args(&cmd), ["ls", "-la", "/tmp"]);
        assert_eq!(cmd.stdout, None);
        assert_eq!(cmd.stderr, None);
    }

    #[test]
    fn test_quotes_keep_whitespace() {
        let cmd = parse(r#"echo "a  b" c"#);
        assert_eq!(args(&cmd), ["echo", "a  b", "c"]);
    }

    #[test]
    fn test_quotes_join_adjacent_text() {
        let cmd = parse(r#"echo ab"cd ef"'g h'"#);
        assert_eq!(args(&cmd), ["echo", "abcd efg h"]);
    }

    #[test]
    fn test_other_quote_is_literal() {
        let cmd = parse(r#"echo "it's" 'say "hi"'"#);
        assert_eq!(args(&cmd), ["echo", "it's", r#"say "hi""#]);
    }

    #[test]
    fn test_unterminated_quote() {
        let cmd = parse("echo 'hello world");
        assert_eq!(args(&cmd), ["echo", "hello world"]);
    }

    #[test]
    fn test_empty_quotes_produce_no_token() {
        let cmd = parse("echo ''");
        assert_eq!(args(&cmd), ["echo"]);
    }

    #[test]
    fn test_stdout_truncate() {
        let cmd = parse("ls > out.txt");
        assert_eq!(args(&cmd), ["ls"]);
        assert_eq!(cmd.stdout, target("out.txt", RedirectMode::Truncate));

        let cmd = parse("ls 1> out.txt");
        assert_eq!(cmd.stdout, target("out.txt", RedirectMode::Truncate));
    }

    #[test]
    fn test_both_append() {
        let cmd = parse("ls >> out.txt 2>> err.txt");
        assert_eq!(args(&cmd), ["ls"]);
        assert_eq!(cmd.stdout, target("out.txt", RedirectMode::Append));
        assert_eq!(cmd.stderr, target("err.txt", RedirectMode::Append));

        let cmd = parse("ls 1>> out.txt 2> err.txt -l");
        assert_eq!(args(&cmd), ["ls", "-l"]);
        assert_eq!(cmd.stdout, target("out.txt", RedirectMode::Append));
        assert_eq!(cmd.stderr, target("err.txt", RedirectMode::Truncate));
    }

    #[test]
    fn test_dangling_operator_dropped() {
        let cmd = parse("echo hi >");
        assert_eq!(args(&cmd), ["echo", "hi"]);
        assert_eq!(cmd.stdout, None);

        let cmd = parse("echo hi 2>>");
        assert_eq!(cmd.stderr, None);
    }

    #[test]
    fn test_quoted_operator_is_still_an_operator() {
        // quotes are stripped before redirection scanning
        let cmd = parse(r#"echo a ">" b"#);
        assert_eq!(args(&cmd), ["echo", "a"]);
        assert_eq!(cmd.stdout, target("b", RedirectMode::Truncate));
    }

    #[test]
    fn test_operator_needs_whitespace() {
        let cmd = parse("echo hi>out");
        assert_eq!(args(&cmd), ["echo", "hi>out"]);
        assert_eq!(cmd.stdout, None);
    }

    #[test]
    fn test_last_redirect_wins() {
        let cmd = parse("cmd > a > b");
        assert_eq!(cmd.stdout, target("b", RedirectMode::Truncate));
    }

    #[test]
    fn test_empty_and_redirect_only() {
        assert!(parse("").is_empty());
        assert!(parse("   \t ").is_empty());
        let cmd = parse("> out.txt");
        assert!(cmd.is_empty());
        assert_eq!(cmd.stdout, target("out.txt", RedirectMode::Truncate));
    }

    #[test]
    fn test_redirections_order() {
        let cmd = parse("x 2> e > o");
        let streams: Vec<Stream> = cmd.redirections().into_iter().map(|(s, _)| s).collect();
        assert_eq!(streams, [Stream::Stdout, Stream::Stderr]);
    }
}
