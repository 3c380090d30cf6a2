//! Zephir grammar
//!
//! The rule table the Zephir lexer runs on. Order matters within each state: rules are
//! tried in declaration order, so reserved words come before the generic name rule and
//! floats before integers.
//!
//! States:
//!
//!     root                   Top-level code.
//!     commentsandwhitespace  Shared by root and slashstartsregex.
//!     slashstartsregex       Entered after anything a regex literal may follow (operators,
//!                            opening punctuation, control keywords). Scans past whitespace
//!                            and comments, takes a `/.../flags` literal if one is there,
//!                            and otherwise pops back to root without consuming input.
//!     badregex               Resumes at the next newline.
//!
//! Every rule matches with dot-matches-newline.

use crate::zephir::lexing::{include, rule, Flags, RuleDef, StateTable};
use crate::zephir::token::TokenKind;
use once_cell::sync::Lazy;

const DOTALL: Flags = Flags::DOTALL;

const COMMENTS_AND_WHITESPACE: &[RuleDef] = &[
    // whitespace includes the information separators U+001C..U+001F
    rule(r"[\s\x1c-\x1f]+", TokenKind::Text).flags(DOTALL),
    rule(r"//.*?\n", TokenKind::CommentSingle).flags(DOTALL),
    rule(r"/\*.*?\*/", TokenKind::CommentMultiline).flags(DOTALL),
];

const SLASH_STARTS_REGEX: &[RuleDef] = &[
    include("commentsandwhitespace"),
    rule(
        r"/(\\.|[^\[/\\\n]|\[(\\.|[^\]\\\n])*\])+/([gim]+\b|\B)",
        TokenKind::StringRegex,
    )
    .flags(DOTALL)
    .pop(),
    rule(r"", TokenKind::Text).flags(DOTALL).pop(),
];

const BAD_REGEX: &[RuleDef] = &[rule(r"\n", TokenKind::Text).flags(DOTALL).pop()];

const ROOT: &[RuleDef] = &[
    rule(r"", TokenKind::Text)
        .flags(DOTALL)
        .at_start()
        .lookahead(r"[\s\x1c-\x1f]|/|<!--")
        .push("slashstartsregex"),
    include("commentsandwhitespace"),
    rule(
        r"\+\+|--|~|&&|\?|:|\|\||(<<|>>>?|==?|!=?|->|[-<>+*%\&\|\^/])=?",
        TokenKind::Operator,
    )
    .flags(DOTALL)
    .push("slashstartsregex"),
    // line continuation
    rule(r"\\", TokenKind::Operator)
        .flags(DOTALL)
        .lookahead(r"\n")
        .push("slashstartsregex"),
    rule(r"[{(\[;,]", TokenKind::Punctuation)
        .flags(DOTALL)
        .push("slashstartsregex"),
    rule(r"[})\].]", TokenKind::Punctuation).flags(DOTALL),
    rule(
        concat!(
            r"(for|in|while|do|break|return|continue|switch|case|default|if|else|loop|",
            r"require|inline|throw|try|catch|finally|new|delete|typeof|instanceof|void|",
            r"namespace|use|extends|this|fetch|isset|unset|echo|likely|unlikely|empty)\b",
        ),
        TokenKind::Keyword,
    )
    .flags(DOTALL)
    .push("slashstartsregex"),
    rule(r"(var|let|with|function)\b", TokenKind::KeywordDeclaration)
        .flags(DOTALL)
        .push("slashstartsregex"),
    rule(
        concat!(
            r"(abstract|boolean|bool|char|class|const|double|enum|export|extends|final|",
            r"float|goto|implements|import|int|string|interface|long|ulong|uchar|native|",
            r"unsigned|private|protected|public|short|static|self|throws|reverse|",
            r"transient|volatile)\b",
        ),
        TokenKind::KeywordReserved,
    )
    .flags(DOTALL),
    rule(r"(true|false|null|undefined)\b", TokenKind::KeywordConstant).flags(DOTALL),
    rule(
        concat!(
            r"(Array|Boolean|Date|_REQUEST|_COOKIE|_SESSION|_GET|_POST|_SERVER|this|",
            r"stdClass|range|count|iterator|window)\b",
        ),
        TokenKind::NameBuiltin,
    )
    .flags(DOTALL),
    rule(r"[$a-zA-Z_][a-zA-Z0-9_\\]*", TokenKind::NameOther).flags(DOTALL),
    rule(r"[0-9][0-9]*\.[0-9]+([eE][0-9]+)?[fd]?", TokenKind::NumberFloat).flags(DOTALL),
    rule(r"0x[0-9a-fA-F]+", TokenKind::NumberHex).flags(DOTALL),
    rule(r"[0-9]+", TokenKind::NumberInteger).flags(DOTALL),
    rule(r#""(\\\\|\\"|[^"])*""#, TokenKind::StringDouble).flags(DOTALL),
    rule(r"'(\\\\|\\'|[^'])*'", TokenKind::StringSingle).flags(DOTALL),
];

/// The Zephir states, in definition order.
pub const STATES: &[(&str, &[RuleDef])] = &[
    ("commentsandwhitespace", COMMENTS_AND_WHITESPACE),
    ("slashstartsregex", SLASH_STARTS_REGEX),
    ("badregex", BAD_REGEX),
    ("root", ROOT),
];

/// The compiled Zephir table, built on first use.
pub static ZEPHIR: Lazy<StateTable> =
    Lazy::new(|| StateTable::build(STATES).expect("the Zephir grammar compiles"));

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zephir::lexing::Tokenizer;

    fn lex(source: &str) -> Vec<(TokenKind, String)> {
        Tokenizer::new(&ZEPHIR)
            .tokenize(source)
            .map(|t| (t.kind, t.text))
            .collect()
    }

    fn significant(source: &str) -> Vec<(TokenKind, String)> {
        lex(source)
            .into_iter()
            .filter(|(kind, _)| *kind != TokenKind::Text)
            .collect()
    }

    fn tok(kind: TokenKind, text: &str) -> (TokenKind, String) {
        (kind, text.to_string())
    }

    #[test]
    fn test_grammar_compiles() {
        let table = StateTable::build(STATES).unwrap();
        assert_eq!(table.len(), 4);
        let root = table.state_id("root").unwrap();
        assert_eq!(table.root(), root);
        // slashstartsregex: three inlined rules, the regex literal, the empty pop
        let ssr = table.state_id("slashstartsregex").unwrap();
        assert_eq!(table.rules(ssr).len(), 5);
    }

    #[test]
    fn test_if_statement() {
        use TokenKind::*;
        assert_eq!(
            lex("if (x) { return 1; }"),
            vec![
                tok(Keyword, "if"),
                tok(Text, " "),
                tok(Punctuation, "("),
                tok(NameOther, "x"),
                tok(Punctuation, ")"),
                tok(Text, " "),
                tok(Punctuation, "{"),
                tok(Text, " "),
                tok(Keyword, "return"),
                tok(Text, " "),
                tok(NumberInteger, "1"),
                tok(Punctuation, ";"),
                tok(Text, " "),
                tok(Punctuation, "}"),
            ]
        );
    }

    #[test]
    fn test_line_comment_at_start() {
        assert_eq!(
            lex("// comment\n"),
            vec![tok(TokenKind::CommentSingle, "// comment\n")]
        );
    }

    #[test]
    fn test_block_comment_spans_lines() {
        assert_eq!(
            significant("a /* one\ntwo */ b"),
            vec![
                tok(TokenKind::NameOther, "a"),
                tok(TokenKind::CommentMultiline, "/* one\ntwo */"),
                tok(TokenKind::NameOther, "b"),
            ]
        );
    }

    #[test]
    fn test_keyword_prefix_is_identifier() {
        assert_eq!(lex("iffy"), vec![tok(TokenKind::NameOther, "iffy")]);
        assert_eq!(lex("inline"), vec![tok(TokenKind::Keyword, "inline")]);
    }

    #[test]
    fn test_regex_literal_after_operator() {
        assert_eq!(
            significant("x = /ab+c/g;"),
            vec![
                tok(TokenKind::NameOther, "x"),
                tok(TokenKind::Operator, "="),
                tok(TokenKind::StringRegex, "/ab+c/g"),
                tok(TokenKind::Punctuation, ";"),
            ]
        );
    }

    #[test]
    fn test_division_after_identifier() {
        assert_eq!(
            significant("a / b"),
            vec![
                tok(TokenKind::NameOther, "a"),
                tok(TokenKind::Operator, "/"),
                tok(TokenKind::NameOther, "b"),
            ]
        );
    }

    #[test]
    fn test_leading_whitespace_is_one_token() {
        assert_eq!(lex(" \t\n "), vec![tok(TokenKind::Text, " \t\n ")]);
    }

    #[test]
    fn test_information_separators_are_whitespace() {
        assert_eq!(
            lex("a\x1f\x1cb"),
            vec![
                tok(TokenKind::NameOther, "a"),
                tok(TokenKind::Text, "\x1f\x1c"),
                tok(TokenKind::NameOther, "b"),
            ]
        );
        assert_eq!(
            lex("\x1d/a/"),
            vec![tok(TokenKind::Text, "\x1d"), tok(TokenKind::StringRegex, "/a/")]
        );
    }

    #[test]
    fn test_line_continuation() {
        assert_eq!(
            lex("1 \\\nb"),
            vec![
                tok(TokenKind::NumberInteger, "1"),
                tok(TokenKind::Text, " "),
                tok(TokenKind::Operator, "\\"),
                tok(TokenKind::Text, "\n"),
                tok(TokenKind::NameOther, "b"),
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        assert_eq!(
            lex("\"abc"),
            vec![tok(TokenKind::Error, "\""), tok(TokenKind::NameOther, "abc")]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            significant("1.5e3f 0xFF 42"),
            vec![
                tok(TokenKind::NumberFloat, "1.5e3f"),
                tok(TokenKind::NumberHex, "0xFF"),
                tok(TokenKind::NumberInteger, "42"),
            ]
        );
    }
}
