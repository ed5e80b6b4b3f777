#[cfg(test)]
mod scanner_tests {
    use fein::error::FeinError;
    use fein::scanner::*;
    use fein::token::*;
    use pretty_assertions::assert_eq;

    fn assert_token_sequence(source: &str, expected: &[(TokenType, &str)]) {
        let scanner = Scanner::new(source);
        let tokens: Vec<_> = scanner.filter_map(Result::ok).collect();

        assert_eq!(tokens.len(), expected.len());

        for (actual, (expected_type, expected_lexeme)) in tokens.iter().zip(expected.iter()) {
            assert_eq!(actual.token_type, *expected_type);
            assert_eq!(actual.lexeme, *expected_lexeme);
        }
    }

    fn display_lines(source: &str) -> Vec<String> {
        Scanner::new(source)
            .filter_map(Result::ok)
            .map(|t| t.to_string())
            .collect()
    }

    #[test]
    fn test_scanner_01_symbols() {
        assert_token_sequence(
            "({*.,+*})",
            &[
                (TokenType::LEFT_PAREN, "("),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::STAR, "*"),
                (TokenType::DOT, "."),
                (TokenType::COMMA, ","),
                (TokenType::PLUS, "+"),
                (TokenType::STAR, "*"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_02_two_char_operators() {
        assert_token_sequence(
            "! != = == < <= > >= /",
            &[
                (TokenType::BANG, "!"),
                (TokenType::BANG_EQUAL, "!="),
                (TokenType::EQUAL, "="),
                (TokenType::EQUAL_EQUAL, "=="),
                (TokenType::LESS, "<"),
                (TokenType::LESS_EQUAL, "<="),
                (TokenType::GREATER, ">"),
                (TokenType::GREATER_EQUAL, ">="),
                (TokenType::SLASH, "/"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_03_keywords_and_identifiers() {
        assert_token_sequence(
            "class Foo < Bar { init() { this.x = nil; } } orchid",
            &[
                (TokenType::CLASS, "class"),
                (TokenType::IDENTIFIER, "Foo"),
                (TokenType::LESS, "<"),
                (TokenType::IDENTIFIER, "Bar"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::IDENTIFIER, "init"),
                (TokenType::LEFT_PAREN, "("),
                (TokenType::RIGHT_PAREN, ")"),
                (TokenType::LEFT_BRACE, "{"),
                (TokenType::THIS, "this"),
                (TokenType::DOT, "."),
                (TokenType::IDENTIFIER, "x"),
                (TokenType::EQUAL, "="),
                (TokenType::NIL, "nil"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::RIGHT_BRACE, "}"),
                (TokenType::IDENTIFIER, "orchid"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_04_comments_are_skipped() {
        assert_token_sequence(
            "var a; // trailing comment ( { \nprint a;",
            &[
                (TokenType::VAR, "var"),
                (TokenType::IDENTIFIER, "a"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::PRINT, "print"),
                (TokenType::IDENTIFIER, "a"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_scanner_05_literal_display() {
        assert_eq!(
            display_lines("42 3.25 \"hi there\" x"),
            vec![
                "NUMBER 42 42.0",
                "NUMBER 3.25 3.25",
                "STRING \"hi there\" hi there",
                "IDENTIFIER x null",
                "EOF  null",
            ]
        );
    }

    #[test]
    fn test_scanner_06_line_numbers() {
        let tokens: Vec<Token> = Scanner::new("a\n\"multi\nline\"\nb")
            .filter_map(Result::ok)
            .collect();

        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();

        // the string ends on line 3, the EOF sits on the last line
        assert_eq!(lines, vec![1, 3, 4, 4]);
    }

    #[test]
    fn test_scanner_07_exactly_one_eof() {
        let mut scanner = Scanner::new("");

        let first = scanner.next();
        assert!(matches!(
            first,
            Some(Ok(Token {
                token_type: TokenType::EOF,
                ..
            }))
        ));
        assert!(scanner.next().is_none());
        assert!(scanner.next().is_none());
    }

    #[test]
    fn test_unexpected_chars_token_sequence() {
        let source = ",.$(#";
        let results: Vec<_> = Scanner::new(source).collect();

        // COMMA, DOT, error for '$', LEFT_PAREN, error for '#', EOF
        assert_eq!(results.len(), 6, "Expected 6 items in result");

        assert_token_matches(&results[0], TokenType::COMMA, ",");
        assert_token_matches(&results[1], TokenType::DOT, ".");
        assert_token_matches(&results[3], TokenType::LEFT_PAREN, "(");
        assert_token_matches(&results[5], TokenType::EOF, "");

        let errors: Vec<String> = results
            .iter()
            .filter_map(|r| r.as_ref().err())
            .map(ToString::to_string)
            .collect();

        assert_eq!(
            errors,
            vec![
                "[line 1] Error: Unexpected character: $",
                "[line 1] Error: Unexpected character: #",
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let results: Vec<_> = Scanner::new("print \"oops").collect();

        let error = results
            .iter()
            .find_map(|r| r.as_ref().err())
            .expect("scanner should report the open string");

        assert!(matches!(error, FeinError::Lex { line: 1, .. }));
        assert_eq!(error.to_string(), "[line 1] Error: Unterminated string.");

        // scanning still finishes with EOF
        assert_token_matches(results.last().unwrap(), TokenType::EOF, "");
    }

    #[test]
    fn test_scan_collects_tokens_and_errors_separately() {
        let (tokens, errors) = fein::scan("var @ = 1;");

        assert_eq!(errors.len(), 1);
        assert_eq!(tokens.len(), 5);
        assert_eq!(tokens.last().map(|t| &t.token_type), Some(&TokenType::EOF));
    }

    #[test]
    fn test_block_comment_is_skipped() {
        assert_token_sequence(
            "/* a comment */ print 1;",
            &[
                (TokenType::PRINT, "print"),
                (TokenType::NUMBER(0.0), "1"),
                (TokenType::SEMICOLON, ";"),
                (TokenType::EOF, ""),
            ],
        );

        // slashes and stars inside do not matter, the first `*/` closes it
        assert_token_sequence(
            "a /* x * / // y **/ / b",
            &[
                (TokenType::IDENTIFIER, "a"),
                (TokenType::SLASH, "/"),
                (TokenType::IDENTIFIER, "b"),
                (TokenType::EOF, ""),
            ],
        );
    }

    #[test]
    fn test_multi_line_block_comment_counts_lines() {
        let tokens: Vec<_> = Scanner::new("/* one\ntwo\n*/ x\ny")
            .filter_map(Result::ok)
            .map(|t| (t.lexeme, t.line))
            .collect();

        assert_eq!(tokens, vec![("x", 3), ("y", 4), ("", 4)]);
    }

    #[test]
    fn test_unterminated_block_comment() {
        let results: Vec<_> = Scanner::new("x /* open\n").collect();

        assert_eq!(results.len(), 3);
        assert_token_matches(&results[0], TokenType::IDENTIFIER, "x");

        let error = results[1].as_ref().unwrap_err();
        assert!(matches!(error, FeinError::Lex { line: 2, .. }));
        assert_eq!(
            error.to_string(),
            "[line 2] Error: Unterminated block comment."
        );

        assert_token_matches(&results[2], TokenType::EOF, "");
    }

    fn assert_token_matches(
        result: &Result<Token, FeinError>,
        expected_type: TokenType,
        expected_lexeme: &str,
    ) {
        match result {
            Ok(token) => {
                assert_eq!(
                    token.token_type, expected_type,
                    "Expected token type {:?}, got {:?}",
                    expected_type, token.token_type
                );
                assert_eq!(
                    token.lexeme, expected_lexeme,
                    "Expected lexeme '{}', got '{}'",
                    expected_lexeme, token.lexeme
                );
            }
            Err(e) => panic!("Expected token but got error: {}", e),
        }
    }
}
