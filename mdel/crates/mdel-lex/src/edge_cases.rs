//! Edge case and property tests for mdel-lex.

#[cfg(test)]
mod tests {
    use crate::{tokenize, TokenKind};

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_empty_source() {
        assert!(tokenize("").unwrap().is_empty());
    }

    #[test]
    fn test_edge_whitespace_only() {
        assert!(tokenize(" \t\n ; comment\n/* block */").unwrap().is_empty());
    }

    #[test]
    fn test_edge_single_char_ident() {
        assert_eq!(kinds("x"), vec![TokenKind::Ident("x".into())]);
    }

    #[test]
    fn test_edge_long_identifier() {
        let name = "a".repeat(10000);
        assert_eq!(kinds(&name), vec![TokenKind::Ident(name)]);
    }

    #[test]
    fn test_edge_mixed_stream() {
        // The lexing scenario from the pipeline documentation: comments
        // skipped, raw newline kept in the string, brace block verbatim,
        // hex and negative numbers.
        let source = "(; comment\n \"hi\n\" {braced {nested}} 0x1F -3)";
        assert_eq!(
            kinds(source),
            vec![
                TokenKind::OpenParen,
                TokenKind::Str("hi\n".into()),
                TokenKind::Str("{braced {nested}}".into()),
                TokenKind::Number("0x1F".into()),
                TokenKind::Number("-3".into()),
                TokenKind::CloseParen,
            ]
        );
    }

    #[test]
    fn test_edge_adjacent_delimiters() {
        assert_eq!(
            kinds("(()"),
            vec![
                TokenKind::OpenParen,
                TokenKind::OpenParen,
                TokenKind::CloseParen,
            ]
        );
    }

    #[test]
    fn test_edge_iterator_definition_shape() {
        let source = "(define_mode_iterator GPI [SI (DI \"TARGET_64BIT\")])";
        let tokens = kinds(source);
        assert_eq!(tokens[1], TokenKind::Ident("define_mode_iterator".into()));
        assert_eq!(tokens[3], TokenKind::OpenBracket);
        assert_eq!(tokens[6], TokenKind::Ident("DI".into()));
        assert_eq!(tokens[7], TokenKind::Str("TARGET_64BIT".into()));
    }

    // ==================== PROPERTIES ====================

    mod props {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Lexing never panics, whatever bytes come in.
            #[test]
            fn lexing_never_panics(source in "\\PC*") {
                let _ = tokenize(&source);
            }

            /// Lexing the same input twice gives the same result.
            #[test]
            fn lexing_is_deterministic(source in "\\PC*") {
                prop_assert_eq!(tokenize(&source), tokenize(&source));
            }

            /// Well-formed identifier runs always come back as one token.
            #[test]
            fn ident_runs_stay_whole(name in "[a-z_][a-z0-9_]{0,20}") {
                let tokens = tokenize(&name).unwrap();
                prop_assert_eq!(tokens.len(), 1);
                prop_assert_eq!(&tokens[0].kind, &TokenKind::Ident(name));
            }

            /// Decimal literals always lex as numbers with their spelling.
            #[test]
            fn decimal_literals_lex_as_numbers(value in 0u64..=u64::MAX) {
                let text = value.to_string();
                let tokens = tokenize(&text).unwrap();
                prop_assert_eq!(tokens.len(), 1);
                prop_assert_eq!(&tokens[0].kind, &TokenKind::Number(text));
            }
        }
    }
}
