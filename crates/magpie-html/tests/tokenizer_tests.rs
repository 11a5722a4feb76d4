//! Integration tests for the HTML tokenizer.

use magpie_html::errors::ParseErrorKind;
use magpie_html::tokenizer::{State, Token, Tokenizer};

/// Helper to tokenize a complete input and return the tokens.
fn tokenize(input: &str) -> Vec<Token> {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed(input);
    tokenizer.finish();
    drain(&mut tokenizer)
}

/// Helper to pull every available token, stopping at EndOfFile.
fn drain(tokenizer: &mut Tokenizer) -> Vec<Token> {
    let mut tokens = Vec::new();
    while let Some(token) = tokenizer.next_token() {
        let eof = matches!(token, Token::EndOfFile);
        tokens.push(token);
        if eof {
            break;
        }
    }
    tokens
}

/// Helper to join the character tokens of a run into a string.
fn text_of(tokens: &[Token]) -> String {
    tokens
        .iter()
        .filter_map(|t| match t {
            Token::Character(c) => Some(*c),
            _ => None,
        })
        .collect()
}

#[test]
fn test_plain_text() {
    let tokens = tokenize("Hello");
    assert_eq!(tokens.len(), 6); // 5 chars + EOF
    assert!(matches!(tokens[0], Token::Character('H')));
    assert!(matches!(tokens[4], Token::Character('o')));
    assert!(matches!(tokens[5], Token::EndOfFile));
}

#[test]
fn test_doctype() {
    let tokens = tokenize("<!DOCTYPE html>");
    match &tokens[0] {
        Token::Doctype {
            name, force_quirks, ..
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert!(!force_quirks);
        }
        other => panic!("expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_doctype_public_and_system_identifiers() {
    let tokens = tokenize(
        r#"<!DOCTYPE html PUBLIC "-//W3C//DTD HTML 4.01//EN" "http://www.w3.org/TR/html4/strict.dtd">"#,
    );
    match &tokens[0] {
        Token::Doctype {
            name,
            public_id,
            system_id,
            force_quirks,
        } => {
            assert_eq!(name.as_deref(), Some("html"));
            assert_eq!(public_id.as_deref(), Some("-//W3C//DTD HTML 4.01//EN"));
            assert_eq!(
                system_id.as_deref(),
                Some("http://www.w3.org/TR/html4/strict.dtd")
            );
            assert!(!force_quirks);
        }
        other => panic!("expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_doctype_case_insensitive_keyword() {
    let tokens = tokenize("<!doctype HTML>");
    match &tokens[0] {
        Token::Doctype { name, .. } => assert_eq!(name.as_deref(), Some("html")),
        other => panic!("expected DOCTYPE token, got {other:?}"),
    }
}

#[test]
fn test_start_tag_with_attributes() {
    let tokens = tokenize(r#"<div id="main" class='box' hidden>"#);
    match &tokens[0] {
        Token::StartTag {
            name,
            self_closing,
            attributes,
        } => {
            assert_eq!(name, "div");
            assert!(!self_closing);
            assert_eq!(attributes.len(), 3);
            assert_eq!(attributes[0].name, "id");
            assert_eq!(attributes[0].value, "main");
            assert_eq!(attributes[1].name, "class");
            assert_eq!(attributes[1].value, "box");
            assert_eq!(attributes[2].name, "hidden");
            assert_eq!(attributes[2].value, "");
        }
        other => panic!("expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_unquoted_attribute_value() {
    let tokens = tokenize("<input type=text>");
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes[0].name, "type");
            assert_eq!(attributes[0].value, "text");
        }
        other => panic!("expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_duplicate_attribute_first_wins() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed(r#"<div id="a" ID="b">"#);
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes.len(), 1);
            assert_eq!(attributes[0].name, "id");
            assert_eq!(attributes[0].value, "a");
        }
        other => panic!("expected StartTag token, got {other:?}"),
    }
    let errors = tokenizer.take_errors();
    assert!(
        errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::DuplicateAttribute)
    );
}

#[test]
fn test_tag_names_are_lowercased() {
    let tokens = tokenize("<DIV CLASS=X></DIV>");
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "div"));
    assert!(matches!(&tokens[1], Token::EndTag { name, .. } if name == "div"));
}

#[test]
fn test_self_closing_flag() {
    let tokens = tokenize("<br/>");
    assert!(matches!(
        &tokens[0],
        Token::StartTag {
            name, self_closing: true, ..
        } if name == "br"
    ));
}

#[test]
fn test_comment() {
    let tokens = tokenize("<!-- hello -->");
    assert!(matches!(&tokens[0], Token::Comment(data) if data == " hello "));
}

#[test]
fn test_empty_comment() {
    let tokens = tokenize("<!---->");
    assert!(matches!(&tokens[0], Token::Comment(data) if data.is_empty()));
}

#[test]
fn test_processing_instruction_becomes_bogus_comment() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("<?xml version=\"1.0\"?>");
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    assert!(matches!(&tokens[0], Token::Comment(data) if data.starts_with("?xml")));
    let errors = tokenizer.take_errors();
    assert!(
        errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnexpectedQuestionMarkInsteadOfTagName)
    );
}

#[test]
fn test_cdata_in_html_is_a_bogus_comment() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("<![CDATA[x]]>");
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    assert!(matches!(&tokens[0], Token::Comment(data) if data.starts_with("[CDATA[")));
    let errors = tokenizer.take_errors();
    assert!(
        errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::CdataInHtmlContent)
    );
}

// ========== character references ==========

#[test]
fn test_named_character_reference() {
    let tokens = tokenize("a &amp; b");
    assert_eq!(text_of(&tokens), "a & b");
}

#[test]
fn test_numeric_character_references() {
    let tokens = tokenize("&#65;&#x42;&#x63;");
    assert_eq!(text_of(&tokens), "ABc");
}

#[test]
fn test_character_reference_in_attribute_value() {
    let tokens = tokenize(r#"<a href="?x=1&amp;y=2">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes[0].value, "?x=1&y=2");
        }
        other => panic!("expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_legacy_reference_without_semicolon_in_attribute() {
    // The historical exception: "&amp" followed by an alphanumeric or "="
    // inside an attribute value stays literal.
    let tokens = tokenize(r#"<a href="?a&ampx">"#);
    match &tokens[0] {
        Token::StartTag { attributes, .. } => {
            assert_eq!(attributes[0].value, "?a&ampx");
        }
        other => panic!("expected StartTag token, got {other:?}"),
    }
}

#[test]
fn test_unknown_named_reference_stays_literal() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("x &qqq; y");
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    assert_eq!(text_of(&tokens), "x &qqq; y");
    let errors = tokenizer.take_errors();
    assert!(
        errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::UnknownNamedCharacterReference)
    );
}

#[test]
fn test_null_character_reference_is_replaced() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("&#0;");
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    assert_eq!(text_of(&tokens), "\u{fffd}");
    let errors = tokenizer.take_errors();
    assert!(
        errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::NullCharacterReference)
    );
}

// ========== error recovery ==========

#[test]
fn test_eof_in_tag_drops_the_tag() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("<div");
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    assert_eq!(tokens.len(), 1);
    assert!(matches!(tokens[0], Token::EndOfFile));
    let errors = tokenizer.take_errors();
    assert!(errors.iter().any(|e| e.kind == ParseErrorKind::EofInTag));
}

#[test]
fn test_lone_less_than_is_text() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("1 < 2");
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    assert_eq!(text_of(&tokens), "1 < 2");
    let errors = tokenizer.take_errors();
    assert!(
        errors
            .iter()
            .any(|e| e.kind == ParseErrorKind::InvalidFirstCharacterOfTagName)
    );
}

#[test]
fn test_errors_carry_byte_positions() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("ab\0cd");
    tokenizer.finish();
    let _ = drain(&mut tokenizer);
    let errors = tokenizer.take_errors();
    let error = errors
        .iter()
        .find(|e| e.kind == ParseErrorKind::UnexpectedNullCharacter)
        .expect("null character error");
    assert_eq!(error.position, 2);
}

// ========== raw text states ==========

#[test]
fn test_script_data_swallows_markup() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("<script>if (a < b) { x(); }</script>after");
    let first = tokenizer.next_token().expect("script start tag");
    assert!(matches!(&first, Token::StartTag { name, .. } if name == "script"));
    // The tree builder switches the tokenizer after seeing the start tag.
    tokenizer.set_state(State::ScriptData);
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    let text = text_of(&tokens);
    assert!(text.starts_with("if (a < b) { x(); }"));
    assert!(matches!(
        tokens.iter().find(|t| t.is_end_tag()),
        Some(Token::EndTag { name, .. }) if name == "script"
    ));
}

#[test]
fn test_rcdata_decodes_references_but_not_tags() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("<title>a &amp; <b></title>");
    let first = tokenizer.next_token().expect("title start tag");
    assert!(matches!(&first, Token::StartTag { name, .. } if name == "title"));
    tokenizer.set_state(State::RcData);
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    assert_eq!(text_of(&tokens), "a & <b>");
}

// ========== streaming ==========

#[test]
fn test_suspends_mid_tag_until_more_input() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("<di");
    assert!(tokenizer.next_token().is_none());
    tokenizer.feed("v>");
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    assert!(matches!(&tokens[0], Token::StartTag { name, .. } if name == "div"));
}

#[test]
fn test_suspends_mid_character_reference() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("x&am");
    // "x" is available; the reference is not decided yet.
    assert!(matches!(
        tokenizer.next_token(),
        Some(Token::Character('x'))
    ));
    assert!(tokenizer.next_token().is_none());
    tokenizer.feed("p;y");
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    assert_eq!(text_of(&tokens), "&y");
}

#[test]
fn test_crlf_normalization_across_chunks() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("a\r");
    tokenizer.feed("\nb\rc");
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    assert_eq!(text_of(&tokens), "a\nb\nc");
}

#[test]
fn test_trailing_cr_at_eof() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed("a\r");
    tokenizer.finish();
    let tokens = drain(&mut tokenizer);
    assert_eq!(text_of(&tokens), "a\n");
}
