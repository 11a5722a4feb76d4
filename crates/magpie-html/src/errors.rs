//! Parse error reporting.
//!
//! [§ 13.2.2 Parse errors](https://html.spec.whatwg.org/multipage/parsing.html#parse-errors)
//!
//! "Certain points in the parsing algorithm are said to be parse errors ...
//! user agents, while parsing an HTML document, may abort the parser at the
//! first parse error that they encounter for which they do not wish to apply
//! the rules described in this specification." This parser never aborts:
//! every error is recorded and recovery continues per the spec rules, so the
//! caller always receives a tree plus the list of everything that went wrong.

use thiserror::Error;

/// A recoverable problem found while parsing, with where it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Byte offset into the normalized input stream.
    pub position: usize,
}

impl ParseError {
    /// Create a parse error at the given offset.
    #[must_use]
    pub const fn new(kind: ParseErrorKind, position: usize) -> Self {
        ParseError { kind, position }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at byte {}", self.kind, self.position)
    }
}

/// The error codes of [§ 13.2.2 Parse errors], plus tree-construction errors
/// which the spec leaves unnamed.
///
/// [§ 13.2.2 Parse errors]: https://html.spec.whatwg.org/multipage/parsing.html#parse-errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseErrorKind {
    /// `abrupt-closing-of-empty-comment`
    #[error("abrupt closing of empty comment")]
    AbruptClosingOfEmptyComment,
    /// `abrupt-doctype-public-identifier`
    #[error("abrupt DOCTYPE public identifier")]
    AbruptDoctypePublicIdentifier,
    /// `abrupt-doctype-system-identifier`
    #[error("abrupt DOCTYPE system identifier")]
    AbruptDoctypeSystemIdentifier,
    /// `absence-of-digits-in-numeric-character-reference`
    #[error("absence of digits in numeric character reference")]
    AbsenceOfDigitsInNumericCharacterReference,
    /// `cdata-in-html-content`
    #[error("CDATA section in HTML content")]
    CdataInHtmlContent,
    /// `character-reference-outside-unicode-range`
    #[error("character reference outside Unicode range")]
    CharacterReferenceOutsideUnicodeRange,
    /// `control-character-reference`
    #[error("control character reference")]
    ControlCharacterReference,
    /// `duplicate-attribute`
    #[error("duplicate attribute")]
    DuplicateAttribute,
    /// `end-tag-with-attributes`
    #[error("end tag with attributes")]
    EndTagWithAttributes,
    /// `end-tag-with-trailing-solidus`
    #[error("end tag with trailing solidus")]
    EndTagWithTrailingSolidus,
    /// `eof-before-tag-name`
    #[error("end of file before tag name")]
    EofBeforeTagName,
    /// `eof-in-comment`
    #[error("end of file in comment")]
    EofInComment,
    /// `eof-in-doctype`
    #[error("end of file in DOCTYPE")]
    EofInDoctype,
    /// `eof-in-script-html-comment-like-text`
    #[error("end of file in script HTML comment-like text")]
    EofInScriptHtmlCommentLikeText,
    /// `eof-in-tag`
    #[error("end of file in tag")]
    EofInTag,
    /// `incorrectly-closed-comment`
    #[error("incorrectly closed comment")]
    IncorrectlyClosedComment,
    /// `incorrectly-opened-comment`
    #[error("incorrectly opened comment")]
    IncorrectlyOpenedComment,
    /// `invalid-character-sequence-after-doctype-name`
    #[error("invalid character sequence after DOCTYPE name")]
    InvalidCharacterSequenceAfterDoctypeName,
    /// `invalid-first-character-of-tag-name`
    #[error("invalid first character of tag name")]
    InvalidFirstCharacterOfTagName,
    /// `missing-attribute-value`
    #[error("missing attribute value")]
    MissingAttributeValue,
    /// `missing-doctype-name`
    #[error("missing DOCTYPE name")]
    MissingDoctypeName,
    /// `missing-doctype-public-identifier`
    #[error("missing DOCTYPE public identifier")]
    MissingDoctypePublicIdentifier,
    /// `missing-doctype-system-identifier`
    #[error("missing DOCTYPE system identifier")]
    MissingDoctypeSystemIdentifier,
    /// `missing-end-tag-name`
    #[error("missing end tag name")]
    MissingEndTagName,
    /// `missing-quote-before-doctype-public-identifier`
    #[error("missing quote before DOCTYPE public identifier")]
    MissingQuoteBeforeDoctypePublicIdentifier,
    /// `missing-quote-before-doctype-system-identifier`
    #[error("missing quote before DOCTYPE system identifier")]
    MissingQuoteBeforeDoctypeSystemIdentifier,
    /// `missing-semicolon-after-character-reference`
    #[error("missing semicolon after character reference")]
    MissingSemicolonAfterCharacterReference,
    /// `missing-whitespace-after-doctype-public-keyword`
    #[error("missing whitespace after DOCTYPE public keyword")]
    MissingWhitespaceAfterDoctypePublicKeyword,
    /// `missing-whitespace-after-doctype-system-keyword`
    #[error("missing whitespace after DOCTYPE system keyword")]
    MissingWhitespaceAfterDoctypeSystemKeyword,
    /// `missing-whitespace-before-doctype-name`
    #[error("missing whitespace before DOCTYPE name")]
    MissingWhitespaceBeforeDoctypeName,
    /// `missing-whitespace-between-attributes`
    #[error("missing whitespace between attributes")]
    MissingWhitespaceBetweenAttributes,
    /// `missing-whitespace-between-doctype-public-and-system-identifiers`
    #[error("missing whitespace between DOCTYPE public and system identifiers")]
    MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
    /// `nested-comment`
    #[error("nested comment")]
    NestedComment,
    /// `noncharacter-character-reference`
    #[error("noncharacter character reference")]
    NoncharacterCharacterReference,
    /// `null-character-reference`
    #[error("null character reference")]
    NullCharacterReference,
    /// `surrogate-character-reference`
    #[error("surrogate character reference")]
    SurrogateCharacterReference,
    /// `unexpected-character-after-doctype-system-identifier`
    #[error("unexpected character after DOCTYPE system identifier")]
    UnexpectedCharacterAfterDoctypeSystemIdentifier,
    /// `unexpected-character-in-attribute-name`
    #[error("unexpected character in attribute name")]
    UnexpectedCharacterInAttributeName,
    /// `unexpected-character-in-unquoted-attribute-value`
    #[error("unexpected character in unquoted attribute value")]
    UnexpectedCharacterInUnquotedAttributeValue,
    /// `unexpected-equals-sign-before-attribute-name`
    #[error("unexpected equals sign before attribute name")]
    UnexpectedEqualsSignBeforeAttributeName,
    /// `unexpected-null-character`
    #[error("unexpected null character")]
    UnexpectedNullCharacter,
    /// `unexpected-question-mark-instead-of-tag-name`
    #[error("unexpected question mark instead of tag name")]
    UnexpectedQuestionMarkInsteadOfTagName,
    /// `unexpected-solidus-in-tag`
    #[error("unexpected solidus in tag")]
    UnexpectedSolidusInTag,
    /// `unknown-named-character-reference`
    #[error("unknown named character reference")]
    UnknownNamedCharacterReference,

    /// A DOCTYPE token arrived where none is allowed.
    #[error("unexpected DOCTYPE")]
    UnexpectedDoctype,
    /// A start tag arrived that the current insertion mode cannot accept.
    #[error("unexpected start tag <{0}>")]
    UnexpectedStartTag(String),
    /// An end tag arrived with no matching open element in scope.
    #[error("unexpected end tag </{0}>")]
    UnexpectedEndTag(String),
    /// An end tag closed an element that was not the current node.
    #[error("misnested end tag </{0}>")]
    MisnestedEndTag(String),
    /// Character data arrived where none is allowed.
    #[error("unexpected character data")]
    UnexpectedCharacters,
    /// The input ended with elements still open.
    #[error("unexpected end of file")]
    UnexpectedEof,
    /// The document had no DOCTYPE.
    #[error("missing DOCTYPE")]
    MissingDoctype,
}
