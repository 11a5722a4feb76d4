//! The tokenizer state machine.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! "Implementations must act as if they used the following state machine to
//! tokenize HTML. The state machine must start in the data state."
//!
//! The machine is pull-based: [`Tokenizer::next_token`] runs state handlers
//! until a token is available. Input arrives in chunks through
//! [`Tokenizer::feed`]; when the buffer runs dry before [`Tokenizer::finish`]
//! has been called, `next_token` returns `None` instead of fabricating an
//! end-of-file, so a chunked parse produces exactly the tokens of a one-shot
//! parse.

use std::collections::VecDeque;

use strum_macros::Display;

use crate::errors::{ParseError, ParseErrorKind};
use crate::tokenizer::entities::{self, MAX_ENTITY_LEN};
use crate::tokenizer::token::Token;

/// [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
///
/// The tokenizer states. CDATA section states are omitted: without foreign
/// content `<![CDATA[` is handled as a bogus comment, per the rules for the
/// markup declaration open state in HTML content.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// [§ 13.2.5.1 Data state](https://html.spec.whatwg.org/multipage/parsing.html#data-state)
    Data,
    /// [§ 13.2.5.2 RCDATA state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-state)
    RcData,
    /// [§ 13.2.5.3 RAWTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-state)
    RawText,
    /// [§ 13.2.5.4 Script data state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-state)
    ScriptData,
    /// [§ 13.2.5.5 PLAINTEXT state](https://html.spec.whatwg.org/multipage/parsing.html#plaintext-state)
    Plaintext,
    /// [§ 13.2.5.6 Tag open state](https://html.spec.whatwg.org/multipage/parsing.html#tag-open-state)
    TagOpen,
    /// [§ 13.2.5.7 End tag open state](https://html.spec.whatwg.org/multipage/parsing.html#end-tag-open-state)
    EndTagOpen,
    /// [§ 13.2.5.8 Tag name state](https://html.spec.whatwg.org/multipage/parsing.html#tag-name-state)
    TagName,
    /// [§ 13.2.5.9 RCDATA less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-less-than-sign-state)
    RcDataLessThanSign,
    /// [§ 13.2.5.10 RCDATA end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-open-state)
    RcDataEndTagOpen,
    /// [§ 13.2.5.11 RCDATA end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rcdata-end-tag-name-state)
    RcDataEndTagName,
    /// [§ 13.2.5.12 RAWTEXT less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-less-than-sign-state)
    RawTextLessThanSign,
    /// [§ 13.2.5.13 RAWTEXT end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-open-state)
    RawTextEndTagOpen,
    /// [§ 13.2.5.14 RAWTEXT end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#rawtext-end-tag-name-state)
    RawTextEndTagName,
    /// [§ 13.2.5.15 Script data less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-less-than-sign-state)
    ScriptDataLessThanSign,
    /// [§ 13.2.5.16 Script data end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-open-state)
    ScriptDataEndTagOpen,
    /// [§ 13.2.5.17 Script data end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-end-tag-name-state)
    ScriptDataEndTagName,
    /// [§ 13.2.5.18 Script data escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-state)
    ScriptDataEscapeStart,
    /// [§ 13.2.5.19 Script data escape start dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escape-start-dash-state)
    ScriptDataEscapeStartDash,
    /// [§ 13.2.5.20 Script data escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-state)
    ScriptDataEscaped,
    /// [§ 13.2.5.21 Script data escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-state)
    ScriptDataEscapedDash,
    /// [§ 13.2.5.22 Script data escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-dash-dash-state)
    ScriptDataEscapedDashDash,
    /// [§ 13.2.5.23 Script data escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-less-than-sign-state)
    ScriptDataEscapedLessThanSign,
    /// [§ 13.2.5.24 Script data escaped end tag open state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-open-state)
    ScriptDataEscapedEndTagOpen,
    /// [§ 13.2.5.25 Script data escaped end tag name state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-escaped-end-tag-name-state)
    ScriptDataEscapedEndTagName,
    /// [§ 13.2.5.26 Script data double escape start state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-start-state)
    ScriptDataDoubleEscapeStart,
    /// [§ 13.2.5.27 Script data double escaped state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-state)
    ScriptDataDoubleEscaped,
    /// [§ 13.2.5.28 Script data double escaped dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-state)
    ScriptDataDoubleEscapedDash,
    /// [§ 13.2.5.29 Script data double escaped dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-dash-dash-state)
    ScriptDataDoubleEscapedDashDash,
    /// [§ 13.2.5.30 Script data double escaped less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escaped-less-than-sign-state)
    ScriptDataDoubleEscapedLessThanSign,
    /// [§ 13.2.5.31 Script data double escape end state](https://html.spec.whatwg.org/multipage/parsing.html#script-data-double-escape-end-state)
    ScriptDataDoubleEscapeEnd,
    /// [§ 13.2.5.32 Before attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-name-state)
    BeforeAttributeName,
    /// [§ 13.2.5.33 Attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-name-state)
    AttributeName,
    /// [§ 13.2.5.34 After attribute name state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-name-state)
    AfterAttributeName,
    /// [§ 13.2.5.35 Before attribute value state](https://html.spec.whatwg.org/multipage/parsing.html#before-attribute-value-state)
    BeforeAttributeValue,
    /// [§ 13.2.5.36 Attribute value (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(double-quoted)-state)
    AttributeValueDoubleQuoted,
    /// [§ 13.2.5.37 Attribute value (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(single-quoted)-state)
    AttributeValueSingleQuoted,
    /// [§ 13.2.5.38 Attribute value (unquoted) state](https://html.spec.whatwg.org/multipage/parsing.html#attribute-value-(unquoted)-state)
    AttributeValueUnquoted,
    /// [§ 13.2.5.39 After attribute value (quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#after-attribute-value-(quoted)-state)
    AfterAttributeValueQuoted,
    /// [§ 13.2.5.40 Self-closing start tag state](https://html.spec.whatwg.org/multipage/parsing.html#self-closing-start-tag-state)
    SelfClosingStartTag,
    /// [§ 13.2.5.41 Bogus comment state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-comment-state)
    BogusComment,
    /// [§ 13.2.5.42 Markup declaration open state](https://html.spec.whatwg.org/multipage/parsing.html#markup-declaration-open-state)
    MarkupDeclarationOpen,
    /// [§ 13.2.5.43 Comment start state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-state)
    CommentStart,
    /// [§ 13.2.5.44 Comment start dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-start-dash-state)
    CommentStartDash,
    /// [§ 13.2.5.45 Comment state](https://html.spec.whatwg.org/multipage/parsing.html#comment-state)
    Comment,
    /// [§ 13.2.5.46 Comment less-than sign state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-state)
    CommentLessThanSign,
    /// [§ 13.2.5.47 Comment less-than sign bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-state)
    CommentLessThanSignBang,
    /// [§ 13.2.5.48 Comment less-than sign bang dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-state)
    CommentLessThanSignBangDash,
    /// [§ 13.2.5.49 Comment less-than sign bang dash dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-less-than-sign-bang-dash-dash-state)
    CommentLessThanSignBangDashDash,
    /// [§ 13.2.5.50 Comment end dash state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-dash-state)
    CommentEndDash,
    /// [§ 13.2.5.51 Comment end state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-state)
    CommentEnd,
    /// [§ 13.2.5.52 Comment end bang state](https://html.spec.whatwg.org/multipage/parsing.html#comment-end-bang-state)
    CommentEndBang,
    /// [§ 13.2.5.53 DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-state)
    Doctype,
    /// [§ 13.2.5.54 Before DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-name-state)
    BeforeDoctypeName,
    /// [§ 13.2.5.55 DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-name-state)
    DoctypeName,
    /// [§ 13.2.5.56 After DOCTYPE name state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-name-state)
    AfterDoctypeName,
    /// [§ 13.2.5.57 After DOCTYPE public keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-keyword-state)
    AfterDoctypePublicKeyword,
    /// [§ 13.2.5.58 Before DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-public-identifier-state)
    BeforeDoctypePublicIdentifier,
    /// [§ 13.2.5.59 DOCTYPE public identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(double-quoted)-state)
    DoctypePublicIdentifierDoubleQuoted,
    /// [§ 13.2.5.60 DOCTYPE public identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-public-identifier-(single-quoted)-state)
    DoctypePublicIdentifierSingleQuoted,
    /// [§ 13.2.5.61 After DOCTYPE public identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-public-identifier-state)
    AfterDoctypePublicIdentifier,
    /// [§ 13.2.5.62 Between DOCTYPE public and system identifiers state](https://html.spec.whatwg.org/multipage/parsing.html#between-doctype-public-and-system-identifiers-state)
    BetweenDoctypePublicAndSystemIdentifiers,
    /// [§ 13.2.5.63 After DOCTYPE system keyword state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-keyword-state)
    AfterDoctypeSystemKeyword,
    /// [§ 13.2.5.64 Before DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#before-doctype-system-identifier-state)
    BeforeDoctypeSystemIdentifier,
    /// [§ 13.2.5.65 DOCTYPE system identifier (double-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(double-quoted)-state)
    DoctypeSystemIdentifierDoubleQuoted,
    /// [§ 13.2.5.66 DOCTYPE system identifier (single-quoted) state](https://html.spec.whatwg.org/multipage/parsing.html#doctype-system-identifier-(single-quoted)-state)
    DoctypeSystemIdentifierSingleQuoted,
    /// [§ 13.2.5.67 After DOCTYPE system identifier state](https://html.spec.whatwg.org/multipage/parsing.html#after-doctype-system-identifier-state)
    AfterDoctypeSystemIdentifier,
    /// [§ 13.2.5.68 Bogus DOCTYPE state](https://html.spec.whatwg.org/multipage/parsing.html#bogus-doctype-state)
    BogusDoctype,
    /// [§ 13.2.5.72 Character reference state](https://html.spec.whatwg.org/multipage/parsing.html#character-reference-state)
    CharacterReference,
    /// [§ 13.2.5.73 Named character reference state](https://html.spec.whatwg.org/multipage/parsing.html#named-character-reference-state)
    NamedCharacterReference,
    /// [§ 13.2.5.74 Ambiguous ampersand state](https://html.spec.whatwg.org/multipage/parsing.html#ambiguous-ampersand-state)
    AmbiguousAmpersand,
    /// [§ 13.2.5.75 Numeric character reference state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-state)
    NumericCharacterReference,
    /// [§ 13.2.5.76 Hexadecimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-start-state)
    HexadecimalCharacterReferenceStart,
    /// [§ 13.2.5.77 Decimal character reference start state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-start-state)
    DecimalCharacterReferenceStart,
    /// [§ 13.2.5.78 Hexadecimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#hexadecimal-character-reference-state)
    HexadecimalCharacterReference,
    /// [§ 13.2.5.79 Decimal character reference state](https://html.spec.whatwg.org/multipage/parsing.html#decimal-character-reference-state)
    DecimalCharacterReference,
    /// [§ 13.2.5.80 Numeric character reference end state](https://html.spec.whatwg.org/multipage/parsing.html#numeric-character-reference-end-state)
    NumericCharacterReferenceEnd,
}

/// Sentinel for a character reference code that overflowed Unicode.
const CHAR_REF_OVERFLOW: u32 = 0x0011_0000;

/// What a single state-machine step produced.
enum Step {
    /// Keep stepping.
    Continue,
    /// Input ran out mid-token and the stream is not finished.
    Suspend,
}

/// What consuming the next input character yielded.
enum Advance {
    Char(char),
    Eof,
    NeedInput,
}

/// The HTML tokenizer.
///
/// Construct with [`Tokenizer::new`], supply input with [`feed`], mark the
/// end of the stream with [`finish`], and pull tokens with [`next_token`].
///
/// [`feed`]: Tokenizer::feed
/// [`finish`]: Tokenizer::finish
/// [`next_token`]: Tokenizer::next_token
pub struct Tokenizer {
    input: Vec<char>,
    pos: usize,
    byte_pos: usize,
    end_of_input: bool,
    pending_cr: bool,

    state: State,
    return_state: Option<State>,
    reconsume: bool,
    current_char: Option<char>,

    current_token: Option<Token>,
    last_start_tag: Option<String>,
    temp_buffer: String,
    char_ref_code: u32,
    token_start: usize,

    pending: VecDeque<(Token, usize)>,
    last_offset: usize,
    eof_emitted: bool,
    errors: Vec<ParseError>,
}

impl Tokenizer {
    /// A tokenizer in the data state with an empty input buffer.
    #[must_use]
    pub fn new() -> Self {
        Tokenizer {
            input: Vec::new(),
            pos: 0,
            byte_pos: 0,
            end_of_input: false,
            pending_cr: false,
            state: State::Data,
            return_state: None,
            reconsume: false,
            current_char: None,
            current_token: None,
            last_start_tag: None,
            temp_buffer: String::new(),
            char_ref_code: 0,
            token_start: 0,
            pending: VecDeque::new(),
            last_offset: 0,
            eof_emitted: false,
            errors: Vec::new(),
        }
    }

    /// Append a chunk of input.
    ///
    /// [§ 13.2.3.5 Preprocessing the input stream](https://html.spec.whatwg.org/multipage/parsing.html#preprocessing-the-input-stream)
    ///
    /// "Before the tokenization stage, the input stream must be preprocessed
    /// by normalizing newlines." CRLF pairs and lone CRs become LF; a CR at
    /// the end of a chunk is held back until the next chunk (or `finish`)
    /// reveals whether an LF follows.
    pub fn feed(&mut self, chunk: &str) {
        for c in chunk.chars() {
            if self.pending_cr {
                self.pending_cr = false;
                self.input.push('\n');
                if c == '\n' {
                    continue;
                }
            }
            if c == '\r' {
                self.pending_cr = true;
            } else {
                self.input.push(c);
            }
        }
    }

    /// Mark the end of the input stream.
    pub fn finish(&mut self) {
        if self.pending_cr {
            self.pending_cr = false;
            self.input.push('\n');
        }
        self.end_of_input = true;
    }

    /// Pull the next token.
    ///
    /// Returns `None` when the buffered input is exhausted and [`finish`]
    /// has not been called yet. After the end of input, every call returns
    /// a token; the stream terminates with [`Token::EndOfFile`].
    ///
    /// [`finish`]: Tokenizer::finish
    pub fn next_token(&mut self) -> Option<Token> {
        loop {
            if let Some((token, offset)) = self.pending.pop_front() {
                self.last_offset = offset;
                return Some(token);
            }
            if self.eof_emitted {
                return Some(Token::EndOfFile);
            }
            match self.run_one_state() {
                Step::Continue => {}
                Step::Suspend => return None,
            }
        }
    }

    /// Byte offset (in the normalized stream) where the most recently
    /// pulled token started.
    #[must_use]
    pub fn last_token_offset(&self) -> usize {
        self.last_offset
    }

    /// Force the machine into a different state.
    ///
    /// Tree construction uses this after certain start tags: "the tokenizer
    /// state may be changed by the tree construction stage."
    pub fn set_state(&mut self, state: State) {
        self.state = state;
    }

    /// Take the parse errors recorded so far.
    pub fn take_errors(&mut self) -> Vec<ParseError> {
        std::mem::take(&mut self.errors)
    }

    // Input primitives.

    fn advance(&mut self) -> Advance {
        if let Some(&c) = self.input.get(self.pos) {
            self.pos += 1;
            self.byte_pos += c.len_utf8();
            self.current_char = Some(c);
            Advance::Char(c)
        } else if self.end_of_input {
            self.current_char = None;
            Advance::Eof
        } else {
            Advance::NeedInput
        }
    }

    fn remaining(&self) -> usize {
        self.input.len() - self.pos
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.pos).copied()
    }

    const fn switch_to(&mut self, state: State) {
        self.state = state;
    }

    const fn reconsume_in(&mut self, state: State) {
        self.reconsume = true;
        self.state = state;
    }

    fn error(&mut self, kind: ParseErrorKind) {
        // Point at the character that was being handled; at end of input
        // there is no current character and the offset is the input length.
        let offset = self
            .byte_pos
            .saturating_sub(self.current_char.map_or(0, char::len_utf8));
        self.errors.push(ParseError::new(kind, offset));
    }

    // Emission.

    fn emit_char(&mut self, c: char) {
        let offset = self.byte_pos.saturating_sub(c.len_utf8());
        self.pending.push_back((Token::Character(c), offset));
    }

    fn emit_eof(&mut self) {
        self.pending.push_back((Token::EndOfFile, self.byte_pos));
        self.eof_emitted = true;
    }

    /// Emit the token under construction.
    ///
    /// Start tags record their name for the appropriate-end-tag check; end
    /// tags report attribute and trailing-solidus errors; duplicate
    /// attributes (already reported when the name completed) are dropped
    /// here, keeping the first occurrence.
    fn emit_current(&mut self) {
        let mut token = self
            .current_token
            .take()
            .expect("emit_current with no token under construction");
        match &mut token {
            Token::StartTag {
                name, attributes, ..
            } => {
                self.last_start_tag = Some(name.clone());
                let mut seen: Vec<String> = Vec::new();
                attributes.retain(|attr| {
                    if seen.contains(&attr.name) {
                        false
                    } else {
                        seen.push(attr.name.clone());
                        true
                    }
                });
            }
            Token::EndTag {
                self_closing,
                attributes,
                ..
            } => {
                if !attributes.is_empty() {
                    self.error(ParseErrorKind::EndTagWithAttributes);
                }
                if *self_closing {
                    self.error(ParseErrorKind::EndTagWithTrailingSolidus);
                }
            }
            _ => {}
        }
        self.pending.push_back((token, self.token_start));
    }

    fn current_token_mut(&mut self) -> &mut Token {
        self.current_token
            .as_mut()
            .expect("no token under construction")
    }

    /// "When the user agent leaves the attribute name state ... the complete
    /// attribute's name must be compared to the other attributes on the same
    /// token." The duplicate is reported now and dropped at emit time.
    fn finish_attribute_name(&mut self) {
        if self.current_token_mut().current_attribute_is_duplicate() {
            self.error(ParseErrorKind::DuplicateAttribute);
        }
    }

    fn is_appropriate_end_tag(&self) -> bool {
        match (&self.current_token, &self.last_start_tag) {
            (Some(Token::EndTag { name, .. }), Some(last)) => name == last,
            _ => false,
        }
    }

    /// The anything-else rule shared by the RCDATA, RAWTEXT and script data
    /// end tag name states: the partial end tag turns back into text.
    fn abandon_end_tag(&mut self, base: State) {
        self.current_token = None;
        self.emit_char('<');
        self.emit_char('/');
        let buffered: Vec<char> = self.temp_buffer.chars().collect();
        for c in buffered {
            self.emit_char(c);
        }
        self.reconsume_in(base);
    }

    // Character reference plumbing.

    fn char_ref_in_attribute(&self) -> bool {
        matches!(
            self.return_state,
            Some(
                State::AttributeValueDoubleQuoted
                    | State::AttributeValueSingleQuoted
                    | State::AttributeValueUnquoted
            )
        )
    }

    fn return_state(&self) -> State {
        self.return_state
            .expect("character reference with no return state")
    }

    /// "Flush code points consumed as a character reference."
    fn flush_char_ref(&mut self) {
        if self.char_ref_in_attribute() {
            let buffered = std::mem::take(&mut self.temp_buffer);
            self.current_token_mut().push_str_to_attribute_value(&buffered);
        } else {
            let buffered: Vec<char> = self.temp_buffer.chars().collect();
            for c in buffered {
                self.emit_char(c);
            }
            self.temp_buffer.clear();
        }
    }

    fn emit_char_or_append_to_attribute(&mut self, c: char) {
        if self.char_ref_in_attribute() {
            self.current_token_mut().push_to_attribute_value(c);
        } else {
            self.emit_char(c);
        }
    }

    // The dispatcher.

    fn run_one_state(&mut self) -> Step {
        // These states operate on lookahead or without consuming.
        match self.state {
            State::MarkupDeclarationOpen => return self.markup_declaration_open_state(),
            State::NamedCharacterReference => return self.named_character_reference_state(),
            State::NumericCharacterReferenceEnd => {
                self.numeric_character_reference_end_state();
                return Step::Continue;
            }
            _ => {}
        }

        let c = if self.reconsume {
            self.reconsume = false;
            self.current_char
        } else {
            match self.advance() {
                Advance::Char(c) => Some(c),
                Advance::Eof => None,
                Advance::NeedInput => return Step::Suspend,
            }
        };

        match self.state {
            State::Data => self.data_state(c),
            State::RcData => self.rcdata_state(c),
            State::RawText => self.rawtext_state(c),
            State::ScriptData => self.script_data_state(c),
            State::Plaintext => self.plaintext_state(c),
            State::TagOpen => self.tag_open_state(c),
            State::EndTagOpen => self.end_tag_open_state(c),
            State::TagName => self.tag_name_state(c),
            State::RcDataLessThanSign => self.rcdata_less_than_sign_state(c),
            State::RcDataEndTagOpen => self.rcdata_end_tag_open_state(c),
            State::RcDataEndTagName => self.rcdata_end_tag_name_state(c),
            State::RawTextLessThanSign => self.rawtext_less_than_sign_state(c),
            State::RawTextEndTagOpen => self.rawtext_end_tag_open_state(c),
            State::RawTextEndTagName => self.rawtext_end_tag_name_state(c),
            State::ScriptDataLessThanSign => self.script_data_less_than_sign_state(c),
            State::ScriptDataEndTagOpen => self.script_data_end_tag_open_state(c),
            State::ScriptDataEndTagName => self.script_data_end_tag_name_state(c),
            State::ScriptDataEscapeStart => self.script_data_escape_start_state(c),
            State::ScriptDataEscapeStartDash => self.script_data_escape_start_dash_state(c),
            State::ScriptDataEscaped => self.script_data_escaped_state(c),
            State::ScriptDataEscapedDash => self.script_data_escaped_dash_state(c),
            State::ScriptDataEscapedDashDash => self.script_data_escaped_dash_dash_state(c),
            State::ScriptDataEscapedLessThanSign => {
                self.script_data_escaped_less_than_sign_state(c);
            }
            State::ScriptDataEscapedEndTagOpen => self.script_data_escaped_end_tag_open_state(c),
            State::ScriptDataEscapedEndTagName => self.script_data_escaped_end_tag_name_state(c),
            State::ScriptDataDoubleEscapeStart => self.script_data_double_escape_start_state(c),
            State::ScriptDataDoubleEscaped => self.script_data_double_escaped_state(c),
            State::ScriptDataDoubleEscapedDash => self.script_data_double_escaped_dash_state(c),
            State::ScriptDataDoubleEscapedDashDash => {
                self.script_data_double_escaped_dash_dash_state(c);
            }
            State::ScriptDataDoubleEscapedLessThanSign => {
                self.script_data_double_escaped_less_than_sign_state(c);
            }
            State::ScriptDataDoubleEscapeEnd => self.script_data_double_escape_end_state(c),
            State::BeforeAttributeName => self.before_attribute_name_state(c),
            State::AttributeName => self.attribute_name_state(c),
            State::AfterAttributeName => self.after_attribute_name_state(c),
            State::BeforeAttributeValue => self.before_attribute_value_state(c),
            State::AttributeValueDoubleQuoted => self.attribute_value_double_quoted_state(c),
            State::AttributeValueSingleQuoted => self.attribute_value_single_quoted_state(c),
            State::AttributeValueUnquoted => self.attribute_value_unquoted_state(c),
            State::AfterAttributeValueQuoted => self.after_attribute_value_quoted_state(c),
            State::SelfClosingStartTag => self.self_closing_start_tag_state(c),
            State::BogusComment => self.bogus_comment_state(c),
            State::CommentStart => self.comment_start_state(c),
            State::CommentStartDash => self.comment_start_dash_state(c),
            State::Comment => self.comment_state(c),
            State::CommentLessThanSign => self.comment_less_than_sign_state(c),
            State::CommentLessThanSignBang => self.comment_less_than_sign_bang_state(c),
            State::CommentLessThanSignBangDash => self.comment_less_than_sign_bang_dash_state(c),
            State::CommentLessThanSignBangDashDash => {
                self.comment_less_than_sign_bang_dash_dash_state(c);
            }
            State::CommentEndDash => self.comment_end_dash_state(c),
            State::CommentEnd => self.comment_end_state(c),
            State::CommentEndBang => self.comment_end_bang_state(c),
            State::Doctype => self.doctype_state(c),
            State::BeforeDoctypeName => self.before_doctype_name_state(c),
            State::DoctypeName => self.doctype_name_state(c),
            State::AfterDoctypeName => return self.after_doctype_name_state(c),
            State::AfterDoctypePublicKeyword => self.after_doctype_public_keyword_state(c),
            State::BeforeDoctypePublicIdentifier => {
                self.before_doctype_public_identifier_state(c);
            }
            State::DoctypePublicIdentifierDoubleQuoted => {
                self.doctype_public_identifier_quoted_state(c, '"');
            }
            State::DoctypePublicIdentifierSingleQuoted => {
                self.doctype_public_identifier_quoted_state(c, '\'');
            }
            State::AfterDoctypePublicIdentifier => self.after_doctype_public_identifier_state(c),
            State::BetweenDoctypePublicAndSystemIdentifiers => {
                self.between_doctype_public_and_system_identifiers_state(c);
            }
            State::AfterDoctypeSystemKeyword => self.after_doctype_system_keyword_state(c),
            State::BeforeDoctypeSystemIdentifier => {
                self.before_doctype_system_identifier_state(c);
            }
            State::DoctypeSystemIdentifierDoubleQuoted => {
                self.doctype_system_identifier_quoted_state(c, '"');
            }
            State::DoctypeSystemIdentifierSingleQuoted => {
                self.doctype_system_identifier_quoted_state(c, '\'');
            }
            State::AfterDoctypeSystemIdentifier => self.after_doctype_system_identifier_state(c),
            State::BogusDoctype => self.bogus_doctype_state(c),
            State::CharacterReference => self.character_reference_state(c),
            State::AmbiguousAmpersand => self.ambiguous_ampersand_state(c),
            State::NumericCharacterReference => self.numeric_character_reference_state(c),
            State::HexadecimalCharacterReferenceStart => {
                self.hexadecimal_character_reference_start_state(c);
            }
            State::DecimalCharacterReferenceStart => {
                self.decimal_character_reference_start_state(c);
            }
            State::HexadecimalCharacterReference => self.hexadecimal_character_reference_state(c),
            State::DecimalCharacterReference => self.decimal_character_reference_state(c),
            State::MarkupDeclarationOpen
            | State::NamedCharacterReference
            | State::NumericCharacterReferenceEnd => unreachable!("handled before consuming"),
        }
        Step::Continue
    }

    // Data-like states.

    fn data_state(&mut self, c: Option<char>) {
        match c {
            Some('&') => {
                self.return_state = Some(State::Data);
                self.switch_to(State::CharacterReference);
                self.temp_buffer.clear();
                self.temp_buffer.push('&');
            }
            Some('<') => {
                self.token_start = self.byte_pos - 1;
                self.switch_to(State::TagOpen);
            }
            Some('\0') => {
                // "This is an unexpected-null-character parse error. Emit the
                // current input character as a character token."
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_char('\0');
            }
            Some(c) => self.emit_char(c),
            None => self.emit_eof(),
        }
    }

    fn rcdata_state(&mut self, c: Option<char>) {
        match c {
            Some('&') => {
                self.return_state = Some(State::RcData);
                self.switch_to(State::CharacterReference);
                self.temp_buffer.clear();
                self.temp_buffer.push('&');
            }
            Some('<') => {
                self.token_start = self.byte_pos - 1;
                self.switch_to(State::RcDataLessThanSign);
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            Some(c) => self.emit_char(c),
            None => self.emit_eof(),
        }
    }

    fn rawtext_state(&mut self, c: Option<char>) {
        match c {
            Some('<') => {
                self.token_start = self.byte_pos - 1;
                self.switch_to(State::RawTextLessThanSign);
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            Some(c) => self.emit_char(c),
            None => self.emit_eof(),
        }
    }

    fn script_data_state(&mut self, c: Option<char>) {
        match c {
            Some('<') => {
                self.token_start = self.byte_pos - 1;
                self.switch_to(State::ScriptDataLessThanSign);
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            Some(c) => self.emit_char(c),
            None => self.emit_eof(),
        }
    }

    fn plaintext_state(&mut self, c: Option<char>) {
        match c {
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            Some(c) => self.emit_char(c),
            None => self.emit_eof(),
        }
    }

    // Tag states.

    fn tag_open_state(&mut self, c: Option<char>) {
        match c {
            Some('!') => self.switch_to(State::MarkupDeclarationOpen),
            Some('/') => self.switch_to(State::EndTagOpen),
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_start_tag());
                self.reconsume_in(State::TagName);
            }
            Some('?') => {
                self.error(ParseErrorKind::UnexpectedQuestionMarkInsteadOfTagName);
                self.current_token = Some(Token::Comment(String::new()));
                self.reconsume_in(State::BogusComment);
            }
            None => {
                self.error(ParseErrorKind::EofBeforeTagName);
                self.emit_char('<');
                self.emit_eof();
            }
            Some(_) => {
                self.error(ParseErrorKind::InvalidFirstCharacterOfTagName);
                self.emit_char('<');
                self.reconsume_in(State::Data);
            }
        }
    }

    fn end_tag_open_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(State::TagName);
            }
            Some('>') => {
                self.error(ParseErrorKind::MissingEndTagName);
                self.switch_to(State::Data);
            }
            None => {
                self.error(ParseErrorKind::EofBeforeTagName);
                self.emit_char('<');
                self.emit_char('/');
                self.emit_eof();
            }
            Some(_) => {
                self.error(ParseErrorKind::InvalidFirstCharacterOfTagName);
                self.current_token = Some(Token::Comment(String::new()));
                self.reconsume_in(State::BogusComment);
            }
        }
    }

    fn tag_name_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => self.switch_to(State::BeforeAttributeName),
            Some('/') => self.switch_to(State::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            Some(c) if c.is_ascii_uppercase() => {
                self.current_token_mut()
                    .push_to_tag_name(c.to_ascii_lowercase());
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.current_token_mut().push_to_tag_name('\u{FFFD}');
            }
            None => {
                self.error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(c) => self.current_token_mut().push_to_tag_name(c),
        }
    }

    // RCDATA / RAWTEXT / script data end tags.

    fn rcdata_less_than_sign_state(&mut self, c: Option<char>) {
        match c {
            Some('/') => {
                self.temp_buffer.clear();
                self.switch_to(State::RcDataEndTagOpen);
            }
            _ => {
                self.emit_char('<');
                self.reconsume_in(State::RcData);
            }
        }
    }

    fn rcdata_end_tag_open_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(State::RcDataEndTagName);
            }
            _ => {
                self.emit_char('<');
                self.emit_char('/');
                self.reconsume_in(State::RcData);
            }
        }
    }

    fn rcdata_end_tag_name_state(&mut self, c: Option<char>) {
        self.alt_end_tag_name_state(c, State::RcData);
    }

    fn rawtext_less_than_sign_state(&mut self, c: Option<char>) {
        match c {
            Some('/') => {
                self.temp_buffer.clear();
                self.switch_to(State::RawTextEndTagOpen);
            }
            _ => {
                self.emit_char('<');
                self.reconsume_in(State::RawText);
            }
        }
    }

    fn rawtext_end_tag_open_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(State::RawTextEndTagName);
            }
            _ => {
                self.emit_char('<');
                self.emit_char('/');
                self.reconsume_in(State::RawText);
            }
        }
    }

    fn rawtext_end_tag_name_state(&mut self, c: Option<char>) {
        self.alt_end_tag_name_state(c, State::RawText);
    }

    fn script_data_less_than_sign_state(&mut self, c: Option<char>) {
        match c {
            Some('/') => {
                self.temp_buffer.clear();
                self.switch_to(State::ScriptDataEndTagOpen);
            }
            Some('!') => {
                self.switch_to(State::ScriptDataEscapeStart);
                self.emit_char('<');
                self.emit_char('!');
            }
            _ => {
                self.emit_char('<');
                self.reconsume_in(State::ScriptData);
            }
        }
    }

    fn script_data_end_tag_open_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(State::ScriptDataEndTagName);
            }
            _ => {
                self.emit_char('<');
                self.emit_char('/');
                self.reconsume_in(State::ScriptData);
            }
        }
    }

    fn script_data_end_tag_name_state(&mut self, c: Option<char>) {
        self.alt_end_tag_name_state(c, State::ScriptData);
    }

    /// The shared body of the RCDATA, RAWTEXT, script data and script data
    /// escaped end tag name states; only the fallback state differs.
    fn alt_end_tag_name_state(&mut self, c: Option<char>, base: State) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') if self.is_appropriate_end_tag() => {
                self.switch_to(State::BeforeAttributeName);
            }
            Some('/') if self.is_appropriate_end_tag() => {
                self.switch_to(State::SelfClosingStartTag);
            }
            Some('>') if self.is_appropriate_end_tag() => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            Some(c) if c.is_ascii_uppercase() => {
                self.current_token_mut()
                    .push_to_tag_name(c.to_ascii_lowercase());
                self.temp_buffer.push(c);
            }
            Some(c) if c.is_ascii_lowercase() => {
                self.current_token_mut().push_to_tag_name(c);
                self.temp_buffer.push(c);
            }
            _ => self.abandon_end_tag(base),
        }
    }

    // Script data escaping.

    fn script_data_escape_start_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.switch_to(State::ScriptDataEscapeStartDash);
                self.emit_char('-');
            }
            _ => self.reconsume_in(State::ScriptData),
        }
    }

    fn script_data_escape_start_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.switch_to(State::ScriptDataEscapedDashDash);
                self.emit_char('-');
            }
            _ => self.reconsume_in(State::ScriptData),
        }
    }

    fn script_data_escaped_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.switch_to(State::ScriptDataEscapedDash);
                self.emit_char('-');
            }
            Some('<') => self.switch_to(State::ScriptDataEscapedLessThanSign),
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            Some(c) => self.emit_char(c),
            None => {
                self.error(ParseErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
        }
    }

    fn script_data_escaped_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.switch_to(State::ScriptDataEscapedDashDash);
                self.emit_char('-');
            }
            Some('<') => self.switch_to(State::ScriptDataEscapedLessThanSign),
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.switch_to(State::ScriptDataEscaped);
                self.emit_char('\u{FFFD}');
            }
            Some(c) => {
                self.switch_to(State::ScriptDataEscaped);
                self.emit_char(c);
            }
            None => {
                self.error(ParseErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
        }
    }

    fn script_data_escaped_dash_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.emit_char('-'),
            Some('<') => self.switch_to(State::ScriptDataEscapedLessThanSign),
            Some('>') => {
                self.switch_to(State::ScriptData);
                self.emit_char('>');
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.switch_to(State::ScriptDataEscaped);
                self.emit_char('\u{FFFD}');
            }
            Some(c) => {
                self.switch_to(State::ScriptDataEscaped);
                self.emit_char(c);
            }
            None => {
                self.error(ParseErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
        }
    }

    fn script_data_escaped_less_than_sign_state(&mut self, c: Option<char>) {
        match c {
            Some('/') => {
                self.temp_buffer.clear();
                self.switch_to(State::ScriptDataEscapedEndTagOpen);
            }
            Some(c) if c.is_ascii_alphabetic() => {
                self.temp_buffer.clear();
                self.emit_char('<');
                self.reconsume_in(State::ScriptDataDoubleEscapeStart);
            }
            _ => {
                self.emit_char('<');
                self.reconsume_in(State::ScriptDataEscaped);
            }
        }
    }

    fn script_data_escaped_end_tag_open_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_alphabetic() => {
                self.current_token = Some(Token::new_end_tag());
                self.reconsume_in(State::ScriptDataEscapedEndTagName);
            }
            _ => {
                self.emit_char('<');
                self.emit_char('/');
                self.reconsume_in(State::ScriptDataEscaped);
            }
        }
    }

    fn script_data_escaped_end_tag_name_state(&mut self, c: Option<char>) {
        self.alt_end_tag_name_state(c, State::ScriptDataEscaped);
    }

    fn script_data_double_escape_start_state(&mut self, c: Option<char>) {
        match c {
            Some(c @ ('\t' | '\n' | '\x0C' | ' ' | '/' | '>')) => {
                if self.temp_buffer == "script" {
                    self.switch_to(State::ScriptDataDoubleEscaped);
                } else {
                    self.switch_to(State::ScriptDataEscaped);
                }
                self.emit_char(c);
            }
            Some(c) if c.is_ascii_uppercase() => {
                self.temp_buffer.push(c.to_ascii_lowercase());
                self.emit_char(c);
            }
            Some(c) if c.is_ascii_lowercase() => {
                self.temp_buffer.push(c);
                self.emit_char(c);
            }
            _ => self.reconsume_in(State::ScriptDataEscaped),
        }
    }

    fn script_data_double_escaped_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.switch_to(State::ScriptDataDoubleEscapedDash);
                self.emit_char('-');
            }
            Some('<') => {
                self.switch_to(State::ScriptDataDoubleEscapedLessThanSign);
                self.emit_char('<');
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.emit_char('\u{FFFD}');
            }
            Some(c) => self.emit_char(c),
            None => {
                self.error(ParseErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
        }
    }

    fn script_data_double_escaped_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.switch_to(State::ScriptDataDoubleEscapedDashDash);
                self.emit_char('-');
            }
            Some('<') => {
                self.switch_to(State::ScriptDataDoubleEscapedLessThanSign);
                self.emit_char('<');
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.switch_to(State::ScriptDataDoubleEscaped);
                self.emit_char('\u{FFFD}');
            }
            Some(c) => {
                self.switch_to(State::ScriptDataDoubleEscaped);
                self.emit_char(c);
            }
            None => {
                self.error(ParseErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
        }
    }

    fn script_data_double_escaped_dash_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.emit_char('-'),
            Some('<') => {
                self.switch_to(State::ScriptDataDoubleEscapedLessThanSign);
                self.emit_char('<');
            }
            Some('>') => {
                self.switch_to(State::ScriptData);
                self.emit_char('>');
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.switch_to(State::ScriptDataDoubleEscaped);
                self.emit_char('\u{FFFD}');
            }
            Some(c) => {
                self.switch_to(State::ScriptDataDoubleEscaped);
                self.emit_char(c);
            }
            None => {
                self.error(ParseErrorKind::EofInScriptHtmlCommentLikeText);
                self.emit_eof();
            }
        }
    }

    fn script_data_double_escaped_less_than_sign_state(&mut self, c: Option<char>) {
        match c {
            Some('/') => {
                self.temp_buffer.clear();
                self.switch_to(State::ScriptDataDoubleEscapeEnd);
                self.emit_char('/');
            }
            _ => self.reconsume_in(State::ScriptDataDoubleEscaped),
        }
    }

    fn script_data_double_escape_end_state(&mut self, c: Option<char>) {
        match c {
            Some(c @ ('\t' | '\n' | '\x0C' | ' ' | '/' | '>')) => {
                if self.temp_buffer == "script" {
                    self.switch_to(State::ScriptDataEscaped);
                } else {
                    self.switch_to(State::ScriptDataDoubleEscaped);
                }
                self.emit_char(c);
            }
            Some(c) if c.is_ascii_uppercase() => {
                self.temp_buffer.push(c.to_ascii_lowercase());
                self.emit_char(c);
            }
            Some(c) if c.is_ascii_lowercase() => {
                self.temp_buffer.push(c);
                self.emit_char(c);
            }
            _ => self.reconsume_in(State::ScriptDataDoubleEscaped),
        }
    }

    // Attribute states.

    fn before_attribute_name_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => {}
            Some('/' | '>') | None => self.reconsume_in(State::AfterAttributeName),
            Some('=') => {
                self.error(ParseErrorKind::UnexpectedEqualsSignBeforeAttributeName);
                self.current_token_mut().start_new_attribute();
                self.current_token_mut().push_to_attribute_name('=');
                self.switch_to(State::AttributeName);
            }
            Some(_) => {
                self.current_token_mut().start_new_attribute();
                self.reconsume_in(State::AttributeName);
            }
        }
    }

    fn attribute_name_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ' | '/' | '>') | None => {
                self.finish_attribute_name();
                self.reconsume_in(State::AfterAttributeName);
            }
            Some('=') => {
                self.finish_attribute_name();
                self.switch_to(State::BeforeAttributeValue);
            }
            Some(c) if c.is_ascii_uppercase() => {
                self.current_token_mut()
                    .push_to_attribute_name(c.to_ascii_lowercase());
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.current_token_mut().push_to_attribute_name('\u{FFFD}');
            }
            Some(c @ ('"' | '\'' | '<')) => {
                self.error(ParseErrorKind::UnexpectedCharacterInAttributeName);
                self.current_token_mut().push_to_attribute_name(c);
            }
            Some(c) => self.current_token_mut().push_to_attribute_name(c),
        }
    }

    fn after_attribute_name_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => {}
            Some('/') => self.switch_to(State::SelfClosingStartTag),
            Some('=') => self.switch_to(State::BeforeAttributeValue),
            Some('>') => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(_) => {
                self.current_token_mut().start_new_attribute();
                self.reconsume_in(State::AttributeName);
            }
        }
    }

    fn before_attribute_value_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => {}
            Some('"') => self.switch_to(State::AttributeValueDoubleQuoted),
            Some('\'') => self.switch_to(State::AttributeValueSingleQuoted),
            Some('>') => {
                self.error(ParseErrorKind::MissingAttributeValue);
                self.switch_to(State::Data);
                self.emit_current();
            }
            _ => self.reconsume_in(State::AttributeValueUnquoted),
        }
    }

    fn attribute_value_double_quoted_state(&mut self, c: Option<char>) {
        match c {
            Some('"') => self.switch_to(State::AfterAttributeValueQuoted),
            Some('&') => {
                self.return_state = Some(State::AttributeValueDoubleQuoted);
                self.switch_to(State::CharacterReference);
                self.temp_buffer.clear();
                self.temp_buffer.push('&');
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.current_token_mut().push_to_attribute_value('\u{FFFD}');
            }
            None => {
                self.error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(c) => self.current_token_mut().push_to_attribute_value(c),
        }
    }

    fn attribute_value_single_quoted_state(&mut self, c: Option<char>) {
        match c {
            Some('\'') => self.switch_to(State::AfterAttributeValueQuoted),
            Some('&') => {
                self.return_state = Some(State::AttributeValueSingleQuoted);
                self.switch_to(State::CharacterReference);
                self.temp_buffer.clear();
                self.temp_buffer.push('&');
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.current_token_mut().push_to_attribute_value('\u{FFFD}');
            }
            None => {
                self.error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(c) => self.current_token_mut().push_to_attribute_value(c),
        }
    }

    fn attribute_value_unquoted_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => self.switch_to(State::BeforeAttributeName),
            Some('&') => {
                self.return_state = Some(State::AttributeValueUnquoted);
                self.switch_to(State::CharacterReference);
                self.temp_buffer.clear();
                self.temp_buffer.push('&');
            }
            Some('>') => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.current_token_mut().push_to_attribute_value('\u{FFFD}');
            }
            Some(c @ ('"' | '\'' | '<' | '=' | '`')) => {
                self.error(ParseErrorKind::UnexpectedCharacterInUnquotedAttributeValue);
                self.current_token_mut().push_to_attribute_value(c);
            }
            None => {
                self.error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(c) => self.current_token_mut().push_to_attribute_value(c),
        }
    }

    fn after_attribute_value_quoted_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => self.switch_to(State::BeforeAttributeName),
            Some('/') => self.switch_to(State::SelfClosingStartTag),
            Some('>') => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(_) => {
                self.error(ParseErrorKind::MissingWhitespaceBetweenAttributes);
                self.reconsume_in(State::BeforeAttributeName);
            }
        }
    }

    fn self_closing_start_tag_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.current_token_mut().set_self_closing();
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInTag);
                self.emit_eof();
            }
            Some(_) => {
                self.error(ParseErrorKind::UnexpectedSolidusInTag);
                self.reconsume_in(State::BeforeAttributeName);
            }
        }
    }

    // Comment states.

    fn bogus_comment_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.emit_current();
                self.emit_eof();
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.current_token_mut().push_to_comment('\u{FFFD}');
            }
            Some(c) => self.current_token_mut().push_to_comment(c),
        }
    }

    /// The markup declaration open state works on lookahead: "If the next
    /// few characters are ...". Up to seven characters decide between a
    /// comment, a DOCTYPE and a CDATA section, so with unfinished input
    /// fewer than seven buffered characters suspend the machine.
    fn markup_declaration_open_state(&mut self) -> Step {
        if !self.end_of_input && self.remaining() < 7 {
            return Step::Suspend;
        }
        let lookahead: String = self
            .input
            .iter()
            .skip(self.pos)
            .take(7)
            .collect();

        if lookahead.starts_with("--") {
            self.consume_chars(2);
            self.current_token = Some(Token::Comment(String::new()));
            self.switch_to(State::CommentStart);
        } else if lookahead.len() >= 7 && lookahead.eq_ignore_ascii_case("doctype") {
            self.consume_chars(7);
            self.switch_to(State::Doctype);
        } else if lookahead == "[CDATA[" {
            // No foreign content here, so: "this is a cdata-in-html-content
            // parse error. Create a comment token whose data is the
            // "[CDATA[" string."
            self.error(ParseErrorKind::CdataInHtmlContent);
            self.consume_chars(7);
            self.current_token = Some(Token::Comment("[CDATA[".to_string()));
            self.switch_to(State::BogusComment);
        } else {
            self.error(ParseErrorKind::IncorrectlyOpenedComment);
            self.current_token = Some(Token::Comment(String::new()));
            self.switch_to(State::BogusComment);
        }
        Step::Continue
    }

    fn consume_chars(&mut self, count: usize) {
        for _ in 0..count {
            match self.advance() {
                Advance::Char(_) => {}
                Advance::Eof | Advance::NeedInput => break,
            }
        }
    }

    fn comment_start_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(State::CommentStartDash),
            Some('>') => {
                self.error(ParseErrorKind::AbruptClosingOfEmptyComment);
                self.switch_to(State::Data);
                self.emit_current();
            }
            _ => self.reconsume_in(State::Comment),
        }
    }

    fn comment_start_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(State::CommentEnd),
            Some('>') => {
                self.error(ParseErrorKind::AbruptClosingOfEmptyComment);
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInComment);
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {
                self.current_token_mut().push_to_comment('-');
                self.reconsume_in(State::Comment);
            }
        }
    }

    fn comment_state(&mut self, c: Option<char>) {
        match c {
            Some('<') => {
                self.current_token_mut().push_to_comment('<');
                self.switch_to(State::CommentLessThanSign);
            }
            Some('-') => self.switch_to(State::CommentEndDash),
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.current_token_mut().push_to_comment('\u{FFFD}');
            }
            None => {
                self.error(ParseErrorKind::EofInComment);
                self.emit_current();
                self.emit_eof();
            }
            Some(c) => self.current_token_mut().push_to_comment(c),
        }
    }

    fn comment_less_than_sign_state(&mut self, c: Option<char>) {
        match c {
            Some('!') => {
                self.current_token_mut().push_to_comment('!');
                self.switch_to(State::CommentLessThanSignBang);
            }
            Some('<') => self.current_token_mut().push_to_comment('<'),
            _ => self.reconsume_in(State::Comment),
        }
    }

    fn comment_less_than_sign_bang_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(State::CommentLessThanSignBangDash),
            _ => self.reconsume_in(State::Comment),
        }
    }

    fn comment_less_than_sign_bang_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(State::CommentLessThanSignBangDashDash),
            _ => self.reconsume_in(State::CommentEndDash),
        }
    }

    fn comment_less_than_sign_bang_dash_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('>') | None => self.reconsume_in(State::CommentEnd),
            Some(_) => {
                self.error(ParseErrorKind::NestedComment);
                self.reconsume_in(State::CommentEnd);
            }
        }
    }

    fn comment_end_dash_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => self.switch_to(State::CommentEnd),
            None => {
                self.error(ParseErrorKind::EofInComment);
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {
                self.current_token_mut().push_to_comment('-');
                self.reconsume_in(State::Comment);
            }
        }
    }

    fn comment_end_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            Some('!') => self.switch_to(State::CommentEndBang),
            Some('-') => self.current_token_mut().push_to_comment('-'),
            None => {
                self.error(ParseErrorKind::EofInComment);
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {
                self.current_token_mut().push_str_to_comment("--");
                self.reconsume_in(State::Comment);
            }
        }
    }

    fn comment_end_bang_state(&mut self, c: Option<char>) {
        match c {
            Some('-') => {
                self.current_token_mut().push_str_to_comment("--!");
                self.switch_to(State::CommentEndDash);
            }
            Some('>') => {
                self.error(ParseErrorKind::IncorrectlyClosedComment);
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInComment);
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {
                self.current_token_mut().push_str_to_comment("--!");
                self.reconsume_in(State::Comment);
            }
        }
    }

    // DOCTYPE states.

    fn doctype_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => self.switch_to(State::BeforeDoctypeName),
            Some('>') => self.reconsume_in(State::BeforeDoctypeName),
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                let mut token = Token::new_doctype();
                token.set_force_quirks();
                self.current_token = Some(token);
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {
                self.error(ParseErrorKind::MissingWhitespaceBeforeDoctypeName);
                self.reconsume_in(State::BeforeDoctypeName);
            }
        }
    }

    fn before_doctype_name_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => {}
            Some(c) if c.is_ascii_uppercase() => {
                let mut token = Token::new_doctype();
                token.push_to_doctype_name(c.to_ascii_lowercase());
                self.current_token = Some(token);
                self.switch_to(State::DoctypeName);
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                let mut token = Token::new_doctype();
                token.push_to_doctype_name('\u{FFFD}');
                self.current_token = Some(token);
                self.switch_to(State::DoctypeName);
            }
            Some('>') => {
                self.error(ParseErrorKind::MissingDoctypeName);
                let mut token = Token::new_doctype();
                token.set_force_quirks();
                self.current_token = Some(token);
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                let mut token = Token::new_doctype();
                token.set_force_quirks();
                self.current_token = Some(token);
                self.emit_current();
                self.emit_eof();
            }
            Some(c) => {
                let mut token = Token::new_doctype();
                token.push_to_doctype_name(c);
                self.current_token = Some(token);
                self.switch_to(State::DoctypeName);
            }
        }
    }

    fn doctype_name_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => self.switch_to(State::AfterDoctypeName),
            Some('>') => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            Some(c) if c.is_ascii_uppercase() => {
                self.current_token_mut()
                    .push_to_doctype_name(c.to_ascii_lowercase());
            }
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.current_token_mut().push_to_doctype_name('\u{FFFD}');
            }
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current();
                self.emit_eof();
            }
            Some(c) => self.current_token_mut().push_to_doctype_name(c),
        }
    }

    /// "If the six characters starting from the current input character are
    /// an ASCII case-insensitive match for the word PUBLIC ..." Five more
    /// characters of lookahead are needed past the current one, so with
    /// unfinished input and a short buffer the current character is put
    /// back and the machine suspends.
    fn after_doctype_name_state(&mut self, c: Option<char>) -> Step {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => {}
            Some('>') => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current();
                self.emit_eof();
            }
            Some(c) => {
                if !self.end_of_input && self.remaining() < 5 {
                    self.reconsume = true;
                    return Step::Suspend;
                }
                let mut word = String::new();
                word.push(c);
                word.extend(self.input.iter().skip(self.pos).take(5));
                if word.eq_ignore_ascii_case("public") {
                    self.consume_chars(5);
                    self.switch_to(State::AfterDoctypePublicKeyword);
                } else if word.eq_ignore_ascii_case("system") {
                    self.consume_chars(5);
                    self.switch_to(State::AfterDoctypeSystemKeyword);
                } else {
                    self.error(ParseErrorKind::InvalidCharacterSequenceAfterDoctypeName);
                    self.current_token_mut().set_force_quirks();
                    self.reconsume_in(State::BogusDoctype);
                }
            }
        }
        Step::Continue
    }

    fn after_doctype_public_keyword_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => {
                self.switch_to(State::BeforeDoctypePublicIdentifier);
            }
            Some('"') => {
                self.error(ParseErrorKind::MissingWhitespaceAfterDoctypePublicKeyword);
                self.current_token_mut().set_empty_public_id();
                self.switch_to(State::DoctypePublicIdentifierDoubleQuoted);
            }
            Some('\'') => {
                self.error(ParseErrorKind::MissingWhitespaceAfterDoctypePublicKeyword);
                self.current_token_mut().set_empty_public_id();
                self.switch_to(State::DoctypePublicIdentifierSingleQuoted);
            }
            Some('>') => {
                self.error(ParseErrorKind::MissingDoctypePublicIdentifier);
                self.current_token_mut().set_force_quirks();
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {
                self.error(ParseErrorKind::MissingQuoteBeforeDoctypePublicIdentifier);
                self.current_token_mut().set_force_quirks();
                self.reconsume_in(State::BogusDoctype);
            }
        }
    }

    fn before_doctype_public_identifier_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => {}
            Some('"') => {
                self.current_token_mut().set_empty_public_id();
                self.switch_to(State::DoctypePublicIdentifierDoubleQuoted);
            }
            Some('\'') => {
                self.current_token_mut().set_empty_public_id();
                self.switch_to(State::DoctypePublicIdentifierSingleQuoted);
            }
            Some('>') => {
                self.error(ParseErrorKind::MissingDoctypePublicIdentifier);
                self.current_token_mut().set_force_quirks();
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {
                self.error(ParseErrorKind::MissingQuoteBeforeDoctypePublicIdentifier);
                self.current_token_mut().set_force_quirks();
                self.reconsume_in(State::BogusDoctype);
            }
        }
    }

    fn doctype_public_identifier_quoted_state(&mut self, c: Option<char>, quote: char) {
        match c {
            Some(c) if c == quote => self.switch_to(State::AfterDoctypePublicIdentifier),
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.current_token_mut().push_to_public_id('\u{FFFD}');
            }
            Some('>') => {
                self.error(ParseErrorKind::AbruptDoctypePublicIdentifier);
                self.current_token_mut().set_force_quirks();
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current();
                self.emit_eof();
            }
            Some(c) => self.current_token_mut().push_to_public_id(c),
        }
    }

    fn after_doctype_public_identifier_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => {
                self.switch_to(State::BetweenDoctypePublicAndSystemIdentifiers);
            }
            Some('>') => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            Some('"') => {
                self.error(
                    ParseErrorKind::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.current_token_mut().set_empty_system_id();
                self.switch_to(State::DoctypeSystemIdentifierDoubleQuoted);
            }
            Some('\'') => {
                self.error(
                    ParseErrorKind::MissingWhitespaceBetweenDoctypePublicAndSystemIdentifiers,
                );
                self.current_token_mut().set_empty_system_id();
                self.switch_to(State::DoctypeSystemIdentifierSingleQuoted);
            }
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {
                self.error(ParseErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.reconsume_in(State::BogusDoctype);
            }
        }
    }

    fn between_doctype_public_and_system_identifiers_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => {}
            Some('>') => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            Some('"') => {
                self.current_token_mut().set_empty_system_id();
                self.switch_to(State::DoctypeSystemIdentifierDoubleQuoted);
            }
            Some('\'') => {
                self.current_token_mut().set_empty_system_id();
                self.switch_to(State::DoctypeSystemIdentifierSingleQuoted);
            }
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {
                self.error(ParseErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.reconsume_in(State::BogusDoctype);
            }
        }
    }

    fn after_doctype_system_keyword_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => {
                self.switch_to(State::BeforeDoctypeSystemIdentifier);
            }
            Some('"') => {
                self.error(ParseErrorKind::MissingWhitespaceAfterDoctypeSystemKeyword);
                self.current_token_mut().set_empty_system_id();
                self.switch_to(State::DoctypeSystemIdentifierDoubleQuoted);
            }
            Some('\'') => {
                self.error(ParseErrorKind::MissingWhitespaceAfterDoctypeSystemKeyword);
                self.current_token_mut().set_empty_system_id();
                self.switch_to(State::DoctypeSystemIdentifierSingleQuoted);
            }
            Some('>') => {
                self.error(ParseErrorKind::MissingDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {
                self.error(ParseErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.reconsume_in(State::BogusDoctype);
            }
        }
    }

    fn before_doctype_system_identifier_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => {}
            Some('"') => {
                self.current_token_mut().set_empty_system_id();
                self.switch_to(State::DoctypeSystemIdentifierDoubleQuoted);
            }
            Some('\'') => {
                self.current_token_mut().set_empty_system_id();
                self.switch_to(State::DoctypeSystemIdentifierSingleQuoted);
            }
            Some('>') => {
                self.error(ParseErrorKind::MissingDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {
                self.error(ParseErrorKind::MissingQuoteBeforeDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.reconsume_in(State::BogusDoctype);
            }
        }
    }

    fn doctype_system_identifier_quoted_state(&mut self, c: Option<char>, quote: char) {
        match c {
            Some(c) if c == quote => self.switch_to(State::AfterDoctypeSystemIdentifier),
            Some('\0') => {
                self.error(ParseErrorKind::UnexpectedNullCharacter);
                self.current_token_mut().push_to_system_id('\u{FFFD}');
            }
            Some('>') => {
                self.error(ParseErrorKind::AbruptDoctypeSystemIdentifier);
                self.current_token_mut().set_force_quirks();
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current();
                self.emit_eof();
            }
            Some(c) => self.current_token_mut().push_to_system_id(c),
        }
    }

    fn after_doctype_system_identifier_state(&mut self, c: Option<char>) {
        match c {
            Some('\t' | '\n' | '\x0C' | ' ') => {}
            Some('>') => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            None => {
                self.error(ParseErrorKind::EofInDoctype);
                self.current_token_mut().set_force_quirks();
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {
                // "This is an unexpected-character-after-doctype-system-identifier
                // parse error ... (This does not set the current DOCTYPE
                // token's force-quirks flag to on.)"
                self.error(ParseErrorKind::UnexpectedCharacterAfterDoctypeSystemIdentifier);
                self.reconsume_in(State::BogusDoctype);
            }
        }
    }

    fn bogus_doctype_state(&mut self, c: Option<char>) {
        match c {
            Some('>') => {
                self.switch_to(State::Data);
                self.emit_current();
            }
            Some('\0') => self.error(ParseErrorKind::UnexpectedNullCharacter),
            None => {
                self.emit_current();
                self.emit_eof();
            }
            Some(_) => {}
        }
    }

    // Character reference states.

    fn character_reference_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_alphanumeric() => {
                self.reconsume_in(State::NamedCharacterReference);
            }
            Some('#') => {
                self.temp_buffer.push('#');
                self.switch_to(State::NumericCharacterReference);
            }
            _ => {
                self.flush_char_ref();
                self.reconsume_in(self.return_state());
            }
        }
    }

    /// "Consume the maximum number of characters possible" against the
    /// entity table. Entered by reconsuming the first alphanumeric, so the
    /// position is first stepped back to include it in the candidate.
    fn named_character_reference_state(&mut self) -> Step {
        if self.reconsume {
            self.reconsume = false;
            if let Some(c) = self.current_char {
                self.pos -= 1;
                self.byte_pos -= c.len_utf8();
            }
        }
        // One extra character past the longest entity is needed for the
        // attribute next-character check.
        if !self.end_of_input && self.remaining() < MAX_ENTITY_LEN + 1 {
            self.reconsume = false;
            return Step::Suspend;
        }
        let candidate: String = self
            .input
            .iter()
            .skip(self.pos)
            .take(MAX_ENTITY_LEN + 1)
            .collect();

        match entities::longest_match(&candidate) {
            Some((name, replacement)) => {
                self.consume_chars(name.chars().count());
                self.temp_buffer.push_str(name);
                let has_semicolon = name.ends_with(';');
                let next = self.peek();

                // "If the character reference was consumed as part of an
                // attribute, and the last character matched is not a
                // U+003B SEMICOLON character (;), and the next input
                // character is either a U+003D EQUALS SIGN character (=) or
                // an ASCII alphanumeric, then ... flush code points consumed
                // as a character reference."
                let historical = self.char_ref_in_attribute()
                    && !has_semicolon
                    && next.is_some_and(|n| n == '=' || n.is_ascii_alphanumeric());
                if historical {
                    self.flush_char_ref();
                } else {
                    if !has_semicolon {
                        self.error(ParseErrorKind::MissingSemicolonAfterCharacterReference);
                    }
                    self.temp_buffer.clear();
                    self.temp_buffer.push_str(replacement);
                    self.flush_char_ref();
                }
                self.state = self.return_state();
            }
            None => {
                self.flush_char_ref();
                self.switch_to(State::AmbiguousAmpersand);
            }
        }
        Step::Continue
    }

    fn ambiguous_ampersand_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_alphanumeric() => self.emit_char_or_append_to_attribute(c),
            Some(';') => {
                self.error(ParseErrorKind::UnknownNamedCharacterReference);
                self.reconsume_in(self.return_state());
            }
            _ => self.reconsume_in(self.return_state()),
        }
    }

    fn numeric_character_reference_state(&mut self, c: Option<char>) {
        self.char_ref_code = 0;
        match c {
            Some(c @ ('x' | 'X')) => {
                self.temp_buffer.push(c);
                self.switch_to(State::HexadecimalCharacterReferenceStart);
            }
            _ => self.reconsume_in(State::DecimalCharacterReferenceStart),
        }
    }

    fn hexadecimal_character_reference_start_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_hexdigit() => {
                self.reconsume_in(State::HexadecimalCharacterReference);
            }
            _ => {
                self.error(ParseErrorKind::AbsenceOfDigitsInNumericCharacterReference);
                self.flush_char_ref();
                self.reconsume_in(self.return_state());
            }
        }
    }

    fn decimal_character_reference_start_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_digit() => self.reconsume_in(State::DecimalCharacterReference),
            _ => {
                self.error(ParseErrorKind::AbsenceOfDigitsInNumericCharacterReference);
                self.flush_char_ref();
                self.reconsume_in(self.return_state());
            }
        }
    }

    fn hexadecimal_character_reference_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_hexdigit() => self.accumulate_char_ref(c.to_digit(16), 16),
            Some(';') => self.switch_to(State::NumericCharacterReferenceEnd),
            _ => {
                self.error(ParseErrorKind::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(State::NumericCharacterReferenceEnd);
            }
        }
    }

    fn decimal_character_reference_state(&mut self, c: Option<char>) {
        match c {
            Some(c) if c.is_ascii_digit() => self.accumulate_char_ref(c.to_digit(10), 10),
            Some(';') => self.switch_to(State::NumericCharacterReferenceEnd),
            _ => {
                self.error(ParseErrorKind::MissingSemicolonAfterCharacterReference);
                self.reconsume_in(State::NumericCharacterReferenceEnd);
            }
        }
    }

    fn accumulate_char_ref(&mut self, digit: Option<u32>, base: u32) {
        let digit = digit.unwrap_or(0);
        self.char_ref_code = self
            .char_ref_code
            .saturating_mul(base)
            .saturating_add(digit)
            .min(CHAR_REF_OVERFLOW);
    }

    /// "Check the character reference code." This state neither consumes
    /// nor peeks; a reconsume pending from the digit states carries through
    /// to the return state.
    fn numeric_character_reference_end_state(&mut self) {
        let mut code = self.char_ref_code;
        if code == 0 {
            self.error(ParseErrorKind::NullCharacterReference);
            code = 0xFFFD;
        } else if code > 0x0010_FFFF {
            self.error(ParseErrorKind::CharacterReferenceOutsideUnicodeRange);
            code = 0xFFFD;
        } else if (0xD800..=0xDFFF).contains(&code) {
            self.error(ParseErrorKind::SurrogateCharacterReference);
            code = 0xFFFD;
        } else if is_noncharacter(code) {
            self.error(ParseErrorKind::NoncharacterCharacterReference);
        } else if code == 0x0D || (is_control(code) && !is_ascii_whitespace_code(code)) {
            self.error(ParseErrorKind::ControlCharacterReference);
            if let Some(mapped) = c1_replacement(code) {
                code = mapped;
            }
        }
        let replacement = char::from_u32(code).unwrap_or('\u{FFFD}');
        self.temp_buffer.clear();
        self.temp_buffer.push(replacement);
        self.flush_char_ref();
        self.state = self.return_state();
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_noncharacter(code: u32) -> bool {
    (0xFDD0..=0xFDEF).contains(&code) || matches!(code & 0xFFFF, 0xFFFE | 0xFFFF)
}

fn is_control(code: u32) -> bool {
    code <= 0x1F || (0x7F..=0x9F).contains(&code)
}

fn is_ascii_whitespace_code(code: u32) -> bool {
    matches!(code, 0x09 | 0x0A | 0x0C | 0x0D | 0x20)
}

/// The numeric reference replacements for the C1 control range.
fn c1_replacement(code: u32) -> Option<u32> {
    Some(match code {
        0x80 => 0x20AC,
        0x82 => 0x201A,
        0x83 => 0x0192,
        0x84 => 0x201E,
        0x85 => 0x2026,
        0x86 => 0x2020,
        0x87 => 0x2021,
        0x88 => 0x02C6,
        0x89 => 0x2030,
        0x8A => 0x0160,
        0x8B => 0x2039,
        0x8C => 0x0152,
        0x8E => 0x017D,
        0x91 => 0x2018,
        0x92 => 0x2019,
        0x93 => 0x201C,
        0x94 => 0x201D,
        0x95 => 0x2022,
        0x96 => 0x2013,
        0x97 => 0x2014,
        0x98 => 0x02DC,
        0x99 => 0x2122,
        0x9A => 0x0161,
        0x9B => 0x203A,
        0x9C => 0x0153,
        0x9E => 0x017E,
        0x9F => 0x0178,
        _ => return None,
    })
}
