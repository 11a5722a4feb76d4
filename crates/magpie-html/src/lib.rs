//! A WHATWG-style HTML parser.
//!
//! The pipeline follows [§ 13.2 Parsing HTML documents](https://html.spec.whatwg.org/multipage/parsing.html):
//! input is normalized, tokenized, and fed through the tree construction
//! stage into a [`DomTree`]. Parsing never fails; malformed input is
//! repaired the way the spec describes and every deviation is recorded as a
//! [`ParseError`] with the byte offset where it was noticed.
//!
//! ```
//! let tree = magpie_html::parse("<!DOCTYPE html><p>Hello");
//! let body = tree.body().unwrap();
//! assert_eq!(tree.tag_name(tree.first_child(body).unwrap()), Some("p"));
//! ```
//!
//! Documents that arrive in pieces go through [`Parser`]; any chunking of
//! the same input produces the same tree as [`parse`].

pub mod errors;
pub mod serializer;
pub mod tokenizer;
pub mod tree_builder;

pub use errors::{ParseError, ParseErrorKind};
pub use magpie_dom::{DomTree, NodeData, NodeId, QuirksMode};
pub use serializer::{print_tree, serialize};
pub use tokenizer::{Token, Tokenizer};
pub use tree_builder::TreeBuilder;

/// Parse a complete document.
#[must_use]
pub fn parse(input: &str) -> DomTree {
    parse_with_errors(input).0
}

/// Parse a complete document, keeping the parse errors.
#[must_use]
pub fn parse_with_errors(input: &str) -> (DomTree, Vec<ParseError>) {
    let mut parser = Parser::new();
    parser.feed(input);
    parser.finish_with_errors()
}

/// An incremental parser.
///
/// Feed the document in arbitrary chunks and call [`Parser::finish`] once
/// the input is complete. The tokenizer suspends at chunk boundaries that
/// split a construct (a tag, a character reference, a `<!DOCTYPE` header)
/// and resumes when the rest arrives, so chunking never changes the result.
pub struct Parser {
    tokenizer: Tokenizer,
    builder: TreeBuilder,
}

impl Parser {
    #[must_use]
    pub fn new() -> Self {
        Parser {
            tokenizer: Tokenizer::new(),
            builder: TreeBuilder::new(),
        }
    }

    /// Install a callback invoked with each `<script>` element when its end
    /// tag is seen. The callback cannot influence parsing.
    pub fn set_script_hook(&mut self, hook: Box<dyn FnMut(NodeId, &DomTree)>) {
        self.builder.set_script_hook(hook);
    }

    /// Feed the next chunk of input.
    pub fn feed(&mut self, chunk: &str) {
        self.tokenizer.feed(chunk);
        self.pump();
    }

    /// Declare the input complete and return the document.
    #[must_use]
    pub fn finish(self) -> DomTree {
        self.finish_with_errors().0
    }

    /// Declare the input complete and return the document together with the
    /// parse errors, in input order.
    #[must_use]
    pub fn finish_with_errors(mut self) -> (DomTree, Vec<ParseError>) {
        self.tokenizer.finish();
        self.pump();
        let mut errors = self.tokenizer.take_errors();
        let (tree, tree_errors) = self.builder.finish();
        errors.extend(tree_errors);
        errors.sort_by_key(|e| e.position);
        (tree, errors)
    }

    /// Drain every token the tokenizer can produce from the input so far.
    fn pump(&mut self) {
        while let Some(token) = self.tokenizer.next_token() {
            let position = self.tokenizer.last_token_offset();
            if let Some(state) = self.builder.process(&token, position) {
                // A start tag switched the tokenizer into a raw text family
                // state (script, style, textarea, plaintext and friends).
                self.tokenizer.set_state(state);
            }
            if matches!(token, Token::EndOfFile) {
                break;
            }
        }
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}
