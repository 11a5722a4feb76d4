//! Tokenizer output tokens.
//!
//! [§ 13.2.5 Tokenization](https://html.spec.whatwg.org/multipage/parsing.html#tokenization)
//!
//! "The output of the tokenization step is a series of zero or more of the
//! following tokens: DOCTYPE, start tag, end tag, comment, character,
//! end-of-file."

use std::fmt;

/// A name/value pair on a tag token, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// The attribute name, lowercased during tokenization.
    pub name: String,
    /// The attribute value (empty when the attribute had no `=`).
    pub value: String,
}

/// A token emitted by the tokenizer.
///
/// Tag and DOCTYPE tokens are built up incrementally by the state machine
/// through the mutation methods below; those methods panic when called on
/// the wrong variant, which indicates a bug in the state machine rather
/// than bad input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// "DOCTYPE tokens have a name, a public identifier, a system identifier,
    /// and a force-quirks flag."
    Doctype {
        /// The doctype name, `None` when missing.
        name: Option<String>,
        /// The public identifier, `None` when missing.
        public_id: Option<String>,
        /// The system identifier, `None` when missing.
        system_id: Option<String>,
        /// "The force-quirks flag must be set to off" initially.
        force_quirks: bool,
    },
    /// "Start and end tag tokens have a tag name, a self-closing flag,
    /// and a list of attributes."
    StartTag {
        /// The tag name, lowercased.
        name: String,
        /// Whether the tag ended with `/>`.
        self_closing: bool,
        /// Attributes in source order; duplicates already dropped.
        attributes: Vec<Attribute>,
    },
    /// An end tag. Attributes and self-closing are recorded (the tokenizer
    /// reports parse errors for them) but tree construction ignores both.
    EndTag {
        /// The tag name, lowercased.
        name: String,
        /// Whether the tag ended with `/>`.
        self_closing: bool,
        /// Attributes in source order.
        attributes: Vec<Attribute>,
    },
    /// "Comment and character tokens have data."
    Comment(String),
    /// A single character of data.
    Character(char),
    /// The end of the input stream.
    EndOfFile,
}

impl Token {
    /// A DOCTYPE token with everything missing and force-quirks off.
    #[must_use]
    pub const fn new_doctype() -> Self {
        Token::Doctype {
            name: None,
            public_id: None,
            system_id: None,
            force_quirks: false,
        }
    }

    /// A start tag token with an empty name.
    #[must_use]
    pub const fn new_start_tag() -> Self {
        Token::StartTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// An end tag token with an empty name.
    #[must_use]
    pub const fn new_end_tag() -> Self {
        Token::EndTag {
            name: String::new(),
            self_closing: false,
            attributes: Vec::new(),
        }
    }

    /// The tag name, for either tag variant.
    ///
    /// # Panics
    /// Panics when the token is not a tag.
    #[must_use]
    pub fn tag_name(&self) -> &str {
        match self {
            Token::StartTag { name, .. } | Token::EndTag { name, .. } => name,
            _ => panic!("tag_name called on non-tag token"),
        }
    }

    /// Whether this is a start tag.
    #[must_use]
    pub const fn is_start_tag(&self) -> bool {
        matches!(self, Token::StartTag { .. })
    }

    /// Whether this is an end tag.
    #[must_use]
    pub const fn is_end_tag(&self) -> bool {
        matches!(self, Token::EndTag { .. })
    }

    /// Append a character to the tag name.
    ///
    /// # Panics
    /// Panics when the token is not a tag.
    pub fn push_to_tag_name(&mut self, c: char) {
        match self {
            Token::StartTag { name, .. } | Token::EndTag { name, .. } => name.push(c),
            _ => panic!("push_to_tag_name called on non-tag token"),
        }
    }

    /// Set the self-closing flag on a tag.
    ///
    /// # Panics
    /// Panics when the token is not a tag.
    pub fn set_self_closing(&mut self) {
        match self {
            Token::StartTag { self_closing, .. } | Token::EndTag { self_closing, .. } => {
                *self_closing = true;
            }
            _ => panic!("set_self_closing called on non-tag token"),
        }
    }

    /// Start a fresh attribute on a tag.
    ///
    /// # Panics
    /// Panics when the token is not a tag.
    pub fn start_new_attribute(&mut self) {
        match self {
            Token::StartTag { attributes, .. } | Token::EndTag { attributes, .. } => {
                attributes.push(Attribute {
                    name: String::new(),
                    value: String::new(),
                });
            }
            _ => panic!("start_new_attribute called on non-tag token"),
        }
    }

    /// Append a character to the name of the attribute being built.
    ///
    /// # Panics
    /// Panics when the token is not a tag or has no attribute in progress.
    pub fn push_to_attribute_name(&mut self, c: char) {
        self.current_attribute().name.push(c);
    }

    /// Append a character to the value of the attribute being built.
    ///
    /// # Panics
    /// Panics when the token is not a tag or has no attribute in progress.
    pub fn push_to_attribute_value(&mut self, c: char) {
        self.current_attribute().value.push(c);
    }

    /// Append a string to the value of the attribute being built.
    ///
    /// # Panics
    /// Panics when the token is not a tag or has no attribute in progress.
    pub fn push_str_to_attribute_value(&mut self, s: &str) {
        self.current_attribute().value.push_str(s);
    }

    /// Whether the attribute being built duplicates an earlier name.
    ///
    /// # Panics
    /// Panics when the token is not a tag.
    #[must_use]
    pub fn current_attribute_is_duplicate(&self) -> bool {
        match self {
            Token::StartTag { attributes, .. } | Token::EndTag { attributes, .. } => {
                match attributes.split_last() {
                    Some((last, rest)) => rest.iter().any(|a| a.name == last.name),
                    None => false,
                }
            }
            _ => panic!("current_attribute_is_duplicate called on non-tag token"),
        }
    }

    /// Drop the attribute being built (the duplicate-attribute rule).
    ///
    /// # Panics
    /// Panics when the token is not a tag.
    pub fn drop_current_attribute(&mut self) {
        match self {
            Token::StartTag { attributes, .. } | Token::EndTag { attributes, .. } => {
                let _ = attributes.pop();
            }
            _ => panic!("drop_current_attribute called on non-tag token"),
        }
    }

    fn current_attribute(&mut self) -> &mut Attribute {
        match self {
            Token::StartTag { attributes, .. } | Token::EndTag { attributes, .. } => attributes
                .last_mut()
                .expect("no attribute in progress on tag token"),
            _ => panic!("current_attribute called on non-tag token"),
        }
    }

    /// Append a character to the DOCTYPE name, creating it if missing.
    ///
    /// # Panics
    /// Panics when the token is not a DOCTYPE.
    pub fn push_to_doctype_name(&mut self, c: char) {
        match self {
            Token::Doctype { name, .. } => name.get_or_insert_with(String::new).push(c),
            _ => panic!("push_to_doctype_name called on non-DOCTYPE token"),
        }
    }

    /// Append a character to the DOCTYPE public identifier, creating it if
    /// missing.
    ///
    /// # Panics
    /// Panics when the token is not a DOCTYPE.
    pub fn push_to_public_id(&mut self, c: char) {
        match self {
            Token::Doctype { public_id, .. } => public_id.get_or_insert_with(String::new).push(c),
            _ => panic!("push_to_public_id called on non-DOCTYPE token"),
        }
    }

    /// Append a character to the DOCTYPE system identifier, creating it if
    /// missing.
    ///
    /// # Panics
    /// Panics when the token is not a DOCTYPE.
    pub fn push_to_system_id(&mut self, c: char) {
        match self {
            Token::Doctype { system_id, .. } => system_id.get_or_insert_with(String::new).push(c),
            _ => panic!("push_to_system_id called on non-DOCTYPE token"),
        }
    }

    /// Set the DOCTYPE public identifier to the empty string.
    ///
    /// # Panics
    /// Panics when the token is not a DOCTYPE.
    pub fn set_empty_public_id(&mut self) {
        match self {
            Token::Doctype { public_id, .. } => *public_id = Some(String::new()),
            _ => panic!("set_empty_public_id called on non-DOCTYPE token"),
        }
    }

    /// Set the DOCTYPE system identifier to the empty string.
    ///
    /// # Panics
    /// Panics when the token is not a DOCTYPE.
    pub fn set_empty_system_id(&mut self) {
        match self {
            Token::Doctype { system_id, .. } => *system_id = Some(String::new()),
            _ => panic!("set_empty_system_id called on non-DOCTYPE token"),
        }
    }

    /// Set the force-quirks flag.
    ///
    /// # Panics
    /// Panics when the token is not a DOCTYPE.
    pub fn set_force_quirks(&mut self) {
        match self {
            Token::Doctype { force_quirks, .. } => *force_quirks = true,
            _ => panic!("set_force_quirks called on non-DOCTYPE token"),
        }
    }

    /// Append a character to the comment data.
    ///
    /// # Panics
    /// Panics when the token is not a comment.
    pub fn push_to_comment(&mut self, c: char) {
        match self {
            Token::Comment(data) => data.push(c),
            _ => panic!("push_to_comment called on non-comment token"),
        }
    }

    /// Append a string to the comment data.
    ///
    /// # Panics
    /// Panics when the token is not a comment.
    pub fn push_str_to_comment(&mut self, s: &str) {
        match self {
            Token::Comment(data) => data.push_str(s),
            _ => panic!("push_str_to_comment called on non-comment token"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Doctype { name, .. } => {
                write!(f, "<!DOCTYPE {}>", name.as_deref().unwrap_or(""))
            }
            Token::StartTag {
                name,
                self_closing,
                attributes,
            } => {
                write!(f, "<{name}")?;
                for attr in attributes {
                    write!(f, " {}=\"{}\"", attr.name, attr.value)?;
                }
                if *self_closing {
                    write!(f, "/")?;
                }
                write!(f, ">")
            }
            Token::EndTag { name, .. } => write!(f, "</{name}>"),
            Token::Comment(data) => write!(f, "<!--{data}-->"),
            Token::Character(c) => write!(f, "{c}"),
            Token::EndOfFile => write!(f, "EOF"),
        }
    }
}
