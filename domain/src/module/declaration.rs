//! Module declaration parser
//!
//! Reads just enough of a `module-info.java` compilation unit to learn the
//! module's name and its `requires` directives. Everything else (exports,
//! opens, uses, provides) is skipped up to its terminating `;`.
//!
//! ```text
//! import java.lang.annotation.*;        // skipped
//! @Deprecated(since = "2")              // skipped
//! open module com.example.app {         // name: com.example.app
//!     requires transitive com.example.api;
//!     requires static lombok;           // excluded from resolution
//!     requires org.junit.jupiter /*5.10.0*/;
//!     exports com.example.app;
//! }
//! ```

use std::collections::BTreeSet;

use thiserror::Error;

use super::entities::RequiresModifier;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DeclarationError {
    #[error("No module declaration found")]
    MissingModule,

    #[error("Unexpected end of declaration, expected {0}")]
    UnexpectedEnd(String),

    #[error("Expected {expected}, found {found:?}")]
    UnexpectedToken { expected: String, found: String },

    #[error("Invalid module name: {0:?}")]
    InvalidName(String),
}

/// A single `requires` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub name: String,
    pub modifiers: BTreeSet<RequiresModifier>,
    /// Version noted in a trailing block comment, `requires foo /*1.2*/;`
    pub version: Option<String>,
}

impl Requirement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            modifiers: BTreeSet::new(),
            version: None,
        }
    }

    pub fn with_modifier(mut self, modifier: RequiresModifier) -> Self {
        self.modifiers.insert(modifier);
        self
    }

    /// Whether this requirement must be present at build time
    pub fn needs_resolution(&self) -> bool {
        RequiresModifier::needs_resolution(&self.modifiers)
    }
}

/// Parsed module declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDeclaration {
    pub name: String,
    pub open: bool,
    pub requires: Vec<Requirement>,
}

impl ModuleDeclaration {
    pub fn parse(source: &str) -> Result<Self, DeclarationError> {
        Parser::new(tokenize(source)).declaration()
    }

    /// Names of requirements that need resolution, in declaration order
    pub fn required_names(&self) -> impl Iterator<Item = &str> {
        self.requires
            .iter()
            .filter(|r| r.needs_resolution())
            .map(|r| r.name.as_str())
    }
}

/// Check a dotted module name: `segment(.segment)*` with identifier segments
pub fn is_valid_module_name(name: &str) -> bool {
    !name.is_empty()
        && name.split('.').all(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) if first.is_alphabetic() || first == '_' || first == '$' => {
                    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
                }
                _ => false,
            }
        })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Word(String),
    Comment(String),
    Literal,
    Symbol(char),
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Word(w) => w.clone(),
            Token::Comment(c) => format!("/*{c}*/"),
            Token::Literal => "string literal".to_string(),
            Token::Symbol(c) => c.to_string(),
        }
    }
}

fn tokenize(source: &str) -> Vec<Token> {
    let chars: Vec<char> = source.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            i += 1;
        } else if c == '/' && chars.get(i + 1) == Some(&'/') {
            while i < chars.len() && chars[i] != '\n' {
                i += 1;
            }
        } else if c == '/' && chars.get(i + 1) == Some(&'*') {
            let start = i + 2;
            let mut end = start;
            while end < chars.len() && !(chars[end] == '*' && chars.get(end + 1) == Some(&'/')) {
                end += 1;
            }
            let text: String = chars[start..end.min(chars.len())].iter().collect();
            tokens.push(Token::Comment(text.trim().trim_matches('*').trim().to_string()));
            i = end + 2;
        } else if c == '"' {
            i += 1;
            while i < chars.len() && chars[i] != '"' {
                i += if chars[i] == '\\' { 2 } else { 1 };
            }
            tokens.push(Token::Literal);
            i += 1;
        } else if c.is_alphanumeric() || c == '_' || c == '$' {
            let start = i;
            while i < chars.len() && (chars[i].is_alphanumeric() || matches!(chars[i], '_' | '$' | '.')) {
                i += 1;
            }
            tokens.push(Token::Word(chars[start..i].iter().collect()));
        } else {
            tokens.push(Token::Symbol(c));
            i += 1;
        }
    }
    tokens
}

struct Parser {
    tokens: Vec<Token>,
    cursor: usize,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, cursor: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.cursor)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.cursor).cloned();
        self.cursor += 1;
        token
    }

    /// Next token that is not a comment
    fn next_significant(&mut self) -> Option<Token> {
        loop {
            match self.next()? {
                Token::Comment(_) => continue,
                token => return Some(token),
            }
        }
    }

    fn expect_word(&mut self, expected: &str) -> Result<String, DeclarationError> {
        match self.next_significant() {
            Some(Token::Word(word)) => Ok(word),
            Some(other) => Err(DeclarationError::UnexpectedToken {
                expected: expected.to_string(),
                found: other.describe(),
            }),
            None => Err(DeclarationError::UnexpectedEnd(expected.to_string())),
        }
    }

    fn expect_symbol(&mut self, symbol: char) -> Result<(), DeclarationError> {
        match self.next_significant() {
            Some(Token::Symbol(c)) if c == symbol => Ok(()),
            Some(other) => Err(DeclarationError::UnexpectedToken {
                expected: format!("'{symbol}'"),
                found: other.describe(),
            }),
            None => Err(DeclarationError::UnexpectedEnd(format!("'{symbol}'"))),
        }
    }

    fn skip_past(&mut self, symbol: char) -> Result<(), DeclarationError> {
        loop {
            match self.next() {
                Some(Token::Symbol(c)) if c == symbol => return Ok(()),
                Some(_) => continue,
                None => return Err(DeclarationError::UnexpectedEnd(format!("'{symbol}'"))),
            }
        }
    }

    fn skip_annotation(&mut self) -> Result<(), DeclarationError> {
        self.expect_word("annotation name")?;
        if self.peek() != Some(&Token::Symbol('(')) {
            return Ok(());
        }
        let mut depth = 0usize;
        loop {
            match self.next() {
                Some(Token::Symbol('(')) => depth += 1,
                Some(Token::Symbol(')')) => {
                    depth -= 1;
                    if depth == 0 {
                        return Ok(());
                    }
                }
                Some(_) => {}
                None => return Err(DeclarationError::UnexpectedEnd("')'".to_string())),
            }
        }
    }

    fn declaration(&mut self) -> Result<ModuleDeclaration, DeclarationError> {
        let mut open = false;
        loop {
            match self.next_significant() {
                None => return Err(DeclarationError::MissingModule),
                Some(Token::Symbol('@')) => self.skip_annotation()?,
                Some(Token::Word(word)) if word == "import" => self.skip_past(';')?,
                Some(Token::Word(word)) if word == "open" => open = true,
                Some(Token::Word(word)) if word == "module" => break,
                Some(other) => {
                    return Err(DeclarationError::UnexpectedToken {
                        expected: "'module'".to_string(),
                        found: other.describe(),
                    });
                }
            }
        }

        let name = self.expect_word("module name")?;
        if !is_valid_module_name(&name) {
            return Err(DeclarationError::InvalidName(name));
        }
        self.expect_symbol('{')?;

        let mut requires = Vec::new();
        loop {
            match self.next_significant() {
                Some(Token::Symbol('}')) => break,
                Some(Token::Word(word)) if word == "requires" => requires.push(self.requires()?),
                Some(Token::Symbol(';')) => {}
                Some(_) => self.skip_past(';')?,
                None => return Err(DeclarationError::UnexpectedEnd("'}'".to_string())),
            }
        }

        Ok(ModuleDeclaration {
            name,
            open,
            requires,
        })
    }

    fn requires(&mut self) -> Result<Requirement, DeclarationError> {
        let mut modifiers = BTreeSet::new();
        let name = loop {
            let word = self.expect_word("required module name")?;
            match word.as_str() {
                "transitive" if self.next_is_word() => modifiers.insert(RequiresModifier::Transitive),
                "static" if self.next_is_word() => modifiers.insert(RequiresModifier::Static),
                _ => break word,
            };
        };
        if !is_valid_module_name(&name) {
            return Err(DeclarationError::InvalidName(name));
        }

        let mut version = None;
        loop {
            match self.next() {
                Some(Token::Comment(text)) => {
                    if version.is_none() && !text.is_empty() {
                        version = Some(text);
                    }
                }
                Some(Token::Symbol(';')) => break,
                Some(other) => {
                    return Err(DeclarationError::UnexpectedToken {
                        expected: "';'".to_string(),
                        found: other.describe(),
                    });
                }
                None => return Err(DeclarationError::UnexpectedEnd("';'".to_string())),
            }
        }

        Ok(Requirement {
            name,
            modifiers,
            version,
        })
    }

    /// `requires transitive;` names a module called `transitive`
    fn next_is_word(&self) -> bool {
        self.tokens[self.cursor..]
            .iter()
            .find(|t| !matches!(t, Token::Comment(_)))
            .is_some_and(|t| matches!(t, Token::Word(_)))
    }
}
