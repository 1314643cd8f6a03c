use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

/// Operation type of a query document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Query => "query",
            OperationKind::Mutation => "mutation",
        }
    }
}

/// Error for query documents that cannot be dispatched
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Syntax error at offset {offset}: {message}")]
    Syntax { offset: usize, message: String },

    #[error("Unexpected end of document")]
    UnexpectedEnd,

    #[error("Unsupported operation type: {0}")]
    UnsupportedOperation(String),

    #[error("Only a single root field is supported")]
    MultipleRootFields,
}

/// Argument value as written in the document, before variables are bound.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Variable(String),
    Scalar(Value),
    List(Vec<InputValue>),
    Object(Vec<(String, InputValue)>),
}

impl InputValue {
    /// Substitute variables. Unbound variables resolve to `None`.
    fn bind(&self, variables: &Map<String, Value>) -> Option<Value> {
        match self {
            InputValue::Variable(name) => variables.get(name).cloned(),
            InputValue::Scalar(value) => Some(value.clone()),
            InputValue::List(items) => Some(Value::Array(
                items
                    .iter()
                    .map(|item| item.bind(variables).unwrap_or(Value::Null))
                    .collect(),
            )),
            InputValue::Object(fields) => Some(Value::Object(bind_fields(fields, variables))),
        }
    }
}

fn bind_fields(fields: &[(String, InputValue)], variables: &Map<String, Value>) -> Map<String, Value> {
    fields
        .iter()
        .filter_map(|(name, value)| value.bind(variables).map(|bound| (name.clone(), bound)))
        .collect()
}

/// The part of a query document needed for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct RootField {
    pub kind: OperationKind,
    pub operation_name: Option<String>,
    pub alias: Option<String>,
    pub name: String,
    arguments: Vec<(String, InputValue)>,
}

impl RootField {
    /// Key under which the result appears in `data`.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    /// Bind the field's arguments against `variables`.
    pub fn arguments(&self, variables: &Map<String, Value>) -> Map<String, Value> {
        bind_fields(&self.arguments, variables)
    }
}

/// Parse a query document down to its single root field.
///
/// # Errors
/// * `Syntax` / `UnexpectedEnd` - Document is not well formed
/// * `UnsupportedOperation` - Subscriptions and unknown operation types
/// * `MultipleRootFields` - More than one field at the root
pub fn parse(source: &str) -> Result<RootField, DocumentError> {
    let tokens = tokenize(source)?;
    Parser {
        tokens,
        position: 0,
        depth: 0,
    }
    .root_field()
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Name(String),
    Variable(String),
    Scalar(Value),
    Punct(char),
}

#[derive(Debug, Clone)]
struct Spanned {
    token: Token,
    offset: usize,
}

fn syntax(offset: usize, message: impl Into<String>) -> DocumentError {
    DocumentError::Syntax {
        offset,
        message: message.into(),
    }
}

fn is_name_start(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphabetic()
}

fn is_name_continue(c: u8) -> bool {
    c == b'_' || c.is_ascii_alphanumeric()
}

fn tokenize(source: &str) -> Result<Vec<Spanned>, DocumentError> {
    let bytes = source.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let c = bytes[i];
        let start = i;

        match c {
            b' ' | b'\t' | b'\n' | b'\r' | b',' => i += 1,
            b'#' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'{' | b'}' | b'(' | b')' | b'[' | b']' | b':' | b'=' | b'!' | b'@' => {
                tokens.push(Spanned {
                    token: Token::Punct(c as char),
                    offset: start,
                });
                i += 1;
            }
            b'$' => {
                i += 1;
                let name_start = i;
                if i >= bytes.len() || !is_name_start(bytes[i]) {
                    return Err(syntax(start, "expected variable name after '$'"));
                }
                while i < bytes.len() && is_name_continue(bytes[i]) {
                    i += 1;
                }
                tokens.push(Spanned {
                    token: Token::Variable(source[name_start..i].to_string()),
                    offset: start,
                });
            }
            b'"' => {
                if source[i..].starts_with("\"\"\"") {
                    return Err(syntax(start, "block strings are not supported"));
                }
                i += 1;
                loop {
                    match bytes.get(i) {
                        None | Some(b'\n') => return Err(syntax(start, "unterminated string")),
                        Some(b'\\') => i += 2,
                        Some(b'"') => {
                            i += 1;
                            break;
                        }
                        Some(_) => i += 1,
                    }
                }
                let value: String = serde_json::from_str(&source[start..i])
                    .map_err(|e| syntax(start, format!("invalid string literal: {}", e)))?;
                tokens.push(Spanned {
                    token: Token::Scalar(Value::String(value)),
                    offset: start,
                });
            }
            b'-' | b'0'..=b'9' => {
                i += 1;
                while i < bytes.len()
                    && (bytes[i].is_ascii_digit() || matches!(bytes[i], b'.' | b'e' | b'E' | b'+' | b'-'))
                {
                    i += 1;
                }
                let value: Value = serde_json::from_str(&source[start..i])
                    .map_err(|_| syntax(start, "invalid number literal"))?;
                tokens.push(Spanned {
                    token: Token::Scalar(value),
                    offset: start,
                });
            }
            c if is_name_start(c) => {
                while i < bytes.len() && is_name_continue(bytes[i]) {
                    i += 1;
                }
                tokens.push(Spanned {
                    token: Token::Name(source[start..i].to_string()),
                    offset: start,
                });
            }
            _ if source[i..].starts_with('\u{feff}') => i += '\u{feff}'.len_utf8(),
            _ => {
                let unexpected = source[i..].chars().next().unwrap_or('?');
                return Err(syntax(start, format!("unexpected character '{}'", unexpected)));
            }
        }
    }

    Ok(tokens)
}

/// Deepest list or object nesting accepted in an argument value.
const MAX_VALUE_DEPTH: usize = 32;

struct Parser {
    tokens: Vec<Spanned>,
    position: usize,
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position).map(|spanned| &spanned.token)
    }

    fn offset(&self) -> usize {
        self.tokens
            .get(self.position)
            .map(|spanned| spanned.offset)
            .unwrap_or_default()
    }

    fn next(&mut self) -> Result<Token, DocumentError> {
        let token = self
            .tokens
            .get(self.position)
            .map(|spanned| spanned.token.clone())
            .ok_or(DocumentError::UnexpectedEnd)?;
        self.position += 1;
        Ok(token)
    }

    fn at_punct(&self, expected: char) -> bool {
        matches!(self.peek(), Some(Token::Punct(c)) if *c == expected)
    }

    fn expect_punct(&mut self, expected: char) -> Result<(), DocumentError> {
        let offset = self.offset();
        match self.next()? {
            Token::Punct(c) if c == expected => Ok(()),
            _ => Err(syntax(offset, format!("expected '{}'", expected))),
        }
    }

    fn expect_name(&mut self) -> Result<String, DocumentError> {
        let offset = self.offset();
        match self.next()? {
            Token::Name(name) => Ok(name),
            _ => Err(syntax(offset, "expected a name")),
        }
    }

    /// Skip a balanced `open ... close` group starting at the current token.
    fn skip_group(&mut self, open: char, close: char) -> Result<(), DocumentError> {
        self.expect_punct(open)?;
        let mut depth = 1;
        while depth > 0 {
            match self.next()? {
                Token::Punct(c) if c == open => depth += 1,
                Token::Punct(c) if c == close => depth -= 1,
                _ => {}
            }
        }
        Ok(())
    }

    fn root_field(mut self) -> Result<RootField, DocumentError> {
        let mut kind = OperationKind::Query;
        let mut operation_name = None;

        if let Some(Token::Name(keyword)) = self.peek() {
            kind = match keyword.as_str() {
                "query" => OperationKind::Query,
                "mutation" => OperationKind::Mutation,
                other => return Err(DocumentError::UnsupportedOperation(other.to_string())),
            };
            self.position += 1;

            if let Some(Token::Name(name)) = self.peek() {
                operation_name = Some(name.clone());
                self.position += 1;
            }
            if self.at_punct('(') {
                self.skip_group('(', ')')?;
            }
        }

        self.expect_punct('{')?;

        let first = self.expect_name()?;
        let (alias, name) = if self.at_punct(':') {
            self.position += 1;
            (Some(first), self.expect_name()?)
        } else {
            (None, first)
        };

        let arguments = if self.at_punct('(') {
            self.arguments()?
        } else {
            Vec::new()
        };

        if self.at_punct('@') {
            return Err(syntax(self.offset(), "directives are not supported"));
        }
        if self.at_punct('{') {
            self.skip_group('{', '}')?;
        }

        if !self.at_punct('}') {
            return match self.peek() {
                Some(Token::Name(_)) => Err(DocumentError::MultipleRootFields),
                Some(_) => Err(syntax(self.offset(), "expected '}'")),
                None => Err(DocumentError::UnexpectedEnd),
            };
        }
        self.position += 1;

        if self.peek().is_some() {
            return Err(syntax(self.offset(), "unexpected input after operation"));
        }

        Ok(RootField {
            kind,
            operation_name,
            alias,
            name,
            arguments,
        })
    }

    fn arguments(&mut self) -> Result<Vec<(String, InputValue)>, DocumentError> {
        self.expect_punct('(')?;
        let mut arguments = Vec::new();
        while !self.at_punct(')') {
            let name = self.expect_name()?;
            self.expect_punct(':')?;
            arguments.push((name, self.value()?));
        }
        self.position += 1;
        Ok(arguments)
    }

    fn value(&mut self) -> Result<InputValue, DocumentError> {
        let offset = self.offset();
        match self.next()? {
            Token::Punct(open @ ('[' | '{')) => {
                if self.depth >= MAX_VALUE_DEPTH {
                    return Err(syntax(offset, "nesting too deep"));
                }
                self.depth += 1;
                let value = self.composite(open);
                self.depth -= 1;
                value
            }
            Token::Variable(name) => Ok(InputValue::Variable(name)),
            Token::Scalar(value) => Ok(InputValue::Scalar(value)),
            Token::Name(name) => Ok(InputValue::Scalar(match name.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                "null" => Value::Null,
                _ => Value::String(name),
            })),
            Token::Punct(c) => Err(syntax(offset, format!("unexpected '{}'", c))),
        }
    }

    /// Body of a list or input object whose opening token was just consumed.
    fn composite(&mut self, open: char) -> Result<InputValue, DocumentError> {
        if open == '[' {
            let mut items = Vec::new();
            while !self.at_punct(']') {
                items.push(self.value()?);
            }
            self.position += 1;
            return Ok(InputValue::List(items));
        }

        let mut fields = Vec::new();
        while !self.at_punct('}') {
            let name = self.expect_name()?;
            self.expect_punct(':')?;
            fields.push((name, self.value()?));
        }
        self.position += 1;
        Ok(InputValue::Object(fields))
    }
}
