//! A line-oriented fixture grammar for pipeline tests.
//!
//! One declaration per line; blank lines and `#` comments are skipped.
//!
//! ```text
//! import A.B                        unit import
//! namespace Shop                    starts a namespace block
//! using Shop.Common                 namespace import
//! entity Order identity guid        also `: Base`, `abstract`
//! event Placed : Base               event of the last entity
//! value Money : decimal             also `external`, `abstract`, `key prop`
//! prop total Money? alias Sum       property of the last event or value
//! enum Status
//! api Orders -> void                web-API root
//! command Place arg amount Money -> void
//! query Recent -> Money*
//! filter status Status?             filter of the last query or path
//! path ById arg key guid -> Money   nested path; members follow until `end`
//! end
//! ```
//!
//! Type suffixes: `?` zero-or-one, `*` zero-or-more, `+` one-or-more,
//! `[a..b]` explicit range.

use dml_ir::{
    AtomSyntax, Cardinality, EntitySyntax, EventSyntax, ExternalEnumSyntax, Identifier,
    NamespaceMemberSyntax, NamespaceSyntax, OperationSyntax, PropertySyntax, QualifiedIdentifier,
    SyntaxTree, TypeReferenceSyntax, ValueSyntax, WebApiCommandSyntax, WebApiMemberSyntax,
    WebApiPathSyntax, WebApiQuerySyntax, WebApiSyntax,
};
use dmlc::{ParseError, SourceInput, SourceParser};

/// Parser for the fixture grammar.
pub struct LineParser;

impl SourceParser for LineParser {
    fn parse(&self, text: &str, _source_name: Option<&str>) -> Result<SyntaxTree, Vec<ParseError>> {
        let mut state = State::default();
        let mut errors = Vec::new();
        for (index, line) in text.lines().enumerate() {
            let words: Vec<&str> = line.split_whitespace().collect();
            if words.is_empty() || words[0].starts_with('#') {
                continue;
            }
            if let Err(message) = state.apply(&words) {
                let column = line.find(words[0]).map_or(1, |offset| offset + 1);
                errors.push(
                    ParseError::new(message)
                        .at(u32::try_from(index + 1).unwrap(), u32::try_from(column).unwrap()),
                );
            }
        }
        if errors.is_empty() {
            Ok(state.finish())
        } else {
            Err(errors)
        }
    }
}

/// Build named inputs from `(name, text)` pairs.
pub fn sources(units: &[(&str, &str)]) -> Vec<SourceInput> {
    units
        .iter()
        .map(|(name, text)| SourceInput::named(*text, *name))
        .collect()
}

pub fn qi(text: &str) -> QualifiedIdentifier {
    QualifiedIdentifier::new(text).unwrap()
}

#[derive(Clone, Copy, Default, PartialEq, Eq)]
enum Last {
    #[default]
    Nothing,
    Event,
    Value,
}

#[derive(Default)]
struct State {
    imports: Vec<QualifiedIdentifier>,
    namespaces: Vec<NamespaceSyntax>,
    current: Option<NamespaceSyntax>,
    last: Last,
    in_path: bool,
}

fn ident(word: Option<&&str>) -> Result<Identifier, String> {
    let word = word.ok_or("missing name")?;
    Identifier::new(word).map_err(|error| error.to_string())
}

fn name(word: Option<&&str>) -> Result<QualifiedIdentifier, String> {
    let word = word.ok_or("missing name")?;
    QualifiedIdentifier::new(word).map_err(|error| error.to_string())
}

fn ty(word: Option<&&str>) -> Result<TypeReferenceSyntax, String> {
    let word = *word.ok_or("missing type")?;
    let (base, cardinality) = if let Some(base) = word.strip_suffix('?') {
        (base, Cardinality::ZERO_OR_ONE)
    } else if let Some(base) = word.strip_suffix('*') {
        (base, Cardinality::ZERO_OR_MORE)
    } else if let Some(base) = word.strip_suffix('+') {
        (base, Cardinality::ONE_OR_MORE)
    } else if let Some((base, range)) = word.strip_suffix(']').and_then(|w| w.split_once('[')) {
        let (minimum, maximum) = range.split_once("..").ok_or("bad range")?;
        let minimum = minimum.parse().map_err(|_| "bad minimum")?;
        let maximum = maximum.parse().map_err(|_| "bad maximum")?;
        let cardinality = Cardinality::new(minimum, Some(maximum)).map_err(|error| error.to_string())?;
        (base, cardinality)
    } else {
        (word, Cardinality::ONE)
    };
    Ok(TypeReferenceSyntax::new(name(Some(&base))?, cardinality))
}

/// `Name [arg n T]... -> T`
fn operation(words: &[&str]) -> Result<OperationSyntax, String> {
    let operation_name = ident(words.get(1))?;
    let mut arguments = Vec::new();
    let mut result = None;
    let mut i = 2;
    while i < words.len() {
        match words[i] {
            "arg" => {
                arguments.push(AtomSyntax::new(ident(words.get(i + 1))?, ty(words.get(i + 2))?));
                i += 3;
            }
            "->" => {
                result = Some(ty(words.get(i + 1))?);
                i += 2;
            }
            other => return Err(format!("unexpected '{other}'")),
        }
    }
    let mut operation = OperationSyntax::new(operation_name, result.ok_or("missing result")?);
    operation.arguments = arguments;
    Ok(operation)
}

impl State {
    fn namespace(&mut self) -> Result<&mut NamespaceSyntax, String> {
        self.current
            .as_mut()
            .ok_or_else(|| "declaration outside a namespace".to_owned())
    }

    fn container(&mut self) -> Result<&mut WebApiPathSyntax, String> {
        let in_path = self.in_path;
        let Some(NamespaceMemberSyntax::WebApi(api)) = self.namespace()?.members.last_mut() else {
            return Err("operation outside an api".to_owned());
        };
        if !in_path {
            return Ok(&mut api.path);
        }
        match api.path.members.last_mut() {
            Some(WebApiMemberSyntax::Path(path)) => Ok(path),
            _ => Err("path was closed".to_owned()),
        }
    }

    fn apply(&mut self, words: &[&str]) -> Result<(), String> {
        match words[0] {
            "import" => self.imports.push(name(words.get(1))?),
            "namespace" => {
                if let Some(done) = self.current.take() {
                    self.namespaces.push(done);
                }
                self.current = Some(NamespaceSyntax::new(name(words.get(1))?));
                self.last = Last::Nothing;
                self.in_path = false;
            }
            "using" => {
                let import = name(words.get(1))?;
                self.namespace()?.imports.push(import);
            }
            "entity" => {
                let mut entity = EntitySyntax::new(ident(words.get(1))?);
                let mut i = 2;
                while i < words.len() {
                    match words[i] {
                        "identity" => entity.identity_type = Some(ty(words.get(i + 1))?),
                        ":" => entity.base = Some(ty(words.get(i + 1))?),
                        "abstract" => {
                            entity.is_abstract = true;
                            i -= 1;
                        }
                        other => return Err(format!("unexpected '{other}'")),
                    }
                    i += 2;
                }
                self.namespace()?.members.push(entity.into());
                self.last = Last::Nothing;
            }
            "event" => {
                let mut event = EventSyntax::new(ident(words.get(1))?);
                if words.get(2) == Some(&":") {
                    event.base = Some(ty(words.get(3))?);
                }
                match self.namespace()?.members.last_mut() {
                    Some(NamespaceMemberSyntax::Entity(entity)) => entity.events.push(event),
                    _ => return Err("event outside an entity".to_owned()),
                }
                self.last = Last::Event;
            }
            "value" => {
                let mut value = ValueSyntax::new(ident(words.get(1))?);
                let mut i = 2;
                while i < words.len() {
                    match words[i] {
                        ":" => {
                            value.base = Some(ty(words.get(i + 1))?);
                            i += 1;
                        }
                        "key" => {
                            value.equal_by.push(ident(words.get(i + 1))?);
                            i += 1;
                        }
                        "external" => value.is_external = true,
                        "abstract" => value.is_abstract = true,
                        other => return Err(format!("unexpected '{other}'")),
                    }
                    i += 1;
                }
                self.namespace()?.members.push(value.into());
                self.last = Last::Value;
            }
            "prop" => {
                let mut property = PropertySyntax::new(ident(words.get(1))?, ty(words.get(2))?);
                if words.get(3) == Some(&"alias") {
                    property.alias = Some(ident(words.get(4))?);
                }
                let last = self.last;
                match (last, self.namespace()?.members.last_mut()) {
                    (Last::Event, Some(NamespaceMemberSyntax::Entity(entity))) => entity
                        .events
                        .last_mut()
                        .ok_or("event was closed")?
                        .properties
                        .push(property),
                    (Last::Value, Some(NamespaceMemberSyntax::Value(value))) => {
                        value.properties.push(property);
                    }
                    _ => return Err("property outside an event or value".to_owned()),
                }
            }
            "enum" => {
                let external = ExternalEnumSyntax::new(ident(words.get(1))?);
                self.namespace()?.members.push(external.into());
            }
            "api" => {
                let root = WebApiPathSyntax::new(operation(words)?);
                self.namespace()?.members.push(WebApiSyntax::new(root).into());
                self.in_path = false;
            }
            "command" => {
                let command = WebApiCommandSyntax::new(operation(words)?);
                self.container()?.members.push(command.into());
            }
            "query" => {
                let query = WebApiQuerySyntax::new(operation(words)?);
                self.container()?.members.push(query.into());
            }
            "path" => {
                let path = WebApiPathSyntax::new(operation(words)?);
                self.in_path = false;
                self.container()?.members.push(path.into());
                self.in_path = true;
            }
            "end" => self.in_path = false,
            "filter" => {
                let filter = AtomSyntax::new(ident(words.get(1))?, ty(words.get(2))?);
                let container = self.container()?;
                match container.members.last_mut() {
                    Some(WebApiMemberSyntax::Query(query)) => query.filters.push(filter),
                    Some(WebApiMemberSyntax::Path(path)) => path.filters.push(filter),
                    _ => container.filters.push(filter),
                }
            }
            other => return Err(format!("unexpected '{other}'")),
        }
        Ok(())
    }

    fn finish(mut self) -> SyntaxTree {
        if let Some(done) = self.current.take() {
            self.namespaces.push(done);
        }
        let mut tree = SyntaxTree::new();
        tree.imports = self.imports;
        tree.namespaces = self.namespaces;
        tree
    }
}
