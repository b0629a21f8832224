use serde::de::{
    self, Deserialize, Deserializer, EnumAccess, IgnoredAny, MapAccess, SeqAccess, VariantAccess,
    Visitor,
};
use std::fmt;

/// Shape of a value that was found where something else was expected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Bool,
    Number,
    String,
    Sequence,
    Mapping,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Bool => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Sequence => "sequence",
            ValueKind::Mapping => "mapping",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
    Trace,
    Other(String),
}

impl HttpMethod {
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_lowercase().as_str() {
            "get" => Self::Get,
            "put" => Self::Put,
            "post" => Self::Post,
            "delete" => Self::Delete,
            "options" => Self::Options,
            "head" => Self::Head,
            "patch" => Self::Patch,
            "trace" => Self::Trace,
            _ => Self::Other(token.to_string()),
        }
    }

    pub fn is_standard(&self) -> bool {
        !matches!(self, Self::Other(_))
    }

    pub fn label(&self) -> String {
        match self {
            Self::Get => "GET".to_string(),
            Self::Put => "PUT".to_string(),
            Self::Post => "POST".to_string(),
            Self::Delete => "DELETE".to_string(),
            Self::Options => "OPTIONS".to_string(),
            Self::Head => "HEAD".to_string(),
            Self::Patch => "PATCH".to_string(),
            Self::Trace => "TRACE".to_string(),
            Self::Other(token) => token.to_uppercase(),
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// One method on one path, as shown in the graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub method: HttpMethod,
    pub path: String,
    pub summary: String,
}

impl Operation {
    pub fn label(&self) -> String {
        format!("{} - {} : {}", self.method.label(), self.path, self.summary)
    }
}

/// Parsed API description. Only the parts that feed the graph are kept;
/// everything else in the source is skipped during deserialization.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub info: Option<Info>,
    pub paths: Option<Paths>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Info {
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paths {
    Mapping(Vec<PathItem>),
    NotMapping(ValueKind),
}

#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    pub path: String,
    pub body: PathItemBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PathItemBody {
    Methods(Vec<MethodEntry>),
    Empty,
    Malformed(ValueKind),
}

impl PathItem {
    pub fn entries(&self) -> &[MethodEntry] {
        match &self.body {
            PathItemBody::Methods(entries) => entries,
            PathItemBody::Empty | PathItemBody::Malformed(_) => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodEntry {
    pub key: String,
    pub body: OperationBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OperationBody {
    Operation { summary: Option<String> },
    Malformed(ValueKind),
}

impl MethodEntry {
    pub fn to_operation(&self, path: &str) -> Option<Operation> {
        match &self.body {
            OperationBody::Operation { summary } => Some(Operation {
                method: HttpMethod::from_token(&self.key),
                path: path.to_string(),
                summary: summary.clone().unwrap_or_default(),
            }),
            OperationBody::Malformed(_) => None,
        }
    }
}

fn drain_seq<'de, A: SeqAccess<'de>>(mut seq: A) -> Result<(), A::Error> {
    while seq.next_element::<IgnoredAny>()?.is_some() {}
    Ok(())
}

fn drain_map<'de, A: MapAccess<'de>>(mut map: A) -> Result<(), A::Error> {
    while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
    Ok(())
}

/// YAML delivers `!tag value` as a single-variant enum. The tag carries no
/// meaning here, so the tagged value is read as if it were untagged.
fn untag<'de, A, T>(data: A) -> Result<T, A::Error>
where
    A: EnumAccess<'de>,
    T: Deserialize<'de>,
{
    let (tag, value) = data.variant::<String>()?;
    log::debug!("ignoring YAML tag {tag}");
    value.newtype_variant::<T>()
}

/// Implements every non-mapping `visit_*` of a visitor by mapping the value
/// shape through `$on_other`.
macro_rules! visit_non_mapping {
    ($on_other:expr) => {
        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok($on_other(ValueKind::Null))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok($on_other(ValueKind::Null))
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(self)
        }

        fn visit_bool<E: de::Error>(self, _: bool) -> Result<Self::Value, E> {
            Ok($on_other(ValueKind::Bool))
        }

        fn visit_i64<E: de::Error>(self, _: i64) -> Result<Self::Value, E> {
            Ok($on_other(ValueKind::Number))
        }

        fn visit_u64<E: de::Error>(self, _: u64) -> Result<Self::Value, E> {
            Ok($on_other(ValueKind::Number))
        }

        fn visit_f64<E: de::Error>(self, _: f64) -> Result<Self::Value, E> {
            Ok($on_other(ValueKind::Number))
        }

        fn visit_str<E: de::Error>(self, _: &str) -> Result<Self::Value, E> {
            Ok($on_other(ValueKind::String))
        }

        fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
            drain_seq(seq)?;
            Ok($on_other(ValueKind::Sequence))
        }

        fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<Self::Value, A::Error> {
            untag(data)
        }
    };
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(DocumentVisitor)
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an API description document")
    }

    visit_non_mapping!(|_| Document::default());

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Document, A::Error> {
        let mut document = Document::default();
        while let Some(key) = map.next_key::<MapKey>()? {
            match key.text() {
                Some("info") => document.info = map.next_value::<Option<Info>>()?,
                Some("paths") => document.paths = map.next_value::<Option<Paths>>()?,
                _ => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(document)
    }
}

impl<'de> Deserialize<'de> for Info {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(InfoVisitor)
    }
}

struct InfoVisitor;

impl<'de> Visitor<'de> for InfoVisitor {
    type Value = Info;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an info object")
    }

    visit_non_mapping!(|_| Info::default());

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Info, A::Error> {
        let mut info = Info::default();
        while let Some(key) = map.next_key::<MapKey>()? {
            if key.text() == Some("title") {
                info.title = map.next_value::<ScalarText>()?.0;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(info)
    }
}

impl<'de> Deserialize<'de> for Paths {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PathsVisitor)
    }
}

struct PathsVisitor;

impl<'de> Visitor<'de> for PathsVisitor {
    type Value = Paths;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping of paths")
    }

    visit_non_mapping!(Paths::NotMapping);

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Paths, A::Error> {
        let mut items = Vec::new();
        while let Some(key) = map.next_key::<MapKey>()? {
            match key {
                MapKey::Text(path) => {
                    let body = map.next_value::<PathItemBody>()?;
                    items.push(PathItem { path, body });
                }
                MapKey::Structured(kind) => {
                    map.next_value::<IgnoredAny>()?;
                    log::warn!("skipping path item under a {kind} key");
                }
            }
        }
        Ok(Paths::Mapping(items))
    }
}

impl<'de> Deserialize<'de> for PathItemBody {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PathItemVisitor)
    }
}

struct PathItemVisitor;

impl<'de> Visitor<'de> for PathItemVisitor {
    type Value = PathItemBody;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a path item")
    }

    visit_non_mapping!(|kind| match kind {
        ValueKind::Null => PathItemBody::Empty,
        other => PathItemBody::Malformed(other),
    });

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<PathItemBody, A::Error> {
        let mut entries = Vec::new();
        while let Some(key) = map.next_key::<MapKey>()? {
            let entry = match key {
                MapKey::Text(key) => MethodEntry {
                    key,
                    body: map.next_value::<OperationBody>()?,
                },
                MapKey::Structured(kind) => {
                    map.next_value::<IgnoredAny>()?;
                    MethodEntry {
                        key: format!("<{kind} key>"),
                        body: OperationBody::Malformed(kind),
                    }
                }
            };
            entries.push(entry);
        }
        Ok(PathItemBody::Methods(entries))
    }
}

impl<'de> Deserialize<'de> for OperationBody {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(OperationVisitor)
    }
}

struct OperationVisitor;

impl<'de> Visitor<'de> for OperationVisitor {
    type Value = OperationBody;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an operation object")
    }

    visit_non_mapping!(OperationBody::Malformed);

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<OperationBody, A::Error> {
        let mut summary = None;
        while let Some(key) = map.next_key::<MapKey>()? {
            if key.text() == Some("summary") {
                summary = map.next_value::<ScalarText>()?.0;
            } else {
                map.next_value::<IgnoredAny>()?;
            }
        }
        Ok(OperationBody::Operation { summary })
    }
}

/// Mapping key. YAML allows scalar keys of any type (`200:` under
/// `responses`), which are rendered as text; sequence and mapping keys
/// (`? [a, b]`) are kept apart so the entry can be skipped on its own.
enum MapKey {
    Text(String),
    Structured(ValueKind),
}

impl MapKey {
    fn text(&self) -> Option<&str> {
        match self {
            MapKey::Text(text) => Some(text),
            MapKey::Structured(_) => None,
        }
    }
}

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MapKeyVisitor)
    }
}

struct MapKeyVisitor;

impl<'de> Visitor<'de> for MapKeyVisitor {
    type Value = MapKey;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a mapping key")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<MapKey, E> {
        Ok(MapKey::Text(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<MapKey, E> {
        Ok(MapKey::Text(value))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<MapKey, E> {
        Ok(MapKey::Text(value.to_string()))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<MapKey, E> {
        Ok(MapKey::Text(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<MapKey, E> {
        Ok(MapKey::Text(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<MapKey, E> {
        Ok(MapKey::Text(value.to_string()))
    }

    fn visit_unit<E: de::Error>(self) -> Result<MapKey, E> {
        Ok(MapKey::Text("null".to_string()))
    }

    fn visit_none<E: de::Error>(self) -> Result<MapKey, E> {
        Ok(MapKey::Text("null".to_string()))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<MapKey, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<MapKey, A::Error> {
        drain_seq(seq)?;
        Ok(MapKey::Structured(ValueKind::Sequence))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<MapKey, A::Error> {
        drain_map(map)?;
        Ok(MapKey::Structured(ValueKind::Mapping))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<MapKey, A::Error> {
        untag(data)
    }
}

/// Scalar value rendered as text; structured values and null yield `None`.
struct ScalarText(Option<String>);

impl<'de> Deserialize<'de> for ScalarText {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarTextVisitor)
    }
}

struct ScalarTextVisitor;

impl<'de> Visitor<'de> for ScalarTextVisitor {
    type Value = ScalarText;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a scalar value")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<ScalarText, E> {
        Ok(ScalarText(Some(value.to_string())))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<ScalarText, E> {
        Ok(ScalarText(Some(value)))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<ScalarText, E> {
        Ok(ScalarText(Some(value.to_string())))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<ScalarText, E> {
        Ok(ScalarText(Some(value.to_string())))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<ScalarText, E> {
        Ok(ScalarText(Some(value.to_string())))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<ScalarText, E> {
        Ok(ScalarText(Some(value.to_string())))
    }

    fn visit_unit<E: de::Error>(self) -> Result<ScalarText, E> {
        Ok(ScalarText(None))
    }

    fn visit_none<E: de::Error>(self) -> Result<ScalarText, E> {
        Ok(ScalarText(None))
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<ScalarText, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<ScalarText, A::Error> {
        drain_seq(seq)?;
        Ok(ScalarText(None))
    }

    fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<ScalarText, A::Error> {
        drain_map(map)?;
        Ok(ScalarText(None))
    }

    fn visit_enum<A: EnumAccess<'de>>(self, data: A) -> Result<ScalarText, A::Error> {
        untag(data)
    }
}
