//! Property codecs.
//!
//! Every property kind has one [`PropertyCodec`] that renders a stored value
//! as CSV cell text. Codecs are looked up by type tag through an explicit
//! [`CodecRegistry`] that callers own and pass in; an unknown tag resolves to
//! no codec and the cell stays empty.
//!
//! # Kinds
//!
//! | Tag | Export |
//! |-----|--------|
//! | `text`, `email`, `url`, `phone`, `person`, `number` | Stored value verbatim |
//! | `select` | Option label |
//! | `multiSelect` | Option labels joined with `\|` |
//! | `date` | Formatted timestamp or `from -> to` range |
//! | `checkbox` | `true` / `false` |
//! | `createdTime`, `updatedTime` | Record timestamps |
//! | `createdBy`, `updatedBy` | Record authors, never the stored value |

use super::formatting::Formatter;
use crate::models::{PropertyTemplate, PropertyValue, Record};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;

/// Separator for list values inside a single cell.
pub const LIST_SEPARATOR: &str = "|";

/// Closed set of property kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKind {
    /// Free text.
    Text,
    /// Numeric value stored as text or number.
    Number,
    /// Email address.
    Email,
    /// Link.
    Url,
    /// Phone number.
    Phone,
    /// Single option id.
    Select,
    /// List of option ids.
    MultiSelect,
    /// User id.
    Person,
    /// Timestamp or range.
    Date,
    /// Boolean flag stored as `"true"`/`"false"`.
    Checkbox,
    /// Record creation time.
    CreatedTime,
    /// Record update time.
    UpdatedTime,
    /// Record creator.
    CreatedBy,
    /// Record last modifier.
    UpdatedBy,
}

impl PropertyKind {
    /// Returns all kinds.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Text,
            Self::Number,
            Self::Email,
            Self::Url,
            Self::Phone,
            Self::Select,
            Self::MultiSelect,
            Self::Person,
            Self::Date,
            Self::Checkbox,
            Self::CreatedTime,
            Self::UpdatedTime,
            Self::CreatedBy,
            Self::UpdatedBy,
        ]
    }

    /// Returns the type tag.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Number => "number",
            Self::Email => "email",
            Self::Url => "url",
            Self::Phone => "phone",
            Self::Select => "select",
            Self::MultiSelect => "multiSelect",
            Self::Person => "person",
            Self::Date => "date",
            Self::Checkbox => "checkbox",
            Self::CreatedTime => "createdTime",
            Self::UpdatedTime => "updatedTime",
            Self::CreatedBy => "createdBy",
            Self::UpdatedBy => "updatedBy",
        }
    }

    /// Parses a type tag.
    ///
    /// Returns `None` for unknown tags. Tags are case-sensitive, matching how
    /// boards store them; `modifiedBy` is accepted for `updatedBy`.
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        match tag {
            "modifiedBy" => Some(Self::UpdatedBy),
            _ => Self::all().iter().copied().find(|k| k.as_str() == tag),
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Everything a codec may read to render one cell.
pub struct CellContext<'a> {
    /// Value after the author override; `None` when absent.
    pub value: Option<&'a PropertyValue>,
    /// The record being exported.
    pub record: &'a Record,
    /// Template of the column.
    pub template: &'a PropertyTemplate,
    /// Locale hook.
    pub formatter: &'a dyn Formatter,
}

/// Export function of a codec.
pub type ExportFn = fn(&CellContext<'_>) -> String;

/// Capability object for one property kind.
#[derive(Clone, Copy)]
pub struct PropertyCodec {
    kind: PropertyKind,
    export: ExportFn,
}

impl fmt::Debug for PropertyCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyCodec")
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl PropertyCodec {
    /// Creates a codec from a kind and its export function.
    #[must_use]
    pub const fn new(kind: PropertyKind, export: ExportFn) -> Self {
        Self { kind, export }
    }

    /// Returns the standard codec for a kind.
    #[must_use]
    pub const fn standard(kind: PropertyKind) -> Self {
        let export: ExportFn = match kind {
            PropertyKind::Text
            | PropertyKind::Number
            | PropertyKind::Email
            | PropertyKind::Url
            | PropertyKind::Phone
            | PropertyKind::Person
            | PropertyKind::CreatedBy
            | PropertyKind::UpdatedBy => export_plain,
            PropertyKind::Select | PropertyKind::MultiSelect => export_options,
            PropertyKind::Date => export_date,
            PropertyKind::Checkbox => export_checkbox,
            PropertyKind::CreatedTime => export_created_time,
            PropertyKind::UpdatedTime => export_updated_time,
        };
        Self::new(kind, export)
    }

    /// Returns the kind this codec handles.
    #[must_use]
    pub const fn kind(&self) -> PropertyKind {
        self.kind
    }

    /// Renders a stored value as cell text.
    ///
    /// For `createdBy`/`updatedBy` the raw value is ignored and the record's
    /// own author attribute is rendered instead.
    #[must_use]
    pub fn export_value(
        &self,
        raw: Option<&PropertyValue>,
        record: &Record,
        template: &PropertyTemplate,
        formatter: &dyn Formatter,
    ) -> String {
        let overridden = match self.kind {
            PropertyKind::CreatedBy => Some(PropertyValue::Text(record.created_by.clone())),
            PropertyKind::UpdatedBy => Some(PropertyValue::Text(record.modified_by.clone())),
            _ => None,
        };
        let value = if overridden.is_some() {
            overridden.as_ref()
        } else {
            raw
        };

        (self.export)(&CellContext {
            value,
            record,
            template,
            formatter,
        })
    }
}

/// Capability table from property kind to codec.
#[derive(Debug, Clone)]
pub struct CodecRegistry {
    codecs: HashMap<PropertyKind, PropertyCodec>,
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::standard()
    }
}

impl CodecRegistry {
    /// Creates a registry with the standard codec for every kind.
    #[must_use]
    pub fn standard() -> Self {
        let codecs = PropertyKind::all()
            .iter()
            .map(|&kind| (kind, PropertyCodec::standard(kind)))
            .collect();
        Self { codecs }
    }

    /// Creates a registry with no codecs.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            codecs: HashMap::new(),
        }
    }

    /// Installs or replaces the codec for its kind.
    #[must_use]
    pub fn with_codec(mut self, codec: PropertyCodec) -> Self {
        self.codecs.insert(codec.kind(), codec);
        self
    }

    /// Looks up the codec for a type tag.
    #[must_use]
    pub fn get(&self, type_tag: &str) -> Option<&PropertyCodec> {
        PropertyKind::parse(type_tag).and_then(|kind| self.codecs.get(&kind))
    }

    /// Renders one cell of `record` for the column `template`.
    ///
    /// Templates without a codec render as an empty cell.
    #[must_use]
    pub fn export_cell(
        &self,
        record: &Record,
        template: &PropertyTemplate,
        formatter: &dyn Formatter,
    ) -> String {
        let Some(codec) = self.get(&template.property_type) else {
            tracing::trace!(
                property_id = %template.id,
                property_type = %template.property_type,
                "No codec for property type, rendering empty cell"
            );
            return String::new();
        };
        codec.export_value(record.property(&template.id), record, template, formatter)
    }
}

fn export_plain(ctx: &CellContext<'_>) -> String {
    match ctx.value {
        None => String::new(),
        Some(PropertyValue::Text(s)) => s.clone(),
        Some(PropertyValue::List(items)) => items.join(LIST_SEPARATOR),
        Some(PropertyValue::Number(n)) => ctx.formatter.format_number(*n),
    }
}

fn export_options(ctx: &CellContext<'_>) -> String {
    let ids: Vec<&str> = match ctx.value {
        Some(PropertyValue::Text(id)) => vec![id.as_str()],
        Some(PropertyValue::List(ids)) => ids.iter().map(String::as_str).collect(),
        Some(PropertyValue::Number(_)) | None => return String::new(),
    };
    ids.into_iter()
        .filter_map(|id| ctx.template.option_label(id))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

/// Stored shape of a date range.
#[derive(Debug, Deserialize)]
struct DateRange {
    from: Option<i64>,
    to: Option<i64>,
}

#[allow(clippy::cast_possible_truncation)]
fn parse_date_value(value: &PropertyValue) -> Option<DateRange> {
    match value {
        PropertyValue::Number(n) if n.is_finite() => Some(DateRange {
            from: Some(*n as i64),
            to: None,
        }),
        PropertyValue::Text(s) => {
            let s = s.trim();
            s.parse::<i64>().map_or_else(
                |_| serde_json::from_str::<DateRange>(s).ok(),
                |millis| {
                    Some(DateRange {
                        from: Some(millis),
                        to: None,
                    })
                },
            )
        },
        _ => None,
    }
}

fn export_date(ctx: &CellContext<'_>) -> String {
    let Some(range) = ctx.value.and_then(parse_date_value) else {
        return String::new();
    };
    let Some(from) = range.from else {
        return String::new();
    };
    let from = ctx.formatter.format_date(from);
    match range.to {
        Some(to) => format!("{from} -> {}", ctx.formatter.format_date(to)),
        None => from,
    }
}

fn export_checkbox(ctx: &CellContext<'_>) -> String {
    match ctx.value {
        None => String::new(),
        Some(PropertyValue::Text(s)) if s.trim().eq_ignore_ascii_case("true") => {
            "true".to_string()
        },
        Some(_) => "false".to_string(),
    }
}

fn export_created_time(ctx: &CellContext<'_>) -> String {
    ctx.formatter.format_date(ctx.record.create_at)
}

fn export_updated_time(ctx: &CellContext<'_>) -> String {
    ctx.formatter.format_date(ctx.record.update_at)
}
