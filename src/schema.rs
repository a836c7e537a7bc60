//! Target-schema model and YAML persistence.
//!
//! A [`Schema`] is the fixed allow-list of fields the target table accepts,
//! loaded once per run and passed explicitly to the projector. Field types
//! use human-readable signatures in the YAML (`integer`, `varchar(75)`,
//! `decimal(4,2)`, `enum(L|P)`, ...) and serialize back the same way.
//!
//! The crate ships an embedded definition of the registration table
//! (`psb_member`, 288 fields) used when no `--schema` override is given.
//! A handful of allow-listed names carry no explicit type; those fall to the
//! projector's pattern-based inference.

use std::{fmt, fs, path::Path, str::FromStr};

use anyhow::{Context, Result, anyhow, bail, ensure};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

const EMBEDDED_SCHEMA: &str = include_str!("../assets/psb_member.yaml");

const DECIMAL_MAX_PRECISION: u32 = 28;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecimalSpec {
    pub precision: u32,
    pub scale: u32,
}

impl DecimalSpec {
    pub fn new(precision: u32, scale: u32) -> Result<Self> {
        let spec = Self { precision, scale };
        spec.ensure_valid()?;
        Ok(spec)
    }

    pub fn ensure_valid(&self) -> Result<()> {
        ensure!(self.precision > 0, "Decimal precision must be positive");
        ensure!(
            self.precision <= DECIMAL_MAX_PRECISION,
            "Decimal precision must be <= {}",
            DECIMAL_MAX_PRECISION
        );
        ensure!(
            self.scale <= self.precision,
            "Decimal scale ({}) cannot exceed precision ({})",
            self.scale,
            self.precision
        );
        Ok(())
    }
}

/// Type classification for one target field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Decimal(DecimalSpec),
    Varchar(u32),
    Text,
    Date,
    DateTime,
    Enum(Vec<String>),
}

impl FieldType {
    /// Human-readable signature, also the YAML representation.
    pub fn signature(&self) -> String {
        match self {
            FieldType::Integer => "integer".to_string(),
            FieldType::Decimal(spec) => format!("decimal({},{})", spec.precision, spec.scale),
            FieldType::Varchar(len) => format!("varchar({len})"),
            FieldType::Text => "text".to_string(),
            FieldType::Date => "date".to_string(),
            FieldType::DateTime => "datetime".to_string(),
            FieldType::Enum(values) => format!("enum({})", values.join("|")),
        }
    }

    /// SQL column type as it appears in the generated DDL.
    pub fn sql_type(&self) -> String {
        match self {
            FieldType::Integer => "INT(11)".to_string(),
            FieldType::Decimal(spec) => format!("DECIMAL({},{})", spec.precision, spec.scale),
            FieldType::Varchar(len) => format!("VARCHAR({len})"),
            FieldType::Text => "TEXT".to_string(),
            FieldType::Date => "DATE".to_string(),
            FieldType::DateTime => "DATETIME".to_string(),
            FieldType::Enum(values) => {
                let quoted: Vec<String> = values.iter().map(|v| format!("'{v}'")).collect();
                format!("ENUM({})", quoted.join(","))
            }
        }
    }

    pub fn is_textual(&self) -> bool {
        matches!(self, FieldType::Varchar(_) | FieldType::Text)
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.signature())
    }
}

impl FromStr for FieldType {
    type Err = anyhow::Error;

    fn from_str(token: &str) -> Result<Self> {
        let trimmed = token.trim();
        match trimmed {
            "integer" => return Ok(FieldType::Integer),
            "text" => return Ok(FieldType::Text),
            "date" => return Ok(FieldType::Date),
            "datetime" => return Ok(FieldType::DateTime),
            _ => {}
        }
        if let Some(args) = signature_args(trimmed, "varchar") {
            let len: u32 = args
                .parse()
                .with_context(|| format!("Invalid varchar length '{args}'"))?;
            ensure!(len > 0, "Varchar length must be positive");
            return Ok(FieldType::Varchar(len));
        }
        if let Some(args) = signature_args(trimmed, "decimal") {
            let (precision, scale) = args
                .split_once(',')
                .ok_or_else(|| anyhow!("Decimal signature requires 'precision,scale'"))?;
            let precision: u32 = precision
                .trim()
                .parse()
                .with_context(|| format!("Invalid decimal precision '{precision}'"))?;
            let scale: u32 = scale
                .trim()
                .parse()
                .with_context(|| format!("Invalid decimal scale '{scale}'"))?;
            return Ok(FieldType::Decimal(DecimalSpec::new(precision, scale)?));
        }
        if let Some(args) = signature_args(trimmed, "enum") {
            let values: Vec<String> = args
                .split('|')
                .map(|v| v.to_string())
                .filter(|v| !v.is_empty())
                .collect();
            ensure!(!values.is_empty(), "Enum signature requires at least one value");
            return Ok(FieldType::Enum(values));
        }
        bail!("Unknown field type signature '{trimmed}'")
    }
}

fn signature_args<'a>(token: &'a str, name: &str) -> Option<&'a str> {
    token
        .strip_prefix(name)?
        .strip_prefix('(')?
        .strip_suffix(')')
}

impl Serialize for FieldType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.signature())
    }
}

impl<'de> Deserialize<'de> for FieldType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let token = String::deserialize(deserializer)?;
        FieldType::from_str(&token).map_err(|err| de::Error::custom(err.to_string()))
    }
}

/// One allow-list entry as stored in the schema YAML.
///
/// `field_type` may be absent: the projector then classifies the field from
/// its name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

/// A fully classified field: canonical name, type, optional explicit default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub default: Option<String>,
}

impl FieldSpec {
    /// Raw default value substituted when a cell is absent or unusable.
    ///
    /// Explicit schema defaults win; otherwise the type supplies one:
    /// `0`, `0.00`, the zero-date sentinels, the first enum value, or the
    /// empty string.
    pub fn default_raw(&self) -> &str {
        if let Some(explicit) = &self.default {
            return explicit;
        }
        match &self.field_type {
            FieldType::Integer => "0",
            FieldType::Decimal(_) => "0.00",
            FieldType::Date => "0000-00-00",
            FieldType::DateTime => "0000-00-00 00:00:00",
            FieldType::Enum(values) => values.first().map(String::as_str).unwrap_or(""),
            FieldType::Varchar(_) | FieldType::Text => "",
        }
    }
}

/// Immutable target-table definition: allow-list plus key/tenant fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schema {
    pub table: String,
    pub key_field: String,
    pub tenant_field: String,
    pub fields: Vec<FieldDef>,
}

impl Schema {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Reading schema file {path:?}"))?;
        let schema: Schema =
            serde_yaml::from_str(&raw).with_context(|| format!("Parsing schema YAML {path:?}"))?;
        schema.validate()?;
        Ok(schema)
    }

    /// The built-in registration-table schema.
    pub fn embedded() -> Result<Self> {
        let schema: Schema =
            serde_yaml::from_str(EMBEDDED_SCHEMA).context("Parsing embedded schema")?;
        schema.validate()?;
        Ok(schema)
    }

    fn validate(&self) -> Result<()> {
        ensure!(!self.table.is_empty(), "Schema table name must not be empty");
        ensure!(!self.fields.is_empty(), "Schema defines no fields");
        ensure!(
            self.find(&self.key_field).is_some(),
            "Key field '{}' is not in the field list",
            self.key_field
        );
        ensure!(
            self.find(&self.tenant_field).is_some(),
            "Tenant field '{}' is not in the field list",
            self.tenant_field
        );
        Ok(())
    }

    pub fn find(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.find(name).is_some()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }
}
