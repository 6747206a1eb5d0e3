//! Embedded image metadata (EXIF) extraction and display

use exif::{Context, Field, In, Tag, Value};
use std::collections::BTreeMap;
use std::fmt;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Display key of the raw GPS record when no location could be derived
pub const GPS_INFO_KEY: &str = "GPSInfo";
pub const WIDTH_KEY: &str = "ExifImageWidth";
pub const HEIGHT_KEY: &str = "ExifImageHeight";

/// GPS tag numbers holding degree/minute/second triples
pub const GPS_LATITUDE: u16 = 2;
pub const GPS_LONGITUDE: u16 = 4;

pub const LOCATION_LABEL: &str = "Find image location in Google Maps";

/// A byte-valued tag that is not valid UTF-8
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Metadata tag {key} is not valid UTF-8: {source}")]
pub struct DecodeError {
    pub key: String,
    #[source]
    pub source: std::str::Utf8Error,
}

/// A normalized tag value
#[derive(Debug, Clone, PartialEq)]
pub enum TagValue {
    Integer(i64),
    Text(String),
    Bytes(Vec<u8>),
    Gps(GpsRecord),
}

impl TagValue {
    /// Render for display; byte values must be UTF-8
    pub fn display(&self, key: &str) -> Result<String, DecodeError> {
        match self {
            TagValue::Integer(v) => Ok(v.to_string()),
            TagValue::Text(s) => Ok(s.clone()),
            TagValue::Bytes(bytes) => std::str::from_utf8(bytes)
                .map(|s| s.trim_end_matches('\0').to_string())
                .map_err(|source| DecodeError {
                    key: key.to_string(),
                    source,
                }),
            TagValue::Gps(record) => Ok(record.to_string()),
        }
    }
}

/// One field of the GPS IFD
#[derive(Debug, Clone, PartialEq)]
pub enum GpsField {
    Numbers(Vec<f64>),
    Text(String),
}

/// The GPS IFD keyed by tag number
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GpsRecord {
    fields: BTreeMap<u16, GpsField>,
}

impl GpsRecord {
    pub fn insert(&mut self, number: u16, field: GpsField) {
        self.fields.insert(number, field);
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn triple(&self, number: u16) -> Option<[f64; 3]> {
        match self.fields.get(&number)? {
            GpsField::Numbers(v) if v.len() >= 3 => Some([v[0], v[1], v[2]]),
            _ => None,
        }
    }
}

impl fmt::Display for GpsRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (number, field)) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match field {
                GpsField::Numbers(v) => {
                    let parts: Vec<String> = v.iter().map(|n| n.to_string()).collect();
                    write!(f, "{}: ({})", number, parts.join(", "))?;
                }
                GpsField::Text(s) => write!(f, "{}: {}", number, s)?,
            }
        }
        f.write_str("}")
    }
}

/// Decimal coordinates derived from a GPS record.
///
/// Hemisphere reference tags are not applied; the sign comes from the
/// degrees component alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GpsCoordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl GpsCoordinate {
    /// Requires both latitude and longitude triples
    pub fn from_record(record: &GpsRecord) -> Option<Self> {
        let latitude = record.triple(GPS_LATITUDE)?;
        let longitude = record.triple(GPS_LONGITUDE)?;
        Some(Self {
            latitude: dms_to_decimal(latitude),
            longitude: dms_to_decimal(longitude),
        })
    }

    /// `{base}{lat},{lon}`
    pub fn maps_url(&self, base: &str) -> String {
        format!("{}{},{}", base, self.latitude, self.longitude)
    }
}

/// deg + min/60 + sec/3600, carrying the sign of the degrees
pub fn dms_to_decimal([degrees, minutes, seconds]: [f64; 3]) -> f64 {
    let magnitude = degrees.abs() + minutes / 60.0 + seconds / 3600.0;
    if degrees.is_sign_negative() {
        -magnitude
    } else {
        magnitude
    }
}

/// Navigable link to the image's location
#[derive(Debug, Clone, PartialEq)]
pub struct LocationLink {
    pub label: &'static str,
    pub url: String,
}

/// One row of the metadata view
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataEntry {
    pub key: String,
    pub value: Result<String, DecodeError>,
}

/// Everything the metadata view shows
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataReport {
    pub entries: Vec<MetadataEntry>,
    pub location: Option<LocationLink>,
}

impl MetadataReport {
    pub fn decode_errors(&self) -> impl Iterator<Item = &DecodeError> {
        self.entries.iter().filter_map(|e| e.value.as_ref().err())
    }
}

/// Tag name to value mapping, read once from the image
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageMetadata {
    tags: BTreeMap<String, TagValue>,
    location: Option<GpsCoordinate>,
}

impl ImageMetadata {
    /// Read the embedded tag block. Unreadable files and images without
    /// tags both give empty metadata.
    pub fn read(path: &Path) -> Self {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(e) => {
                tracing::warn!("Cannot open {} for metadata: {}", path.display(), e);
                return Self::default();
            }
        };

        let mut reader = BufReader::new(file);
        match exif::Reader::new().read_from_container(&mut reader) {
            Ok(exif) => {
                let metadata = Self::from_fields(exif.fields());
                tracing::debug!(
                    "Read {} tags from {} (location: {})",
                    metadata.tags.len(),
                    path.display(),
                    metadata.location.is_some()
                );
                metadata
            }
            Err(exif::Error::NotFound(_)) => {
                tracing::debug!("No embedded tags in {}", path.display());
                Self::default()
            }
            Err(e) => {
                tracing::warn!("Failed to read metadata from {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Normalize primary-image fields into the display mapping
    pub fn from_fields<'a, I>(fields: I) -> Self
    where
        I: IntoIterator<Item = &'a Field>,
    {
        let mut tags = BTreeMap::new();
        let mut gps = GpsRecord::default();

        for field in fields {
            if field.ifd_num != In::PRIMARY || is_pointer(field.tag) {
                continue;
            }

            if field.tag.context() == Context::Gps {
                if let Some(value) = gps_field(&field.value) {
                    gps.insert(field.tag.number(), value);
                }
                continue;
            }

            // Tags without a known name are skipped
            if field.tag.description().is_none() {
                continue;
            }

            if let Some(value) = tag_value(&field.value) {
                tags.insert(display_name(field.tag), value);
            }
        }

        let mut location = None;
        if !gps.is_empty() {
            location = GpsCoordinate::from_record(&gps);
            if location.is_none() {
                tags.insert(GPS_INFO_KEY.to_string(), TagValue::Gps(gps));
            }
        }

        Self { tags, location }
    }

    /// Build directly from a mapping
    pub fn from_tags(mut tags: BTreeMap<String, TagValue>) -> Self {
        let mut location = None;
        if let Some(TagValue::Gps(record)) = tags.get(GPS_INFO_KEY) {
            location = GpsCoordinate::from_record(record);
        }
        if location.is_some() {
            tags.remove(GPS_INFO_KEY);
        }
        Self { tags, location }
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty() && self.location.is_none()
    }

    pub fn get(&self, key: &str) -> Option<&TagValue> {
        self.tags.get(key)
    }

    pub fn location(&self) -> Option<GpsCoordinate> {
        self.location
    }

    /// "<width>x<height>" when both dimension tags are present
    pub fn size_label(&self) -> String {
        match (self.tags.get(WIDTH_KEY), self.tags.get(HEIGHT_KEY)) {
            (Some(w), Some(h)) => format!(
                "{}x{}",
                w.display(WIDTH_KEY).unwrap_or_else(|_| "?".to_string()),
                h.display(HEIGHT_KEY).unwrap_or_else(|_| "?".to_string())
            ),
            _ => "unknown".to_string(),
        }
    }

    /// Rows for the metadata view plus the location link, if any
    pub fn report(&self, maps_url_base: &str) -> MetadataReport {
        let entries = self
            .tags
            .iter()
            .map(|(key, value)| MetadataEntry {
                key: key.clone(),
                value: value.display(key),
            })
            .collect();

        let location = self.location.map(|coord| LocationLink {
            label: LOCATION_LABEL,
            url: coord.maps_url(maps_url_base),
        });

        MetadataReport { entries, location }
    }
}

fn is_pointer(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::ExifIFDPointer | Tag::GPSInfoIFDPointer | Tag::InteropIFDPointer
    )
}

/// Names follow the common convention for the pixel dimension tags
fn display_name(tag: Tag) -> String {
    match tag {
        Tag::PixelXDimension => WIDTH_KEY.to_string(),
        Tag::PixelYDimension => HEIGHT_KEY.to_string(),
        other => other.to_string(),
    }
}

fn integers(value: &Value) -> Option<Vec<i64>> {
    let ints: Vec<i64> = match value {
        Value::Byte(v) => v.iter().map(|&n| n as i64).collect(),
        Value::Short(v) => v.iter().map(|&n| n as i64).collect(),
        Value::Long(v) => v.iter().map(|&n| n as i64).collect(),
        Value::SByte(v) => v.iter().map(|&n| n as i64).collect(),
        Value::SShort(v) => v.iter().map(|&n| n as i64).collect(),
        Value::SLong(v) => v.iter().map(|&n| n as i64).collect(),
        _ => return None,
    };
    Some(ints)
}

fn numbers(value: &Value) -> Option<Vec<f64>> {
    let nums: Vec<f64> = match value {
        Value::Rational(v) => v.iter().map(|r| r.to_f64()).collect(),
        Value::SRational(v) => v.iter().map(|r| r.to_f64()).collect(),
        Value::Float(v) => v.iter().map(|&n| n as f64).collect(),
        Value::Double(v) => v.clone(),
        other => integers(other)?.into_iter().map(|n| n as f64).collect(),
    };
    Some(nums)
}

fn ascii_text(lines: &[Vec<u8>]) -> String {
    lines
        .iter()
        .map(|line| String::from_utf8_lossy(line).trim_end_matches('\0').to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

fn join<T: ToString>(values: &[T]) -> String {
    values.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
}

fn tag_value(value: &Value) -> Option<TagValue> {
    match value {
        Value::Ascii(lines) => Some(TagValue::Text(ascii_text(lines))),
        Value::Undefined(bytes, _) => Some(TagValue::Bytes(bytes.clone())),
        other => {
            if let Some(ints) = integers(other) {
                return match ints.as_slice() {
                    [] => None,
                    [single] => Some(TagValue::Integer(*single)),
                    many => Some(TagValue::Text(join(many))),
                };
            }
            match numbers(other)?.as_slice() {
                [] => None,
                many => Some(TagValue::Text(join(many))),
            }
        }
    }
}

fn gps_field(value: &Value) -> Option<GpsField> {
    match value {
        Value::Ascii(lines) => Some(GpsField::Text(ascii_text(lines))),
        Value::Undefined(bytes, _) => Some(GpsField::Text(
            String::from_utf8_lossy(bytes).trim_end_matches('\0').to_string(),
        )),
        other => numbers(other).map(GpsField::Numbers),
    }
}
