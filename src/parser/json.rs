//! JSON dialects (array, hash and multi-atlas).

use serde_json::{Map, Value};

use crate::config::JobConfig;
use crate::error::{Result, UnpxError};
use crate::types::{Size, SourceRect, SpriteSheet};
use crate::validation::ValidationResult;

use super::dialect::Dialect;
use super::frame::{Placement, RawFrame};
use super::SheetBuilder;

/// Decode JSON bytes and normalize them.
pub fn normalize_json(
    bytes: &[u8],
    config: &JobConfig,
    diagnostics: &mut ValidationResult,
) -> Result<(Dialect, SpriteSheet)> {
    let root: Value = serde_json::from_slice(bytes).map_err(|e| UnpxError::Parse {
        message: format!("Invalid JSON: {}", e),
        help: None,
    })?;
    let root = root
        .as_object()
        .ok_or_else(|| unrecognized("JSON root is not an object"))?;

    let (dialect, entries, meta) = detect(root)?;

    let mut builder = SheetBuilder::new();
    for entry in &entries {
        let (name, raw) = read_entry(entry)?;
        builder.push(name, raw.into_frame(name, config, diagnostics)?)?;
    }

    let mut sheet = builder.finish();
    sheet.canvas_size = read_canvas_size(&meta);
    sheet.texture = meta.get("image").and_then(Value::as_str).map(str::to_string);

    Ok((dialect, sheet))
}

/// Identify the dialect and bring its frames into array form.
fn detect(root: &Map<String, Value>) -> Result<(Dialect, Vec<Value>, Map<String, Value>)> {
    let shared_meta = root.get("meta").and_then(Value::as_object);

    if let Some(frames) = root.get("frames") {
        return match frames {
            Value::Array(entries) => Ok((Dialect::JsonArray, entries.clone(), meta_or_empty(shared_meta))),
            Value::Object(map) => Ok((Dialect::JsonHash, hash_to_array(map), meta_or_empty(shared_meta))),
            _ => Err(unrecognized("'frames' is neither an array nor an object")),
        };
    }

    match root.get("textures") {
        Some(Value::Array(textures)) => {
            let atlas = textures
                .first()
                .ok_or_else(|| unrecognized("'textures' is empty"))?
                .as_object()
                .ok_or_else(|| unrecognized("first entry of 'textures' is not an object"))?;

            let entries = match atlas.get("frames") {
                Some(Value::Array(entries)) => entries.clone(),
                Some(Value::Object(map)) => hash_to_array(map),
                _ => return Err(unrecognized("first atlas in 'textures' has no frames")),
            };

            Ok((Dialect::JsonMultiAtlas, entries, merge_meta(shared_meta, atlas)))
        }
        Some(_) => Err(unrecognized("'textures' is not an array")),
        None => Err(unrecognized("no 'frames' or 'textures' found")),
    }
}

/// Turn `{name: entry}` into `[entry + {filename: name}]`.
fn hash_to_array(map: &Map<String, Value>) -> Vec<Value> {
    map.iter()
        .map(|(name, entry)| {
            let mut entry = entry.clone();
            if let Value::Object(fields) = &mut entry {
                fields.insert("filename".to_string(), Value::String(name.clone()));
            }
            entry
        })
        .collect()
}

/// Atlas-level fields override the shared `meta` object.
fn merge_meta(shared: Option<&Map<String, Value>>, atlas: &Map<String, Value>) -> Map<String, Value> {
    let mut merged = meta_or_empty(shared);
    for (key, value) in atlas {
        if key != "frames" {
            merged.insert(key.clone(), value.clone());
        }
    }
    merged
}

fn meta_or_empty(meta: Option<&Map<String, Value>>) -> Map<String, Value> {
    meta.cloned().unwrap_or_default()
}

fn read_entry(entry: &Value) -> Result<(&str, RawFrame)> {
    let fields = entry
        .as_object()
        .ok_or_else(|| UnpxError::parse("Frame entry is not an object"))?;

    let name = fields
        .get("filename")
        .and_then(Value::as_str)
        .ok_or_else(|| UnpxError::Parse {
            message: "Frame entry has no 'filename'".to_string(),
            help: Some("Array-form frames must name each sprite with 'filename'".to_string()),
        })?;

    let frame = object(name, fields, "frame")?
        .ok_or_else(|| UnpxError::parse(format!("Frame '{}' is missing 'frame'", name)))?;
    let x = number(name, frame, "frame", "x")?;
    let y = number(name, frame, "frame", "y")?;
    let w = number(name, frame, "frame", "w")?;
    let h = number(name, frame, "frame", "h")?;

    let rotated = boolean(name, fields, "rotated")?.unwrap_or(false);
    let trimmed = boolean(name, fields, "trimmed")?;

    let source_size = object(name, fields, "sourceSize")?
        .map(|size| -> Result<(i64, i64)> {
            Ok((
                number(name, size, "sourceSize", "w")?,
                number(name, size, "sourceSize", "h")?,
            ))
        })
        .transpose()?;

    let placement = match object(name, fields, "spriteSourceSize")? {
        Some(rect) => {
            let sw = number(name, rect, "spriteSourceSize", "w")?;
            let sh = number(name, rect, "spriteSourceSize", "h")?;
            let to_u32 = |v: i64| {
                u32::try_from(v).map_err(|_| {
                    UnpxError::parse(format!("Frame '{}' has invalid spriteSourceSize size", name))
                })
            };
            Placement::Rect(SourceRect::new(
                number(name, rect, "spriteSourceSize", "x")?,
                number(name, rect, "spriteSourceSize", "y")?,
                to_u32(sw)?,
                to_u32(sh)?,
            ))
        }
        None => Placement::Centered,
    };

    Ok((
        name,
        RawFrame {
            x,
            y,
            w,
            h,
            rotated,
            source_size,
            placement,
            trimmed,
            unrotated_origin: false,
        },
    ))
}

fn read_canvas_size(meta: &Map<String, Value>) -> Option<Size> {
    let size = meta.get("size")?.as_object()?;
    let w = size.get("w")?.as_f64()?.floor();
    let h = size.get("h")?.as_f64()?.floor();
    if w >= 1.0 && h >= 1.0 && w <= u32::MAX as f64 && h <= u32::MAX as f64 {
        Some(Size::new(w as u32, h as u32))
    } else {
        None
    }
}

fn object<'a>(
    name: &str,
    fields: &'a Map<String, Value>,
    key: &str,
) -> Result<Option<&'a Map<String, Value>>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(_) => Err(UnpxError::parse(format!(
            "Frame '{}' field '{}' is not an object",
            name, key
        ))),
    }
}

fn number(name: &str, fields: &Map<String, Value>, parent: &str, key: &str) -> Result<i64> {
    fields
        .get(key)
        .and_then(Value::as_f64)
        .filter(|v| v.is_finite())
        .map(|v| v.floor() as i64)
        .ok_or_else(|| {
            UnpxError::parse(format!(
                "Frame '{}' field '{}.{}' is missing or not a number",
                name, parent, key
            ))
        })
}

fn boolean(name: &str, fields: &Map<String, Value>, key: &str) -> Result<Option<bool>> {
    match fields.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(_) => Err(UnpxError::parse(format!(
            "Frame '{}' field '{}' is not a boolean",
            name, key
        ))),
    }
}

fn unrecognized(message: impl Into<String>) -> UnpxError {
    UnpxError::UnrecognizedSchema {
        message: message.into(),
        help: Some("Expected 'frames' (array or object) or 'textures' (array of atlases)".to_string()),
    }
}
