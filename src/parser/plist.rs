//! Plist dialects (formats 2 and 3).

use std::io::Cursor;

use ::plist::{Dictionary, Value};

use crate::config::{JobConfig, RotatedOrigin};
use crate::error::{Result, UnpxError};
use crate::types::{Size, SpriteSheet};
use crate::validation::{Diagnostic, ValidationResult};

use super::dialect::{Dialect, PlistFields};
use super::frame::{Placement, RawFrame};
use super::packed::{parse_packed_pair, parse_packed_rect};
use super::SheetBuilder;

/// Decode plist bytes (XML or binary) and normalize them.
pub fn normalize_plist(
    bytes: &[u8],
    config: &JobConfig,
    diagnostics: &mut ValidationResult,
) -> Result<(Dialect, SpriteSheet)> {
    let root = Value::from_reader(Cursor::new(bytes)).map_err(|e| UnpxError::Parse {
        message: format!("Invalid plist: {}", e),
        help: None,
    })?;

    let root = root
        .as_dictionary()
        .ok_or_else(|| unrecognized(format!("plist root is {}, not a dictionary", kind(&root))))?;

    let metadata = root.get("metadata").and_then(Value::as_dictionary);
    let dialect = Dialect::from_plist_format(metadata.and_then(|m| m.get("format")).and_then(integer));

    let frames = match root.get("frames") {
        Some(Value::Dictionary(frames)) => frames,
        Some(other) => {
            return Err(unrecognized(format!(
                "plist 'frames' is {}, not a dictionary",
                kind(other)
            )))
        }
        None => return Err(unrecognized("plist has no 'frames' dictionary")),
    };

    if let Dialect::PlistUnknownFormat(format) = dialect {
        let found = format.map_or_else(|| "no format".to_string(), |n| format!("format {}", n));
        diagnostics.push(
            Diagnostic::warning(
                "unpx::normalize::unknown-format",
                format!("Plist metadata declares {}; reading it as format 2", found),
            )
            .with_help("Only plist formats 2 and 3 are known"),
        );
    }

    let fields = PlistFields::for_dialect(dialect);
    let mut builder = SheetBuilder::new();

    for (name, entry) in frames.iter() {
        let entry = entry.as_dictionary().ok_or_else(|| {
            UnpxError::parse(format!("Frame '{}' is {}, not a dictionary", name, kind(entry)))
        })?;

        let raw = read_frame(name, entry, fields, config)?;

        if dialect == Dialect::PlistFormat3 {
            check_sprite_size(name, entry, &raw, diagnostics)?;
        }

        builder.push(name, raw.into_frame(name, config, diagnostics)?)?;
    }

    let mut sheet = builder.finish();
    if let Some(metadata) = metadata {
        sheet.canvas_size = read_canvas_size(metadata)?;
        sheet.texture = ["realTextureFileName", "textureFileName"]
            .iter()
            .find_map(|key| metadata.get(key).and_then(Value::as_string))
            .map(str::to_string);
    }

    Ok((dialect, sheet))
}

fn read_frame(
    name: &str,
    entry: &Dictionary,
    fields: PlistFields,
    config: &JobConfig,
) -> Result<RawFrame> {
    let frame = required_string(name, entry, fields.frame)?;
    let [x, y, w, h] = parse_packed_rect(frame).map_err(|e| in_sprite(name, fields.frame, e))?;

    let rotated = match entry.get(fields.rotated) {
        None => false,
        Some(Value::Boolean(b)) => *b,
        Some(other) => {
            return Err(UnpxError::parse(format!(
                "Frame '{}' has {} for '{}', expected a boolean",
                name,
                kind(other),
                fields.rotated
            )))
        }
    };

    let source_size = optional_string(name, entry, fields.source_size)?
        .map(|s| parse_packed_pair(s).map_err(|e| in_sprite(name, fields.source_size, e)))
        .transpose()?
        .map(|[sw, sh]| (sw, sh));

    let placement = match optional_string(name, entry, fields.offset)? {
        Some(s) => {
            let [ox, oy] = parse_packed_pair(s).map_err(|e| in_sprite(name, fields.offset, e))?;
            Placement::CenterOffset { x: ox, y: oy }
        }
        None => Placement::Centered,
    };

    Ok(RawFrame {
        x,
        y,
        w,
        h,
        rotated,
        source_size,
        placement,
        trimmed: None,
        unrotated_origin: config.rotated_origin == RotatedOrigin::UnrotatedTexture,
    })
}

/// Format 3 repeats the content size as `spriteSize`; flag disagreements.
fn check_sprite_size(
    name: &str,
    entry: &Dictionary,
    raw: &RawFrame,
    diagnostics: &mut ValidationResult,
) -> Result<()> {
    if let Some(s) = optional_string(name, entry, "spriteSize")? {
        let [w, h] = parse_packed_pair(s).map_err(|e| in_sprite(name, "spriteSize", e))?;
        if (w, h) != (raw.w, raw.h) {
            diagnostics.push(
                Diagnostic::warning(
                    "unpx::normalize::frame-size-mismatch",
                    format!(
                        "spriteSize {}x{} differs from textureRect size {}x{}",
                        w, h, raw.w, raw.h
                    ),
                )
                .for_sprite(name),
            );
        }
    }
    Ok(())
}

fn read_canvas_size(metadata: &Dictionary) -> Result<Option<Size>> {
    let Some(size) = metadata.get("size").and_then(Value::as_string) else {
        return Ok(None);
    };
    let [w, h] = parse_packed_pair(size)?;
    Ok(match (u32::try_from(w), u32::try_from(h)) {
        (Ok(w), Ok(h)) if w > 0 && h > 0 => Some(Size::new(w, h)),
        _ => None,
    })
}

fn required_string<'a>(name: &str, entry: &'a Dictionary, key: &str) -> Result<&'a str> {
    optional_string(name, entry, key)?.ok_or_else(|| UnpxError::Parse {
        message: format!("Frame '{}' is missing '{}'", name, key),
        help: Some("Check that the metadata format number matches its field names".to_string()),
    })
}

fn optional_string<'a>(name: &str, entry: &'a Dictionary, key: &str) -> Result<Option<&'a str>> {
    match entry.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(UnpxError::parse(format!(
            "Frame '{}' has {} for '{}', expected a string",
            name,
            kind(other),
            key
        ))),
    }
}

fn in_sprite(name: &str, key: &str, err: UnpxError) -> UnpxError {
    match err {
        UnpxError::Parse { message, help } => UnpxError::Parse {
            message: format!("Frame '{}' field '{}': {}", name, key, message),
            help,
        },
        other => other,
    }
}

fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Integer(i) => i.as_signed(),
        Value::Real(f) => Some(f.floor() as i64),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Array(_) => "an array",
        Value::Dictionary(_) => "a dictionary",
        Value::Boolean(_) => "a boolean",
        Value::Data(_) => "data",
        Value::Date(_) => "a date",
        Value::Real(_) | Value::Integer(_) => "a number",
        Value::String(_) => "a string",
        _ => "an unsupported value",
    }
}

fn unrecognized(message: impl Into<String>) -> UnpxError {
    UnpxError::UnrecognizedSchema {
        message: message.into(),
        help: Some("Expected a 'frames' dictionary keyed by sprite name".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Rect, SourceRect};

    fn plist_doc(format: Option<i64>, frames: &str) -> String {
        let metadata = match format {
            Some(n) => format!(
                "<key>metadata</key><dict><key>format</key><integer>{}</integer>\
                 <key>size</key><string>{{64,32}}</string>\
                 <key>textureFileName</key><string>sheet.png</string></dict>",
                n
            ),
            None => String::new(),
        };
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0"><dict><key>frames</key><dict>{}</dict>{}</dict></plist>"#,
            frames, metadata
        )
    }

    fn run(doc: &str) -> Result<(Dialect, SpriteSheet, ValidationResult)> {
        let mut diagnostics = ValidationResult::new();
        let (dialect, sheet) = normalize_plist(doc.as_bytes(), &JobConfig::default(), &mut diagnostics)?;
        Ok((dialect, sheet, diagnostics))
    }

    const FORMAT_2_FRAME: &str = "<key>a.png</key><dict>\
        <key>frame</key><string>{{0,0},{10,10}}</string>\
        <key>offset</key><string>{0,0}</string>\
        <key>rotated</key><false/>\
        <key>sourceSize</key><string>{10,10}</string></dict>";

    #[test]
    fn test_format_2_untrimmed() {
        let (dialect, sheet, diags) = run(&plist_doc(Some(2), FORMAT_2_FRAME)).unwrap();
        assert_eq!(dialect, Dialect::PlistFormat2);
        assert!(diags.is_clean());

        let frame = sheet.get("a.png").unwrap();
        assert_eq!(frame.frame_rect, Rect::new(0, 0, 10, 10));
        assert_eq!(frame.source_size, Size::new(10, 10));
        assert_eq!(frame.sprite_source_rect, SourceRect::new(0, 0, 10, 10));
        assert!(!frame.rotated);
        assert!(!frame.trimmed);

        assert_eq!(sheet.canvas_size, Some(Size::new(64, 32)));
        assert_eq!(sheet.texture.as_deref(), Some("sheet.png"));
    }

    #[test]
    fn test_format_3_aliases() {
        let frames = "<key>b.png</key><dict>\
            <key>textureRect</key><string>{{4,2},{6,8}}</string>\
            <key>spriteOffset</key><string>{1,-1}</string>\
            <key>textureRotated</key><true/>\
            <key>spriteSize</key><string>{6,8}</string>\
            <key>spriteSourceSize</key><string>{10,12}</string>\
            <key>aliases</key><array/></dict>";
        let (dialect, sheet, diags) = run(&plist_doc(Some(3), frames)).unwrap();
        assert_eq!(dialect, Dialect::PlistFormat3);
        assert!(diags.is_clean());

        let frame = sheet.get("b.png").unwrap();
        assert!(frame.rotated);
        assert_eq!(frame.frame_rect, Rect::new(4, 2, 8, 6));
        assert_eq!(frame.source_size, Size::new(12, 10));
    }

    #[test]
    fn test_format_3_sprite_size_mismatch_warns() {
        let frames = "<key>c</key><dict>\
            <key>textureRect</key><string>{{0,0},{6,8}}</string>\
            <key>spriteSize</key><string>{5,8}</string>\
            <key>spriteSourceSize</key><string>{6,8}</string></dict>";
        let (_, _, diags) = run(&plist_doc(Some(3), frames)).unwrap();
        assert!(diags.contains_code("unpx::normalize::frame-size-mismatch"));
    }

    #[test]
    fn test_unknown_format_warns_and_reads_as_format_2() {
        let (dialect, sheet, diags) = run(&plist_doc(Some(1), FORMAT_2_FRAME)).unwrap();
        assert_eq!(dialect, Dialect::PlistUnknownFormat(Some(1)));
        assert!(diags.contains_code("unpx::normalize::unknown-format"));
        assert_eq!(sheet.len(), 1);

        let (dialect, _, diags) = run(&plist_doc(None, FORMAT_2_FRAME)).unwrap();
        assert_eq!(dialect, Dialect::PlistUnknownFormat(None));
        assert!(diags.has_warnings());
    }

    #[test]
    fn test_missing_frames_is_unrecognized() {
        let doc = r#"<?xml version="1.0" encoding="UTF-8"?>
<plist version="1.0"><dict><key>metadata</key><dict/></dict></plist>"#;
        assert!(matches!(run(doc), Err(UnpxError::UnrecognizedSchema { .. })));
    }

    #[test]
    fn test_missing_frame_field_is_parse_error() {
        let frames = "<key>d</key><dict><key>offset</key><string>{0,0}</string></dict>";
        let err = run(&plist_doc(Some(2), frames)).unwrap_err();
        assert!(matches!(err, UnpxError::Parse { ref message, .. } if message.contains("'frame'")));
    }

    #[test]
    fn test_invalid_plist() {
        assert!(run("not a plist").is_err());
    }

    #[test]
    fn test_frame_order_preserved() {
        let frames = "<key>z</key><dict><key>frame</key><string>{0,0,1,1}</string></dict>\
            <key>a</key><dict><key>frame</key><string>{1,0,1,1}</string></dict>";
        let (_, sheet, _) = run(&plist_doc(Some(2), frames)).unwrap();
        assert_eq!(sheet.names().collect::<Vec<_>>(), vec!["z", "a"]);
    }
}
