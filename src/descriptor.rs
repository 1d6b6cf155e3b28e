//! Spine skeleton descriptor
//!
//! A static, single-frame skeleton: one root bone, one slot per exported
//! layer and a `default` skin mapping each slot to its trimmed image.
//! See <https://esotericsoftware.com/spine-json-format>.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::raster::Placement;

pub const ROOT_BONE: &str = "root";
pub const DEFAULT_SKIN: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkeletonInfo {
    /// Directory the image paths are relative to
    pub images: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    pub bone: String,
    pub attachment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub x: f64,
    pub y: f64,
    pub width: u32,
    pub height: u32,
}

impl From<Placement> for Attachment {
    fn from(p: Placement) -> Self {
        Self {
            x: p.x,
            y: p.y,
            width: p.width,
            height: p.height,
        }
    }
}

/// slot name -> attachment name -> attachment
pub type Skin = BTreeMap<String, BTreeMap<String, Attachment>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpineDescriptor {
    pub skeleton: SkeletonInfo,
    pub bones: Vec<Bone>,
    pub slots: Vec<Slot>,
    pub skins: BTreeMap<String, Skin>,
    pub animations: BTreeMap<String, serde_json::Map<String, serde_json::Value>>,
}

/// Serialization style of the descriptor file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JsonStyle {
    /// No whitespace
    #[default]
    Compact,
    /// Four-space indentation
    Pretty,
}

impl SpineDescriptor {
    pub fn new(images_dir: impl Into<PathBuf>) -> Self {
        let mut skins = BTreeMap::new();
        skins.insert(DEFAULT_SKIN.to_string(), Skin::new());

        // Spine refuses skeletons without any animation
        let mut animations = BTreeMap::new();
        animations.insert("animation".to_string(), serde_json::Map::new());

        Self {
            skeleton: SkeletonInfo {
                images: images_dir.into(),
            },
            bones: vec![Bone {
                name: ROOT_BONE.to_string(),
            }],
            slots: Vec::new(),
            skins,
            animations,
        }
    }

    /// Add a slot on the root bone and its attachment in the default skin,
    /// both named after the image file.
    pub fn push_layer(&mut self, label: &str, placement: Placement) {
        self.slots.push(Slot {
            name: label.to_string(),
            bone: ROOT_BONE.to_string(),
            attachment: label.to_string(),
        });

        let mut attachments = BTreeMap::new();
        attachments.insert(label.to_string(), Attachment::from(placement));
        self.skins
            .entry(DEFAULT_SKIN.to_string())
            .or_default()
            .insert(label.to_string(), attachments);
    }

    pub fn default_skin(&self) -> Option<&Skin> {
        self.skins.get(DEFAULT_SKIN)
    }

    pub fn to_json(&self, style: JsonStyle) -> Result<String> {
        match style {
            JsonStyle::Compact => Ok(serde_json::to_string(self)?),
            JsonStyle::Pretty => {
                let mut buf = Vec::new();
                let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
                let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
                self.serialize(&mut ser)?;
                Ok(String::from_utf8(buf)?)
            }
        }
    }

    /// Write the descriptor to `path`, replacing any previous file only once
    /// the new content is complete.
    pub fn write_to(&self, path: &Path, style: JsonStyle) -> Result<()> {
        let json = self.to_json(style)?;

        let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = path.with_file_name(tmp_name);

        {
            let mut file = fs::File::create(&tmp_path)?;
            file.write_all(json.as_bytes())?;
            file.sync_all()?;
        }
        fs::rename(&tmp_path, path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn placement(x: f64, y: f64, width: u32, height: u32) -> Placement {
        Placement {
            x,
            y,
            width,
            height,
        }
    }

    #[test]
    fn test_new_descriptor_layout() {
        let desc = SpineDescriptor::new("/tmp/out/images");
        let value: serde_json::Value =
            serde_json::from_str(&desc.to_json(JsonStyle::Compact).unwrap()).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "skeleton": {"images": "/tmp/out/images"},
                "bones": [{"name": "root"}],
                "slots": [],
                "skins": {"default": {}},
                "animations": {"animation": {}}
            })
        );
    }

    #[test]
    fn test_push_layer() {
        let mut desc = SpineDescriptor::new("images");
        desc.push_layer("Arm", placement(-20.0, 0.0, 40, 60));
        desc.push_layer("Head", placement(1.5, 30.0, 10, 12));

        assert_eq!(desc.slots.len(), 2);
        assert_eq!(
            desc.slots[0],
            Slot {
                name: "Arm".to_string(),
                bone: "root".to_string(),
                attachment: "Arm".to_string(),
            }
        );

        let value: serde_json::Value =
            serde_json::from_str(&desc.to_json(JsonStyle::Compact).unwrap()).unwrap();
        assert_eq!(
            value["skins"]["default"]["Arm"]["Arm"],
            serde_json::json!({"x": -20.0, "y": 0.0, "width": 40, "height": 60})
        );
        assert_eq!(value["slots"][1]["name"], "Head");
    }

    #[test]
    fn test_compact_has_no_whitespace() {
        let mut desc = SpineDescriptor::new("images");
        desc.push_layer("Arm", placement(-20.0, 0.0, 40, 60));
        let json = desc.to_json(JsonStyle::Compact).unwrap();
        assert!(!json.contains(' '));
        assert!(!json.contains('\n'));
        assert!(json.starts_with(r#"{"skeleton":{"images":"images"},"bones":[{"name":"root"}]"#));
    }

    #[test]
    fn test_pretty_uses_four_spaces() {
        let desc = SpineDescriptor::new("images");
        let json = desc.to_json(JsonStyle::Pretty).unwrap();
        assert!(json.starts_with("{\n    \"skeleton\": {\n        \"images\": \"images\"\n    },"));
    }

    #[test]
    fn test_non_ascii_labels_survive_both_styles() {
        let mut desc = SpineDescriptor::new("images");
        desc.push_layer("Ärmel ✋", placement(0.0, 0.0, 1, 1));

        for style in [JsonStyle::Compact, JsonStyle::Pretty] {
            let json = desc.to_json(style).unwrap();
            assert!(json.contains("\"Ärmel ✋\""));
            assert!(!json.contains('\u{FFFD}'));
        }
    }

    #[test]
    fn test_styles_parse_to_same_structure() {
        let mut desc = SpineDescriptor::new("images");
        desc.push_layer("Arm", placement(-20.0, 0.0, 40, 60));
        desc.push_layer("Leg", placement(3.0, -7.5, 5, 9));

        let compact: SpineDescriptor =
            serde_json::from_str(&desc.to_json(JsonStyle::Compact).unwrap()).unwrap();
        let pretty: SpineDescriptor =
            serde_json::from_str(&desc.to_json(JsonStyle::Pretty).unwrap()).unwrap();
        assert_eq!(compact, pretty);
        assert_eq!(compact, desc);
    }

    #[test]
    fn test_write_to_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Character.json");
        fs::write(&path, "stale").unwrap();

        let desc = SpineDescriptor::new(dir.path().join("images"));
        desc.write_to(&path, JsonStyle::Pretty).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, desc.to_json(JsonStyle::Pretty).unwrap());
        assert!(!dir.path().join("Character.json.tmp").exists());
    }
}
